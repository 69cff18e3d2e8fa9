//! # Context Advisor
//!
//! Light context-awareness: a coarse time-of-day bucket and an optional
//! foreground-application label, plus fixed tables mapping a context to a
//! suggested note title and template.
//!
//! ## Time Buckets
//!
//! | Hours        | Bucket      |
//! |--------------|-------------|
//! | `[6, 12)`    | morning     |
//! | `[12, 18)`   | afternoon   |
//! | `[18, 22)`   | evening     |
//! | otherwise    | night       |
//!
//! Lower bounds are inclusive.
//!
//! ## Hooks
//!
//! Callers register `(predicate, callback)` pairs per [`ContextType`]. Each
//! time a value of that type is computed, every predicate is checked and all
//! matching callbacks run synchronously, in registration order.
//!
//! ## Refresh
//!
//! The time bucket is refreshed on demand ([`ContextAdvisor::refresh_time_context`])
//! or from a cooperative timer ([`ContextAdvisor::tick`]) driven by the event
//! loop. Active-window and working-directory monitoring are not implemented;
//! [`ContextAdvisor::set_active_application`] is the entry point for a UI that
//! can observe them.

use crate::error::NotasError;
use crate::hub::{DeliveryReport, Event, NotificationHub};
use chrono::{Local, Timelike};
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBucket {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeBucket {
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeBucket::Morning,
            12..=17 => TimeBucket::Afternoon,
            18..=21 => TimeBucket::Evening,
            _ => TimeBucket::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBucket::Morning => "morning",
            TimeBucket::Afternoon => "afternoon",
            TimeBucket::Evening => "evening",
            TimeBucket::Night => "night",
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeBucket {
    type Err = NotasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(TimeBucket::Morning),
            "afternoon" => Ok(TimeBucket::Afternoon),
            "evening" => Ok(TimeBucket::Evening),
            "night" => Ok(TimeBucket::Night),
            other => Err(NotasError::Validation(format!(
                "unknown time bucket `{other}`; expected morning|afternoon|evening|night"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextType {
    Time,
    Application,
}

impl ContextType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextType::Time => "time",
            ContextType::Application => "application",
        }
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextType {
    type Err = NotasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" => Ok(ContextType::Time),
            "application" | "app" => Ok(ContextType::Application),
            other => Err(NotasError::Validation(format!(
                "unknown context type `{other}`; expected time|application"
            ))),
        }
    }
}

/// Source of the current wall-clock hour.
pub trait Clock {
    fn hour(&self) -> u32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// A clock stuck at one hour.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn hour(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSnapshot {
    pub time_bucket: Option<TimeBucket>,
    pub active_application: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub title: String,
    pub template: Option<&'static str>,
    pub context_type: ContextType,
    pub context_value: String,
    pub content: String,
}

const TIME_TITLES: [(TimeBucket, &str); 4] = [
    (TimeBucket::Morning, "Morning routine and tasks"),
    (TimeBucket::Afternoon, "Work progress and meetings"),
    (TimeBucket::Evening, "Evening reflection and planning"),
    (TimeBucket::Night, "Night thoughts and ideas"),
];

// Checked in order; the first substring match wins.
const APPLICATION_TITLES: [(&str, &str); 3] = [
    ("firefox", "Web research and bookmarks"),
    ("code", "Programming notes and code snippets"),
    ("terminal", "Command history and system notes"),
];

type Predicate = Box<dyn Fn(&str) -> bool>;
type HookCallback = Box<dyn Fn(ContextType, &str)>;

struct ContextHook {
    predicate: Predicate,
    callback: HookCallback,
}

pub struct ContextAdvisor {
    snapshot: ContextSnapshot,
    hooks: HashMap<ContextType, Vec<ContextHook>>,
    clock: Box<dyn Clock>,
    refresh_interval: Duration,
    last_refresh: Option<Instant>,
}

impl Default for ContextAdvisor {
    fn default() -> Self {
        Self::new(Box::new(SystemClock))
    }
}

impl fmt::Debug for ContextAdvisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextAdvisor")
            .field("snapshot", &self.snapshot)
            .field("refresh_interval", &self.refresh_interval)
            .finish_non_exhaustive()
    }
}

impl ContextAdvisor {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            snapshot: ContextSnapshot::default(),
            hooks: HashMap::new(),
            clock,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            last_refresh: None,
        }
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn snapshot(&self) -> &ContextSnapshot {
        &self.snapshot
    }

    pub fn add_hook<P, C>(&mut self, context_type: ContextType, predicate: P, callback: C)
    where
        P: Fn(&str) -> bool + 'static,
        C: Fn(ContextType, &str) + 'static,
    {
        self.hooks
            .entry(context_type)
            .or_default()
            .push(ContextHook {
                predicate: Box::new(predicate),
                callback: Box::new(callback),
            });
    }

    pub fn refresh_time_context(&mut self) -> TimeBucket {
        let bucket = TimeBucket::for_hour(self.clock.hour());
        if self.snapshot.time_bucket != Some(bucket) {
            info!("event=context_changed module=context type=time value={bucket}");
        }
        self.snapshot.time_bucket = Some(bucket);
        self.trigger_hooks(ContextType::Time, bucket.as_str());
        bucket
    }

    /// Records the foreground application reported by the UI.
    pub fn set_active_application(&mut self, name: impl Into<String>) {
        let name = name.into();
        debug!("event=context_changed module=context type=application value={name}");
        self.trigger_hooks(ContextType::Application, &name);
        self.snapshot.active_application = Some(name);
    }

    /// Timer entry point: refreshes the time bucket once `refresh_interval`
    /// has passed since the previous refresh. The first tick always refreshes.
    pub fn tick(&mut self, now: Instant) -> Option<TimeBucket> {
        let due = match self.last_refresh {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.refresh_interval,
        };
        if !due {
            return None;
        }
        self.last_refresh = Some(now);
        Some(self.refresh_time_context())
    }

    pub fn suggest(&self, context_type: ContextType, context_value: &str) -> Option<Suggestion> {
        let title = match context_type {
            ContextType::Time => {
                let bucket = context_value.parse::<TimeBucket>().ok()?;
                TIME_TITLES
                    .iter()
                    .find(|(b, _)| *b == bucket)
                    .map(|(_, title)| *title)
            }
            ContextType::Application => {
                let app = context_value.to_lowercase();
                APPLICATION_TITLES
                    .iter()
                    .find(|(needle, _)| app.contains(needle))
                    .map(|(_, title)| *title)
            }
        }?;

        Some(Suggestion {
            title: title.to_string(),
            template: self.suggest_template_for_context(context_type, context_value),
            context_type,
            context_value: context_value.to_string(),
            content: format!("# {title}\n\nContext: {context_value}\n\n"),
        })
    }

    /// Like [`suggest`](Self::suggest), and publishes `NoteSuggested` on a match.
    pub fn suggest_and_notify(
        &self,
        hub: &NotificationHub,
        context_type: ContextType,
        context_value: &str,
    ) -> Option<(Suggestion, DeliveryReport)> {
        let suggestion = self.suggest(context_type, context_value)?;
        let report = hub.publish(Event::NoteSuggested {
            title: suggestion.title.clone(),
            content: suggestion.content.clone(),
        });
        Some((suggestion, report))
    }

    pub fn suggest_template_for_context(
        &self,
        context_type: ContextType,
        context_value: &str,
    ) -> Option<&'static str> {
        match context_type {
            ContextType::Time => match context_value.parse::<TimeBucket>().ok()? {
                TimeBucket::Morning => Some("todo"),
                TimeBucket::Afternoon => Some("meeting"),
                TimeBucket::Evening | TimeBucket::Night => None,
            },
            ContextType::Application => {
                let app = context_value.to_lowercase();
                if app.contains("code") {
                    Some("code_review")
                } else if app.contains("firefox") {
                    Some("research")
                } else {
                    None
                }
            }
        }
    }

    fn trigger_hooks(&self, context_type: ContextType, value: &str) {
        let Some(hooks) = self.hooks.get(&context_type) else {
            return;
        };
        for hook in hooks {
            if (hook.predicate)(value) {
                (hook.callback)(context_type, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn advisor_at(hour: u32) -> ContextAdvisor {
        ContextAdvisor::new(Box::new(FixedClock(hour)))
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(TimeBucket::for_hour(5), TimeBucket::Night);
        assert_eq!(TimeBucket::for_hour(6), TimeBucket::Morning);
        assert_eq!(TimeBucket::for_hour(11), TimeBucket::Morning);
        assert_eq!(TimeBucket::for_hour(12), TimeBucket::Afternoon);
        assert_eq!(TimeBucket::for_hour(17), TimeBucket::Afternoon);
        assert_eq!(TimeBucket::for_hour(18), TimeBucket::Evening);
        assert_eq!(TimeBucket::for_hour(21), TimeBucket::Evening);
        assert_eq!(TimeBucket::for_hour(22), TimeBucket::Night);
        assert_eq!(TimeBucket::for_hour(0), TimeBucket::Night);
    }

    #[test]
    fn test_refresh_time_context_uses_clock() {
        assert_eq!(advisor_at(7).refresh_time_context(), TimeBucket::Morning);
        assert_eq!(advisor_at(23).refresh_time_context(), TimeBucket::Night);
        assert_eq!(advisor_at(12).refresh_time_context(), TimeBucket::Afternoon);

        let mut advisor = advisor_at(19);
        advisor.refresh_time_context();
        assert_eq!(advisor.snapshot().time_bucket, Some(TimeBucket::Evening));
    }

    #[test]
    fn test_time_suggestions() {
        let advisor = advisor_at(9);
        let s = advisor.suggest(ContextType::Time, "morning").unwrap();
        assert_eq!(s.title, "Morning routine and tasks");
        assert_eq!(s.template, Some("todo"));
        assert_eq!(s.content, "# Morning routine and tasks\n\nContext: morning\n\n");

        assert_eq!(
            advisor.suggest(ContextType::Time, "night").unwrap().title,
            "Night thoughts and ideas"
        );
        assert!(advisor.suggest(ContextType::Time, "teatime").is_none());
    }

    #[test]
    fn test_application_suggestions_match_substrings() {
        let advisor = advisor_at(9);
        assert_eq!(
            advisor
                .suggest(ContextType::Application, "Firefox Developer Edition")
                .unwrap()
                .title,
            "Web research and bookmarks"
        );
        assert_eq!(
            advisor
                .suggest(ContextType::Application, "vscode")
                .unwrap()
                .title,
            "Programming notes and code snippets"
        );
        assert_eq!(
            advisor
                .suggest(ContextType::Application, "gnome-terminal")
                .unwrap()
                .title,
            "Command history and system notes"
        );
        assert!(advisor.suggest(ContextType::Application, "gimp").is_none());
    }

    #[test]
    fn test_template_for_context() {
        let advisor = advisor_at(9);
        assert_eq!(
            advisor.suggest_template_for_context(ContextType::Time, "morning"),
            Some("todo")
        );
        assert_eq!(
            advisor.suggest_template_for_context(ContextType::Time, "afternoon"),
            Some("meeting")
        );
        assert_eq!(
            advisor.suggest_template_for_context(ContextType::Time, "evening"),
            None
        );
        assert_eq!(
            advisor.suggest_template_for_context(ContextType::Application, "Code - OSS"),
            Some("code_review")
        );
        assert_eq!(
            advisor.suggest_template_for_context(ContextType::Application, "firefox"),
            Some("research")
        );
        assert_eq!(
            advisor.suggest_template_for_context(ContextType::Application, "terminal"),
            None
        );
    }

    #[test]
    fn test_hooks_fire_in_order_and_all_matches_run() {
        let mut advisor = advisor_at(8);
        let fired = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&fired);
        advisor.add_hook(
            ContextType::Time,
            |v| v == "morning",
            move |t, v| log.borrow_mut().push(format!("first {t}={v}")),
        );
        let log = Rc::clone(&fired);
        advisor.add_hook(
            ContextType::Time,
            |v| v == "night",
            move |_, _| log.borrow_mut().push("never".to_string()),
        );
        let log = Rc::clone(&fired);
        advisor.add_hook(
            ContextType::Time,
            |_| true,
            move |_, v| log.borrow_mut().push(format!("second {v}")),
        );

        advisor.refresh_time_context();

        assert_eq!(
            *fired.borrow(),
            vec!["first time=morning".to_string(), "second morning".to_string()]
        );
    }

    #[test]
    fn test_application_hooks_only_fire_for_application() {
        let mut advisor = advisor_at(8);
        let fired = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&fired);
        advisor.add_hook(
            ContextType::Application,
            |v| v.contains("code"),
            move |_, v| log.borrow_mut().push(v.to_string()),
        );

        advisor.refresh_time_context();
        advisor.set_active_application("code");

        assert_eq!(*fired.borrow(), vec!["code".to_string()]);
        assert_eq!(advisor.snapshot().active_application.as_deref(), Some("code"));
    }

    #[test]
    fn test_tick_respects_interval() {
        let mut advisor = advisor_at(14).with_refresh_interval(Duration::from_secs(5));
        let start = Instant::now();

        assert_eq!(advisor.tick(start), Some(TimeBucket::Afternoon));
        assert_eq!(advisor.tick(start + Duration::from_secs(2)), None);
        assert_eq!(
            advisor.tick(start + Duration::from_secs(5)),
            Some(TimeBucket::Afternoon)
        );
    }

    #[test]
    fn test_suggest_and_notify_publishes() {
        let hub = NotificationHub::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        hub.subscribe(crate::hub::EventKind::NoteSuggested, move |e| {
            sink.borrow_mut().push(e.clone());
            Ok(())
        });

        let advisor = advisor_at(20);
        let (suggestion, report) = advisor
            .suggest_and_notify(&hub, ContextType::Time, "evening")
            .unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(
            seen.borrow()[0],
            Event::NoteSuggested {
                title: suggestion.title.clone(),
                content: suggestion.content,
            }
        );

        assert!(advisor
            .suggest_and_notify(&hub, ContextType::Application, "gimp")
            .is_none());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_parse_context_type() {
        assert_eq!("time".parse::<ContextType>().unwrap(), ContextType::Time);
        assert_eq!(
            "Application".parse::<ContextType>().unwrap(),
            ContextType::Application
        );
        assert!("weather".parse::<ContextType>().is_err());
    }
}
