//! # Notification Hub
//!
//! A synchronous, in-process publish/subscribe bus. The file store, the note
//! session, the context advisor and the command runner publish [`Event`]s;
//! any number of observers (a UI, the CLI printer, tests) subscribe by
//! [`EventKind`].
//!
//! ## Delivery Rules
//!
//! - Handlers for a kind run in registration order, on the publishing thread.
//! - A handler that returns `Err` or panics is logged and counted in the
//!   [`DeliveryReport`]; the remaining handlers still receive the event.
//! - Handlers may publish from inside a handler. Nesting is capped at
//!   `max_depth`; an event published deeper than that is dropped and the
//!   report is marked `suppressed`.
//! - Handlers added during a dispatch only see later events.
//!
//! There is no persistence and no replay: an event published with no
//! subscribers is simply gone.

use log::{debug, error, warn};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::rc::Rc;

pub const DEFAULT_MAX_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FileLoaded { path: PathBuf, content: String },
    FileSaved { path: PathBuf },
    FileError { message: String },
    TextChanged { text: String },
    NoteSuggested { title: String, content: String },
    CommandFinished {
        command: String,
        success: bool,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FileLoaded,
    FileSaved,
    FileError,
    TextChanged,
    NoteSuggested,
    CommandFinished,
}

impl EventKind {
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::FileLoaded,
            EventKind::FileSaved,
            EventKind::FileError,
            EventKind::TextChanged,
            EventKind::NoteSuggested,
            EventKind::CommandFinished,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::FileLoaded => "file_loaded",
            EventKind::FileSaved => "file_saved",
            EventKind::FileError => "file_error",
            EventKind::TextChanged => "text_changed",
            EventKind::NoteSuggested => "note_suggested",
            EventKind::CommandFinished => "command_finished",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::FileLoaded { .. } => EventKind::FileLoaded,
            Event::FileSaved { .. } => EventKind::FileSaved,
            Event::FileError { .. } => EventKind::FileError,
            Event::TextChanged { .. } => EventKind::TextChanged,
            Event::NoteSuggested { .. } => EventKind::NoteSuggested,
            Event::CommandFinished { .. } => EventKind::CommandFinished,
        }
    }
}

pub type HandlerError = Box<dyn std::error::Error>;
pub type HandlerResult = std::result::Result<(), HandlerError>;

type Handler = Rc<dyn Fn(&Event) -> HandlerResult>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler,
}

/// Outcome of a single [`NotificationHub::publish`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
    pub suppressed: bool,
}

impl DeliveryReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && !self.suppressed
    }
}

pub struct NotificationHub {
    subscriptions: RefCell<Vec<Subscription>>,
    next_id: Cell<u64>,
    depth: Cell<usize>,
    max_depth: usize,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHub")
            .field("subscriptions", &self.subscriptions.borrow().len())
            .field("depth", &self.depth.get())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// A `max_depth` of zero is treated as one: top-level publishes always deliver.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            subscriptions: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            depth: Cell::new(0),
            max_depth: max_depth.max(1),
        }
    }

    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) -> HandlerResult + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.subscriptions.borrow_mut().push(Subscription {
            id,
            kind,
            handler: Rc::new(handler),
        });
        debug!("event=subscribe module=hub kind={} id={}", kind, id);
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscriptions.borrow_mut();
        let before = subs.len();
        subs.retain(|s| s.id != id);
        before != subs.len()
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }

    pub fn publish(&self, event: Event) -> DeliveryReport {
        let kind = event.kind();
        let depth = self.depth.get();
        if depth >= self.max_depth {
            warn!(
                "event=publish_suppressed module=hub kind={} depth={} max_depth={}",
                kind, depth, self.max_depth
            );
            return DeliveryReport {
                suppressed: true,
                ..Default::default()
            };
        }

        // Snapshot so handlers can (un)subscribe while we dispatch.
        let handlers: Vec<(SubscriptionId, Handler)> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| (s.id, Rc::clone(&s.handler)))
            .collect();

        let _depth = DepthGuard::enter(&self.depth);
        let mut report = DeliveryReport::default();

        for (id, handler) in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| (*handler)(&event))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(err)) => {
                    report.failed += 1;
                    error!(
                        "event=handler_failed module=hub kind={} id={} error={}",
                        kind, id, err
                    );
                }
                Err(payload) => {
                    report.failed += 1;
                    error!(
                        "event=handler_panicked module=hub kind={} id={} payload={}",
                        kind,
                        id,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        debug!(
            "event=publish module=hub kind={} delivered={} failed={}",
            kind, report.delivered, report.failed
        );
        report
    }
}

struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self { depth }
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
