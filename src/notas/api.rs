//! # API Facade
//!
//! `NotasApi` is the single entry point a UI talks to. It owns the editing
//! session (the current [`Note`]) and wires the components together:
//!
//! - [`FileStore`] for load/save, publishing on the shared hub
//! - [`TemplateCatalog`] and [`QuickCapture`] for template drafts
//! - [`ContextAdvisor`] for context buckets and suggestions
//! - [`CommandRunner`] for background shell commands
//!
//! The facade never prints. Anything a UI wants to show arrives either as a
//! return value or as an [`Event`] on the hub, so a UI subscribes once and
//! renders whatever comes in.
//!
//! ## Generic Over StorageBackend
//!
//! `NotasApi<B: StorageBackend>` runs against `FsBackend` in production and
//! `MemBackend` in tests, exactly like the store underneath it.

use crate::capture::{Draft, QuickCapture};
use crate::context::{ContextAdvisor, ContextType, Suggestion, TimeBucket};
use crate::error::{NotasError, Result};
use crate::hub::{Event, NotificationHub};
use crate::markdown;
use crate::model::Note;
use crate::shell::CommandRunner;
use crate::stats::TextStatistics;
use crate::store::{FileStore, StorageBackend};
use crate::templates::TemplateCatalog;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

pub struct NotasApi<B: StorageBackend> {
    store: FileStore<B>,
    catalog: TemplateCatalog,
    advisor: ContextAdvisor,
    runner: CommandRunner,
    note: Note,
    file_ext: String,
}

impl<B: StorageBackend> NotasApi<B> {
    pub fn new(backend: B, notes_dir: PathBuf, hub: Rc<NotificationHub>) -> Self {
        Self {
            store: FileStore::open(backend, notes_dir, hub),
            catalog: TemplateCatalog::new(),
            advisor: ContextAdvisor::default(),
            runner: CommandRunner::new(),
            note: Note::new(),
            file_ext: crate::capture::DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_advisor(mut self, advisor: ContextAdvisor) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn with_file_ext(mut self, ext: &str) -> Self {
        self.file_ext = ext.to_string();
        self
    }

    pub fn hub(&self) -> &Rc<NotificationHub> {
        self.store.hub()
    }

    pub fn store(&self) -> &FileStore<B> {
        &self.store
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn advisor_mut(&mut self) -> &mut ContextAdvisor {
        &mut self.advisor
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn new_note(&mut self) {
        self.note = Note::new();
    }

    /// Loads `path` into the session. On failure the current note is kept.
    pub fn open(&mut self, path: &Path) -> Result<&Note> {
        let content = self.store.load(path)?;
        self.note = Note::loaded(path.to_path_buf(), content);
        Ok(&self.note)
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.note.edit(text);
        self.hub().publish(Event::TextChanged {
            text: self.note.content.clone(),
        });
    }

    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self
            .note
            .path
            .clone()
            .ok_or_else(|| NotasError::Validation("note has no path; use save_as".to_string()))?;
        self.save_as(&path)?;
        Ok(path)
    }

    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        self.store.save(path, &self.note.content)?;
        self.note.mark_saved(path);
        Ok(())
    }

    pub fn statistics(&self) -> TextStatistics {
        self.note.statistics()
    }

    pub fn preview(&self) -> String {
        markdown::render_html(&self.note.content)
    }

    pub fn preview_snippet(&self) -> String {
        markdown::preview_snippet(&self.note.content, markdown::DEFAULT_SNIPPET_CHARS)
    }

    fn capture(&self) -> QuickCapture<'_> {
        QuickCapture::new(&self.catalog, &self.advisor).with_extension(&self.file_ext)
    }

    pub fn quick_capture(&self, template: Option<&str>) -> Draft {
        self.capture().start_capture(template)
    }

    pub fn change_template(&self, draft: Draft, name: &str) -> Result<Draft> {
        self.capture().change_template(draft, name)
    }

    pub fn capture_with_context(
        &self,
        context_type: Option<ContextType>,
        context_value: Option<&str>,
    ) -> Draft {
        self.capture()
            .capture_with_context(context_type, context_value)
    }

    pub fn commit(&self, draft: &Draft) -> Result<PathBuf> {
        self.capture().commit(draft, &self.store)
    }

    /// Looks up a suggestion and announces it on the hub as `NoteSuggested`.
    pub fn suggest(&self, context_type: ContextType, context_value: &str) -> Option<Suggestion> {
        self.advisor
            .suggest_and_notify(self.store.hub(), context_type, context_value)
            .map(|(suggestion, _)| suggestion)
    }

    /// Suggestion for the current time of day, refreshing the bucket first.
    pub fn suggest_for_now(&mut self) -> Option<Suggestion> {
        let bucket = self.advisor.refresh_time_context();
        self.suggest(ContextType::Time, bucket.as_str())
    }

    pub fn set_active_application(&mut self, name: &str) -> Option<Suggestion> {
        self.advisor.set_active_application(name);
        self.suggest(ContextType::Application, name)
    }

    pub fn refresh_context(&mut self) -> TimeBucket {
        self.advisor.refresh_time_context()
    }

    /// Timer entry point: refreshes context when due and publishes finished commands.
    pub fn tick(&mut self, now: Instant) -> Option<TimeBucket> {
        self.runner.poll(self.store.hub());
        self.advisor.tick(now)
    }

    pub fn run_command(&mut self, command: &str) -> Result<()> {
        self.runner.spawn(command)
    }

    pub fn pending_commands(&self) -> usize {
        self.runner.pending()
    }

    pub fn wait_for_commands(&mut self) -> usize {
        self.runner.wait_all(self.store.hub())
    }
}
