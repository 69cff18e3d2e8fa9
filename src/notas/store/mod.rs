//! # Storage Layer
//!
//! Notes are plain UTF-8 markdown/text files addressed by path. Storage is
//! split in two:
//!
//! - [`backend::StorageBackend`]: raw read/write by path.
//!   - [`fs_backend::FsBackend`]: production filesystem backend (atomic writes).
//!   - [`mem_backend::MemBackend`]: in-memory backend for tests.
//! - [`FileStore`]: wraps a backend with the notes directory, event
//!   publishing and save serialization. This is what the rest of the crate
//!   talks to.
//!
//! ## Events
//!
//! | Operation      | Success                         | Failure               |
//! |----------------|---------------------------------|-----------------------|
//! | `load`         | `FileLoaded { path, content }`  | `FileError { message }` |
//! | `save`         | `FileSaved { path }`            | `FileError { message }` |
//!
//! Failures are also returned to the direct caller as `Err`. They are never
//! fatal: the store keeps working after any single failed operation.
//!
//! ## Ordering
//!
//! `FileSaved` is published only after the backend write returned. A path
//! stays "in flight" until its `FileSaved` handlers have run; a second save to
//! the same path during that window (e.g. from a handler) is rejected with
//! [`NotasError::SaveInProgress`].

use crate::error::{NotasError, Result};
use crate::hub::{Event, NotificationHub};
use log::{error, info, warn};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::StorageBackend;

pub struct FileStore<B: StorageBackend> {
    backend: B,
    notes_dir: PathBuf,
    hub: Rc<NotificationHub>,
    in_flight: RefCell<HashSet<PathBuf>>,
}

impl<B: StorageBackend> FileStore<B> {
    /// Creates the store and makes sure the notes directory exists.
    ///
    /// A failure to create the directory is logged and published once as a
    /// `FileError`; the store is still returned so the session stays usable
    /// for files elsewhere.
    pub fn open(backend: B, notes_dir: PathBuf, hub: Rc<NotificationHub>) -> Self {
        if let Err(err) = backend.ensure_dir(&notes_dir) {
            error!(
                "event=notes_dir_create module=store status=error path={} error={}",
                notes_dir.display(),
                err
            );
            hub.publish(Event::FileError {
                message: format!(
                    "Error creating notes directory {}: {}",
                    notes_dir.display(),
                    err
                ),
            });
        }

        Self {
            backend,
            notes_dir,
            hub,
            in_flight: RefCell::new(HashSet::new()),
        }
    }

    pub fn notes_directory(&self) -> &Path {
        &self.notes_dir
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn hub(&self) -> &Rc<NotificationHub> {
        &self.hub
    }

    pub fn load(&self, path: &Path) -> Result<String> {
        match self.backend.read(path) {
            Ok(content) => {
                info!(
                    "event=file_loaded module=store status=ok path={} bytes={}",
                    path.display(),
                    content.len()
                );
                self.hub.publish(Event::FileLoaded {
                    path: path.to_path_buf(),
                    content: content.clone(),
                });
                Ok(content)
            }
            Err(err) => {
                self.report_failure(Op::Load, path, &err);
                Err(err)
            }
        }
    }

    pub fn save(&self, path: &Path, content: &str) -> Result<()> {
        let Some(_guard) = InFlight::claim(&self.in_flight, path) else {
            let err = NotasError::SaveInProgress(path.to_path_buf());
            self.report_failure(Op::Save, path, &err);
            return Err(err);
        };

        if let Err(err) = self.backend.write(path, content) {
            self.report_failure(Op::Save, path, &err);
            return Err(err);
        }

        info!(
            "event=file_saved module=store status=ok path={} bytes={}",
            path.display(),
            content.len()
        );
        self.hub.publish(Event::FileSaved {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    pub fn is_saving(&self, path: &Path) -> bool {
        self.in_flight.borrow().contains(path)
    }

    fn report_failure(&self, op: Op, path: &Path, err: &NotasError) {
        warn!(
            "event=file_{} module=store status=error path={} error={}",
            op.as_str(),
            path.display(),
            err
        );
        self.hub.publish(Event::FileError {
            message: format!("Error {} file {}: {}", op.verb(), path.display(), err),
        });
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Load,
    Save,
}

impl Op {
    fn as_str(self) -> &'static str {
        match self {
            Op::Load => "load",
            Op::Save => "save",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Op::Load => "loading",
            Op::Save => "saving",
        }
    }
}

/// Marks a path as being saved until dropped.
struct InFlight<'a> {
    set: &'a RefCell<HashSet<PathBuf>>,
    path: PathBuf,
}

impl<'a> InFlight<'a> {
    fn claim(set: &'a RefCell<HashSet<PathBuf>>, path: &Path) -> Option<Self> {
        if !set.borrow_mut().insert(path.to_path_buf()) {
            return None;
        }
        Some(Self {
            set,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.borrow_mut().remove(&self.path);
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::mem_backend::MemBackend;
    use super::*;
    use crate::hub::EventKind;

    pub const NOTES_DIR: &str = "/home/u/Notas";

    /// An in-memory store whose hub records every event it publishes.
    pub struct StoreFixture {
        pub store: FileStore<MemBackend>,
        pub events: Rc<RefCell<Vec<Event>>>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            let hub = Rc::new(NotificationHub::new());
            let events = Rc::new(RefCell::new(Vec::new()));
            for kind in EventKind::all() {
                let sink = Rc::clone(&events);
                hub.subscribe(*kind, move |e| {
                    sink.borrow_mut().push(e.clone());
                    Ok(())
                });
            }
            Self {
                store: FileStore::open(MemBackend::new(), PathBuf::from(NOTES_DIR), hub),
                events,
            }
        }

        /// Writes a note straight through the backend, without events.
        pub fn with_note(self, name: &str, content: &str) -> Self {
            let path = self.store.notes_directory().join(name);
            self.store.backend().write(&path, content).unwrap();
            self
        }

        pub fn path(&self, name: &str) -> PathBuf {
            self.store.notes_directory().join(name)
        }

        pub fn event_kinds(&self) -> Vec<EventKind> {
            self.events.borrow().iter().map(Event::kind).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::mem_backend::MemBackend;
    use super::*;
    use crate::hub::EventKind;

    fn setup() -> (FileStore<MemBackend>, Rc<RefCell<Vec<Event>>>) {
        let fixture = StoreFixture::new();
        (fixture.store, fixture.events)
    }

    #[test]
    fn test_open_creates_notes_dir() {
        let (store, events) = setup();
        assert!(store.backend().exists(Path::new("/home/u/Notas")));
        assert!(events.borrow().is_empty());
        assert_eq!(store.notes_directory(), Path::new("/home/u/Notas"));
    }

    #[test]
    fn test_open_reports_dir_failure_once() {
        let hub = Rc::new(NotificationHub::new());
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&errors);
        hub.subscribe(EventKind::FileError, move |e| {
            sink.borrow_mut().push(e.clone());
            Ok(())
        });

        let backend = MemBackend::new();
        backend.set_simulate_dir_error(true);
        let store = FileStore::open(backend, PathBuf::from("/ro/Notas"), hub);

        assert_eq!(errors.borrow().len(), 1);
        // Accessor never re-reports.
        let _ = store.notes_directory();
        assert_eq!(errors.borrow().len(), 1);
    }

    #[test]
    fn test_save_then_load_publishes_events() {
        let (store, events) = setup();
        let path = store.notes_directory().join("a.md");

        store.save(&path, "# Hello").unwrap();
        let content = store.load(&path).unwrap();

        assert_eq!(content, "# Hello");
        assert_eq!(
            *events.borrow(),
            vec![
                Event::FileSaved { path: path.clone() },
                Event::FileLoaded {
                    path: path.clone(),
                    content: "# Hello".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_load_missing_publishes_file_error() {
        let (store, events) = setup();
        let path = PathBuf::from("/home/u/Notas/missing.md");

        assert!(matches!(store.load(&path), Err(NotasError::Io(_))));

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::FileError { message } => {
                assert!(message.starts_with("Error loading file /home/u/Notas/missing.md"))
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_failed_save_is_not_fatal() {
        let (store, events) = setup();
        let path = store.notes_directory().join("a.md");

        store.backend().set_simulate_write_error(true);
        assert!(store.save(&path, "x").is_err());
        assert!(!store.is_saving(&path));

        store.backend().set_simulate_write_error(false);
        store.save(&path, "y").unwrap();

        let kinds: Vec<_> = events.borrow().iter().map(Event::kind).collect();
        assert_eq!(kinds, vec![EventKind::FileError, EventKind::FileSaved]);
    }

    #[test]
    fn test_fixture_with_note_loads() {
        let fixture = StoreFixture::new().with_note("seed.md", "seeded");
        let content = fixture.store.load(&fixture.path("seed.md")).unwrap();
        assert_eq!(content, "seeded");
        assert_eq!(fixture.event_kinds(), vec![EventKind::FileLoaded]);
    }
}
