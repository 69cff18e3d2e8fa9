//! # Notas Architecture
//!
//! Notas is an **event-driven note-taking core**. Components do not call into
//! the UI; they publish [`hub::Event`]s on a shared [`hub::NotificationHub`]
//! and the UI (the bundled CLI, or any other front end) subscribes to the
//! kinds it cares about.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  UI Layer (main.rs + args.rs)                               │
//! │  - Parses arguments, subscribes to the hub, prints output   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the editing session (current Note)                  │
//! │  - Wires store, catalog, advisor and command runner         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Components                                                 │
//! │  stats · templates · context · capture · markdown · shell   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait: FsBackend, MemBackend              │
//! │  - FileStore: notes dir, events, save serialization         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every layer publishes on the same `Rc<NotificationHub>`, created once by
//! the caller and handed to [`api::NotasApi::new`].
//!
//! ## Threading
//!
//! The hub, store and session are single-threaded (`Rc`, `RefCell`). The
//! only worker threads are the ones [`shell::CommandRunner`] spawns, and they
//! report back through a channel that the event loop drains with `poll`.
//!
//! ## Failure Model
//!
//! No single failure is fatal. A failed load or save is returned to the
//! caller *and* published as `FileError`; a failing or panicking subscriber
//! is logged and skipped while the rest still receive the event.
//!
//! ## Module Overview
//!
//! - [`api`]: The session facade, entry point for all operations
//! - [`hub`]: Typed publish/subscribe bus
//! - [`store`]: Storage abstraction and implementations
//! - [`stats`]: Line/word/character counts
//! - [`templates`]: Built-in quick-capture templates
//! - [`context`]: Time/application context and note suggestions
//! - [`capture`]: Template drafts and committing them to disk
//! - [`markdown`]: HTML preview
//! - [`shell`]: Background shell commands
//! - [`settings`]: Persisted boolean settings
//! - [`config`]: Configuration management
//! - [`logging`]: File logger bootstrap
//! - [`error`]: Error types

pub mod api;
pub mod capture;
pub mod config;
pub mod context;
pub mod error;
pub mod hub;
pub mod logging;
pub mod markdown;
pub mod model;
pub mod settings;
pub mod shell;
pub mod stats;
pub mod store;
pub mod templates;
