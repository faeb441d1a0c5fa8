//! Watch a local directory for saved project files and push them to a git remote.
//!
//! ## How it works
//!
//! `git-autosync` is built up from **triggers**, a single **event loop** and
//! a handful of small controllers. Triggers are long running background
//! threads that produce events (filesystem changes, terminal input, signals).
//! The event loop consumes them one by one, so every prompt and every git
//! invocation runs serialized on the same thread.
//!
//! ```ignore
//! +---------+       +------------+       +---------------+       +-----+
//! | watcher | ----> | event loop | ----> | commit prompt | ----> | git |
//! +---------+       +------------+       +---------------+       +-----+
//!                         |
//!                         +------------> tray menu ------------> git
//! ```
//!

/// The application state driven by the event loop.
pub mod app;
/// The persisted watch configuration.
pub mod config;
/// The user-facing error categories.
pub mod error;
/// The commit prompt state machine.
pub mod prompt;
/// The main program loop, that runs the triggers and dispatches their events.
pub mod start;
/// The tray menu actions and window visibility.
pub mod tray;
/// A trigger is a long running background process, which produces events
/// (e.g. [terminal input](triggers::terminal::TerminalTrigger) or
/// [signals](triggers::signal::SignalTrigger)).
pub mod triggers;
/// The rendering surface for the window, the dialogs and the notifications.
pub mod ui;
/// Wrapper around the external version control executable.
pub mod vcs;
/// Filesystem monitoring of the watched directory.
pub mod watch;
