use crate::{config::ConfigError, config::WatchConfiguration, triggers::Event};
use mockall::automock;
use std::{path::PathBuf, sync::mpsc::Sender};
use thiserror::Error;

/// Matching changed paths against the watched file pattern.
pub mod filter;
/// The watcher backed by the operating system's notification facility.
pub mod fs;

/// A custom error describing why monitoring cannot start.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The configuration is incomplete or points to missing paths.
    #[error("not configured correctly: {0}")]
    ConfigInvalid(#[from] ConfigError),
    /// The operating system refused the watch registration.
    #[error("cannot watch directory: {0}")]
    StartFailed(#[from] notify::Error),
}

/// A qualifying change of a watched file, after debouncing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileChange {
    /// The file that was created or modified.
    pub path: PathBuf,
    /// The monitoring session that noticed the change.
    pub generation: u64,
}

/// Observes a directory and delivers qualifying changes into the event loop.
#[automock]
pub trait Monitor {
    /// Start observing the configured watch path. Any previous session is stopped first,
    /// even if the new configuration turns out to be invalid.
    /// Returns the generation, which every [FileChange] of this session carries.
    fn start_monitoring(
        &mut self,
        config: &WatchConfiguration,
        tx: Sender<Option<Event>>,
    ) -> Result<u64, WatchError>;
    /// Stop observing. Safe to call when not monitoring.
    fn stop_monitoring(&mut self);
    fn is_monitoring(&self) -> bool;
    /// The directory of the active session, which may differ from the edited configuration.
    fn watched_path(&self) -> Option<PathBuf>;
    /// Whether a change belongs to the currently active session.
    fn is_current(&self, generation: u64) -> bool;
}
