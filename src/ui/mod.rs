use crate::config::WatchConfiguration;
use mockall::automock;
use std::path::{Path, PathBuf};

/// The commands accepted outside of the commit prompt.
pub mod command;
/// The rendering surface on the terminal.
pub mod terminal;

/// How a notification should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A short message surfaced to the user, e.g. the result of a push.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn success(title: &str, message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn warning(title: &str, message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// The rendering surface: the configuration window, the commit dialog and the
/// tray notifications. Only the state machines decide what is shown, this draws it.
#[automock]
pub trait Ui {
    /// Show the configuration window with the edited settings and the directory
    /// that is actually monitored, if any.
    fn show_window(&mut self, config: &WatchConfiguration, watching: Option<PathBuf>);
    /// Hide the configuration window, leaving only the tray.
    fn hide_window(&mut self);
    /// Show the modal commit prompt for a changed file.
    fn show_prompt(&mut self, file: &Path, suggestion: &str);
    /// Show an inline message in the commit prompt, leaving it open.
    fn show_validation(&mut self, message: &str);
    fn close_prompt(&mut self);
    fn notify(&mut self, notice: &Notice);
}
