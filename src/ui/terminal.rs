use super::{command::HELP, Notice, NoticeLevel, Ui};
use crate::config::WatchConfiguration;
use log::warn;
use std::{
    io::{self, Stdout, Write},
    path::{Path, PathBuf},
};

/// Draws the window, the prompt and the notifications as plain text.
pub struct TerminalUi<W: Write> {
    out: W,
}

impl TerminalUi<Stdout> {
    pub fn stdout() -> Self {
        TerminalUi { out: io::stdout() }
    }
}

impl<W: Write> TerminalUi<W> {
    pub fn new(out: W) -> Self {
        TerminalUi { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        let result = writeln!(self.out, "{text}").and_then(|_| self.out.flush());
        if let Err(err) = result {
            warn!("Cannot write to the terminal: {err}.");
        }
    }
}

impl<W: Write> Ui for TerminalUi<W> {
    fn show_window(&mut self, config: &WatchConfiguration, watching: Option<PathBuf>) {
        let status = match watching {
            Some(path) if path == config.watch_path => {
                format!("Monitoring: {}", path.to_string_lossy())
            }
            Some(path) => format!(
                "Monitoring: {} (stop and start to apply the new settings)",
                path.to_string_lossy()
            ),
            None => String::from("Ready to start monitoring..."),
        };
        let window = format!(
            "== Git Auto-Sync Monitor ==
  Path to watch:   {}
  Git repository:  {}
  File pattern:    {}
  Default remote:  {}
  Default branch:  {}
  Recursive:       {}
  Debounce:        {}ms
{status}
{HELP}",
            config.watch_path.to_string_lossy(),
            config.repo_path.to_string_lossy(),
            config.watched_pattern,
            config.remote(),
            config.branch(),
            config.recursive,
            config.debounce_ms,
        );
        self.write(&window);
    }

    fn hide_window(&mut self) {
        self.write("Minimized to tray, type `open` to show the settings again.");
    }

    fn show_prompt(&mut self, file: &Path, suggestion: &str) {
        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| file.to_string_lossy().to_string());
        self.write(&format!(
            "File changed: {name}\nCommit message (`:default` for \"{suggestion}\", `:cancel` to skip):"
        ));
    }

    fn show_validation(&mut self, message: &str) {
        self.write(&format!("! {message}"));
    }

    fn close_prompt(&mut self) {}

    fn notify(&mut self, notice: &Notice) {
        let marker = match notice.level {
            NoticeLevel::Info => "*",
            NoticeLevel::Success => "+",
            NoticeLevel::Warning => "~",
            NoticeLevel::Error => "!",
        };
        self.write(&format!("{marker} {}: {}", notice.title, notice.message));
    }
}
