use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{macros::format_description, OffsetDateTime};

const SUMMARY_LENGTH: usize = 50;

/// A custom error describing the rejected prompt interactions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    /// The commit message is empty, the prompt stays open.
    #[error("please enter a commit message")]
    EmptyMessage,
    /// There is no prompt to submit or cancel.
    #[error("there is no commit prompt open")]
    NotShown,
}

/// Where the commit prompt is in its cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptState {
    /// No prompt is visible.
    Idle,
    /// The prompt is visible for a changed file.
    Shown { file: PathBuf, suggestion: String },
    /// The commit is being pushed for a changed file.
    Pushing { file: PathBuf },
}

/// What the caller should do after a change was noticed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Open the prompt for this file with this suggested message.
    Show { file: PathBuf, suggestion: String },
    /// A prompt is already open, the change waits until it is closed.
    Queued,
}

/// The commit prompt state machine: `Idle -> Shown -> (Pushing | cancelled) -> Idle`.
///
/// Only one prompt is open at a time. Changes arriving while a prompt is open
/// or a push is running are kept in a single pending slot, and they open the
/// next prompt once the state machine is idle again, whatever the result of the push was.
#[derive(Debug)]
pub struct CommitPrompt {
    state: PromptState,
    pending: Option<PathBuf>,
}

impl Default for CommitPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitPrompt {
    pub fn new() -> Self {
        CommitPrompt {
            state: PromptState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> &PromptState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PathBuf> {
        self.pending.as_ref()
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.state, PromptState::Shown { .. })
    }

    /// The suggested message of the open prompt.
    pub fn suggestion(&self) -> Option<&str> {
        match &self.state {
            PromptState::Shown { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// React on a qualifying file change.
    pub fn notify(&mut self, file: PathBuf) -> Transition {
        match self.state {
            PromptState::Idle => self.show(file),
            PromptState::Shown { .. } | PromptState::Pushing { .. } => {
                debug!(
                    "A commit prompt is already open, queueing {}.",
                    file.to_string_lossy()
                );
                self.pending = Some(file);
                Transition::Queued
            }
        }
    }

    /// Accept the message and move to pushing. An empty message is rejected and the prompt stays open.
    pub fn begin_push(&mut self, message: &str) -> Result<String, PromptError> {
        let file = match &self.state {
            PromptState::Shown { file, .. } => file.clone(),
            _ => return Err(PromptError::NotShown),
        };
        let message = message.trim();
        if message.is_empty() {
            return Err(PromptError::EmptyMessage);
        }

        debug!("Pushing commit {:?}.", summary_line(message));
        self.state = PromptState::Pushing { file };

        Ok(message.to_string())
    }

    /// The push finished, successfully or not.
    pub fn complete_push(&mut self) {
        if matches!(self.state, PromptState::Pushing { .. }) {
            self.state = PromptState::Idle;
        }
    }

    /// Close the prompt without pushing, discarding the change it was opened for.
    pub fn cancel(&mut self) -> Result<(), PromptError> {
        match &self.state {
            PromptState::Shown { file, .. } => {
                debug!("Cancelled commit of {}.", file.to_string_lossy());
                self.state = PromptState::Idle;
                Ok(())
            }
            _ => Err(PromptError::NotShown),
        }
    }

    /// Open the prompt for the queued change, if there is one and the state machine is idle.
    pub fn resume(&mut self) -> Option<Transition> {
        if self.state != PromptState::Idle {
            return None;
        }

        self.pending.take().map(|file| self.show(file))
    }

    fn show(&mut self, file: PathBuf) -> Transition {
        let suggestion = suggest_message(&file);
        self.state = PromptState::Shown {
            file: file.clone(),
            suggestion: suggestion.clone(),
        };

        Transition::Show { file, suggestion }
    }
}

/// The message offered in the prompt, e.g. `Update room.lpz - 2024-05-01 14:30`.
pub fn suggest_message(file: &Path) -> String {
    let name = file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string_lossy().to_string());
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let timestamp = now
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_default();

    format!("Update {name} - {timestamp}")
}

/// The first line of the message, shortened for notifications.
pub fn summary_line(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or_default();
    if first_line.chars().count() <= SUMMARY_LENGTH {
        first_line.to_string()
    } else {
        let shortened: String = first_line.chars().take(SUMMARY_LENGTH).collect();
        format!("{shortened}...")
    }
}
