use crate::watch::FileChange;
use mockall::automock;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// A trigger that terminates the program on a signal.
pub mod signal;
/// A trigger that reads the user's input from the terminal.
pub mod terminal;

/// Everything the event loop reacts on. A `None` on the channel stops the loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A watched file was created or modified.
    Changed(FileChange),
    /// A line typed by the user: a commit message or a menu command.
    Input(String),
}

/// A custom error for describing the error cases for triggers
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Cannot send with the Sender. This usually because the receiver is dropped.
    #[error("cannot send event, receiver hang up")]
    ReceiverHangup(#[from] std::sync::mpsc::SendError<Option<Event>>),
    /// Reading the source of events failed.
    #[error("{0}")]
    FailedTrigger(String),
}

/// A trigger is a long running background process, which produces events.
///
/// Triggers may include:
///   - terminal input ([terminal::TerminalTrigger])
///   - termination signals ([signal::SignalTrigger])
///
/// File changes are delivered by the [Monitor](crate::watch::Monitor), because
/// it has to be restarted whenever the configuration changes.
#[automock]
pub trait Trigger: Sync + Send {
    /// Start the trigger process.
    fn listen(&self, tx: Sender<Option<Event>>) -> Result<(), TriggerError>;
}
