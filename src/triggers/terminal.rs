use super::{Event, Trigger, TriggerError};
use log::debug;
use std::{
    io::{self, BufRead},
    sync::mpsc::Sender,
};

/// A trigger that forwards every line typed into the terminal.
///
/// This stands in for the window, the dialogs and the tray menu: the event
/// loop decides whether a line is a commit message or a command.
pub struct TerminalTrigger;

impl TerminalTrigger {
    fn listen_inner<R: BufRead>(
        &self,
        tx: Sender<Option<Event>>,
        input: R,
    ) -> Result<(), TriggerError> {
        for line in input.lines() {
            let line = line.map_err(|err| TriggerError::FailedTrigger(err.to_string()))?;
            tx.send(Some(Event::Input(line)))?;
        }

        // Running without a terminal is fine, the signals and the watcher still work.
        debug!("The terminal input is closed, not reading commands anymore.");

        Ok(())
    }
}

impl Trigger for TerminalTrigger {
    fn listen(&self, tx: Sender<Option<Event>>) -> Result<(), TriggerError> {
        self.listen_inner(tx, io::stdin().lock())
    }
}
