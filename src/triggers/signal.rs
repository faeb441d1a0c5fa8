use super::{Event, Trigger, TriggerError};
use log::debug;
use std::sync::{atomic::AtomicU8, mpsc::Sender};

/// A trigger that stops the event loop on a termination signal.
///
/// The first signal asks for a clean exit (the watcher is stopped), the second
/// one exits immediately.
pub struct SignalTrigger {
    received: AtomicU8,
}

impl SignalTrigger {
    pub fn new() -> SignalTrigger {
        SignalTrigger {
            received: AtomicU8::new(0),
        }
    }

    #[cfg(unix)]
    fn listen_inner<I>(&self, tx: Sender<Option<Event>>, signals: I) -> Result<(), TriggerError>
    where
        I: IntoIterator<Item = i32>,
    {
        use log::error;
        use std::{process, sync::atomic::Ordering, thread::sleep, time::Duration};

        for signal in signals {
            if self.received.fetch_add(1, Ordering::AcqRel) == 0 {
                debug!("Got signal {signal}, stopping monitoring and exiting.");
                if tx.send(None).is_err() {
                    error!("Failed exiting the application with signal {signal}.");
                }
            } else {
                // A push might still be running, leave it a moment to finish.
                sleep(Duration::from_millis(100));
                debug!("Got signal {signal} again, exiting right now.");
                process::exit(signal);
            }
        }

        Ok(())
    }
}

impl Default for SignalTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl Trigger for SignalTrigger {
    /// Iterates over the termination signals and stops the event loop.
    #[cfg(unix)]
    fn listen(&self, tx: Sender<Option<Event>>) -> Result<(), TriggerError> {
        use signal_hook::{
            consts::TERM_SIGNALS,
            iterator::{exfiltrator::SignalOnly, SignalsInfo},
        };

        let mut signals = SignalsInfo::<SignalOnly>::new(TERM_SIGNALS)
            .map_err(|err| TriggerError::FailedTrigger(format!("cannot listen to signals: {err}")))?;
        self.listen_inner(tx, &mut signals)
    }

    #[cfg(not(unix))]
    fn listen(&self, _tx: Sender<Option<Event>>) -> Result<(), TriggerError> {
        debug!("Signal handlers are not supported on non-unix systems.");

        Ok(())
    }
}
