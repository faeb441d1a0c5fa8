use crate::{app::App, triggers::Trigger};
use log::{debug, error, warn};
use std::thread;
use thiserror::Error;

/// A custom error implementation for the start function
#[derive(Debug, Error)]
pub enum StartError {
    #[error("You have to define at least one trigger.")]
    NoTriggers,
}

/// How the program should come up.
#[derive(Clone, Copy, Debug, Default)]
pub struct StartOptions {
    /// Start monitoring right away with the loaded settings.
    pub monitor: bool,
    /// Go to the tray after monitoring started.
    pub minimize: bool,
}

/// The main program loop, that runs the triggers and hands every event to the application.
pub fn start(
    triggers: Vec<Box<dyn Trigger>>,
    app: &mut App,
    options: StartOptions,
) -> Result<(), StartError> {
    if triggers.is_empty() {
        return Err(StartError::NoTriggers);
    }

    app.open();
    if options.monitor {
        if app.start_monitoring() && options.minimize {
            app.minimize();
        }
    } else if options.minimize {
        warn!("Cannot minimize without monitoring, pass --start as well.");
    }

    for trigger in triggers {
        let tx = app.sender();
        thread::spawn(move || {
            let result = trigger.listen(tx);
            if let Err(err) = result {
                error!("Trigger failed: {err}.");
            }
        });
    }

    debug!("Waiting on triggers.");
    app.run();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::WatchConfiguration,
        triggers::{Event, MockTrigger},
        ui::MockUi,
        vcs::MockVcs,
        watch::{FileChange, MockMonitor},
    };
    use std::path::PathBuf;

    fn ui() -> MockUi {
        let mut ui = MockUi::new();
        ui.expect_show_window().return_const(());
        ui
    }

    fn monitor() -> MockMonitor {
        let mut monitor = MockMonitor::new();
        monitor.expect_is_monitoring().return_const(false);
        monitor.expect_watched_path().return_const(None::<PathBuf>);
        monitor.expect_is_current().return_const(true);
        monitor.expect_stop_monitoring().return_const(());
        monitor
    }

    #[test]
    fn it_should_handle_events_until_the_trigger_ends() {
        // Setup mock triggers.
        let mut mock_trigger = MockTrigger::new();
        mock_trigger.expect_listen().returning(|tx| {
            tx.send(Some(Event::Changed(FileChange {
                path: PathBuf::from("/projects/room.lpz"),
                generation: 1,
            })))?;
            tx.send(None)?;
            Ok(())
        });
        let triggers: Vec<Box<dyn Trigger>> = vec![Box::new(mock_trigger)];

        // Setup mock ui.
        let mut mock_ui = ui();
        mock_ui.expect_show_prompt().times(1).return_const(());

        let mut app = App::new(
            WatchConfiguration::default(),
            Box::new(monitor()),
            Box::new(MockVcs::new()),
            Box::new(mock_ui),
        );

        let result = start(triggers, &mut app, StartOptions::default());
        assert!(result.is_ok());
        assert!(app.prompt().is_shown());
    }

    #[test]
    fn it_should_stop_on_exit() {
        // Setup mock triggers.
        let mut mock_trigger = MockTrigger::new();
        mock_trigger.expect_listen().returning(|tx| {
            tx.send(Some(Event::Input(String::from("exit"))))?;
            Ok(())
        });
        let triggers: Vec<Box<dyn Trigger>> = vec![Box::new(mock_trigger)];

        // Setup mock monitor.
        let mut mock_monitor = MockMonitor::new();
        mock_monitor.expect_is_monitoring().return_const(false);
        mock_monitor
            .expect_watched_path()
            .return_const(None::<PathBuf>);
        mock_monitor.expect_stop_monitoring().times(1..).return_const(());

        let mut app = App::new(
            WatchConfiguration::default(),
            Box::new(mock_monitor),
            Box::new(MockVcs::new()),
            Box::new(ui()),
        );

        let result = start(triggers, &mut app, StartOptions::default());
        assert!(result.is_ok());
    }

    #[test]
    fn it_should_keep_running_if_autostart_fails() {
        // Setup mock triggers.
        let mut mock_trigger = MockTrigger::new();
        mock_trigger.expect_listen().returning(|tx| {
            tx.send(None)?;
            Ok(())
        });
        let triggers: Vec<Box<dyn Trigger>> = vec![Box::new(mock_trigger)];

        // Setup mock monitor.
        let mut mock_monitor = MockMonitor::new();
        mock_monitor.expect_is_monitoring().return_const(false);
        mock_monitor
            .expect_watched_path()
            .return_const(None::<PathBuf>);
        mock_monitor.expect_stop_monitoring().return_const(());
        mock_monitor.expect_start_monitoring().times(1).returning(|_, _| {
            Err(crate::watch::WatchError::ConfigInvalid(
                crate::config::ConfigError::MissingWatchPath,
            ))
        });

        // Setup mock ui.
        let mut mock_ui = ui();
        mock_ui.expect_notify().times(1).return_const(());
        mock_ui.expect_hide_window().times(0);

        let mut app = App::new(
            WatchConfiguration::default(),
            Box::new(mock_monitor),
            Box::new(MockVcs::new()),
            Box::new(mock_ui),
        );

        let options = StartOptions {
            monitor: true,
            minimize: true,
        };
        let result = start(triggers, &mut app, options);
        assert!(result.is_ok());
    }

    #[test]
    fn it_should_fail_without_triggers() {
        // Setup empty triggers.
        let triggers: Vec<Box<dyn Trigger>> = vec![];

        // Setup mock ui.
        let mut mock_ui = MockUi::new();
        mock_ui.expect_show_window().times(0);

        let mut app = App::new(
            WatchConfiguration::default(),
            Box::new(MockMonitor::new()),
            Box::new(MockVcs::new()),
            Box::new(mock_ui),
        );

        let result = start(triggers, &mut app, StartOptions::default());
        assert!(result.is_err());
    }
}
