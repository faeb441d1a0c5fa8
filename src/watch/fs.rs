use super::{filter::ChangeFilter, FileChange, Monitor, WatchError};
use crate::{config::WatchConfiguration, triggers::Event};
use log::{debug, error, info, trace, warn};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind, Debouncer};
use std::{path::PathBuf, sync::mpsc::Sender};

/// A watcher on the directory, backed by the operating system (inotify, FSEvents, ...).
///
/// Events are debounced per path: a save that writes the file several times
/// within the debounce window results in a single [FileChange]. The watch
/// handle is held until [Monitor::stop_monitoring] or until this is dropped.
#[derive(Default)]
pub struct FsWatcher {
    debouncer: Option<Debouncer<RecommendedWatcher>>,
    watched: Option<PathBuf>,
    generation: u64,
}

impl FsWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn forward(
        result: DebounceEventResult,
        filter: &ChangeFilter,
        generation: u64,
        tx: &Sender<Option<Event>>,
    ) {
        let events = match result {
            Ok(events) => events,
            Err(err) => {
                error!("Watching failed: {err}.");
                return;
            }
        };

        for event in events {
            // Continuous events are followed by a final one once the writes settle
            if event.kind != DebouncedEventKind::Any {
                continue;
            }
            if !filter.matches(&event.path) || !event.path.is_file() {
                trace!("Ignoring change of {}.", event.path.to_string_lossy());
                continue;
            }

            debug!("Detected change in {}.", event.path.to_string_lossy());
            let change = FileChange {
                path: event.path,
                generation,
            };
            if tx.send(Some(Event::Changed(change))).is_err() {
                warn!("Cannot deliver the change, receiver hang up.");
            }
        }
    }
}

impl Monitor for FsWatcher {
    fn start_monitoring(
        &mut self,
        config: &WatchConfiguration,
        tx: Sender<Option<Event>>,
    ) -> Result<u64, WatchError> {
        self.stop_monitoring();
        config.validate()?;
        let filter = ChangeFilter::new(&config.watched_pattern)?;

        self.generation += 1;
        let generation = self.generation;

        let mut debouncer = new_debouncer(config.debounce(), move |result: DebounceEventResult| {
            FsWatcher::forward(result, &filter, generation, &tx)
        })?;
        let mode = if config.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(&config.watch_path, mode)?;

        info!(
            "Monitoring {} for {} files.",
            config.watch_path.to_string_lossy(),
            config.watched_pattern
        );
        self.debouncer = Some(debouncer);
        self.watched = Some(config.watch_path.clone());

        Ok(generation)
    }

    fn stop_monitoring(&mut self) {
        // Dropping the debouncer releases the watch handle and stops its thread
        if self.debouncer.take().is_some() {
            if let Some(path) = self.watched.take() {
                info!("Stopped monitoring {}.", path.to_string_lossy());
            }
        }
    }

    fn is_monitoring(&self) -> bool {
        self.debouncer.is_some()
    }

    fn watched_path(&self) -> Option<PathBuf> {
        self.watched.clone()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.is_monitoring() && generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use duct::cmd;
    use rand::distributions::{Alphanumeric, DistString};
    use std::{
        error::Error,
        fs,
        sync::mpsc::{self, Receiver},
        thread::sleep,
        time::Duration,
    };

    const DEBOUNCE_MS: u64 = 300;

    fn get_random_id() -> String {
        Alphanumeric.sample_string(&mut rand::thread_rng(), 16)
    }

    fn create_directories(local: &str) -> Result<WatchConfiguration, Box<dyn Error>> {
        fs::create_dir_all(format!("{local}/watch"))?;
        fs::create_dir_all(format!("{local}/other"))?;
        fs::create_dir_all(format!("{local}/repo"))?;
        cmd!("git", "init").dir(format!("{local}/repo")).read()?;

        Ok(WatchConfiguration {
            watch_path: fs::canonicalize(format!("{local}/watch"))?,
            repo_path: PathBuf::from(format!("{local}/repo")),
            debounce_ms: DEBOUNCE_MS,
            ..WatchConfiguration::default()
        })
    }

    fn receive_changes(rx: &Receiver<Option<Event>>) -> Vec<FileChange> {
        let mut changes = vec![];
        while let Ok(Some(Event::Changed(change))) =
            rx.recv_timeout(Duration::from_millis(DEBOUNCE_MS * 5))
        {
            changes.push(change);
        }
        changes
    }

    #[test]
    fn it_should_fail_if_the_watch_path_is_missing() {
        let mut watcher = FsWatcher::new();
        let (tx, _rx) = mpsc::channel::<Option<Event>>();
        let config = WatchConfiguration {
            watch_path: PathBuf::from("/path/to/nowhere"),
            ..WatchConfiguration::default()
        };

        let error = watcher.start_monitoring(&config, tx).err().unwrap();
        assert!(
            matches!(
                error,
                WatchError::ConfigInvalid(ConfigError::WatchPathNotFound(_))
            ),
            "{error:?} should be ConfigInvalid"
        );
        assert!(!watcher.is_monitoring());
    }

    #[test]
    fn it_should_stop_the_old_session_if_the_new_config_is_invalid() -> Result<(), Box<dyn Error>> {
        let id = get_random_id();
        let local = format!("test_directories/{id}");
        let config = create_directories(&local)?;

        let mut watcher = FsWatcher::new();
        let (tx, _rx) = mpsc::channel::<Option<Event>>();
        let generation = watcher.start_monitoring(&config, tx.clone())?;

        let invalid = WatchConfiguration {
            watch_path: PathBuf::from(format!("{local}/missing")),
            ..config
        };
        let result = watcher.start_monitoring(&invalid, tx);

        assert!(matches!(result, Err(WatchError::ConfigInvalid(_))));
        assert!(!watcher.is_monitoring());
        assert!(!watcher.is_current(generation));
        assert_eq!(None, watcher.watched_path());

        fs::remove_dir_all(local)?;

        Ok(())
    }

    #[test]
    fn it_should_stop_even_if_it_has_not_started() {
        let mut watcher = FsWatcher::new();
        watcher.stop_monitoring();
        watcher.stop_monitoring();

        assert!(!watcher.is_monitoring());
        assert!(!watcher.is_current(0));
    }

    #[test]
    fn it_should_collapse_repeated_writes_into_one_change() -> Result<(), Box<dyn Error>> {
        let id = get_random_id();
        let local = format!("test_directories/{id}");
        let config = create_directories(&local)?;

        let mut watcher = FsWatcher::new();
        let (tx, rx) = mpsc::channel::<Option<Event>>();
        let generation = watcher.start_monitoring(&config, tx)?;

        // A compiler writing the file in multiple steps
        let file = config.watch_path.join("room.lpz");
        fs::write(&file, "1")?;
        fs::write(&file, "12")?;
        fs::write(&file, "123")?;
        fs::write(config.watch_path.join("notes.txt"), "ignored")?;

        let changes = receive_changes(&rx);
        assert_eq!(
            vec![FileChange {
                path: file,
                generation
            }],
            changes
        );
        assert!(watcher.is_current(generation));

        watcher.stop_monitoring();
        assert!(!watcher.is_current(generation));
        fs::remove_dir_all(local)?;

        Ok(())
    }

    #[test]
    fn it_should_only_watch_the_new_path_after_a_restart() -> Result<(), Box<dyn Error>> {
        let id = get_random_id();
        let local = format!("test_directories/{id}");
        let config = create_directories(&local)?;

        let mut watcher = FsWatcher::new();
        let (tx, rx) = mpsc::channel::<Option<Event>>();
        let first = watcher.start_monitoring(&config, tx.clone())?;

        watcher.stop_monitoring();
        let config = WatchConfiguration {
            watch_path: fs::canonicalize(format!("{local}/other"))?,
            ..config
        };
        let second = watcher.start_monitoring(&config, tx)?;
        assert_ne!(first, second);
        assert!(!watcher.is_current(first));
        assert_eq!(Some(config.watch_path.clone()), watcher.watched_path());

        // Give the old watcher a chance to misbehave
        sleep(Duration::from_millis(50));
        fs::write(format!("{local}/watch/old.lpz"), "1")?;
        fs::write(config.watch_path.join("new.lpz"), "1")?;

        let changes = receive_changes(&rx);
        assert_eq!(1, changes.len());
        assert_eq!(config.watch_path.join("new.lpz"), changes[0].path);
        assert_eq!(second, changes[0].generation);

        watcher.stop_monitoring();
        fs::remove_dir_all(local)?;

        Ok(())
    }
}
