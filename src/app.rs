use crate::{
    config::{ConfigStore, WatchConfiguration},
    error::AppError,
    prompt::{summary_line, CommitPrompt, Transition},
    tray::{MenuAction, Tray, Visibility},
    triggers::Event,
    ui::{
        command::{Command, PromptInput, HELP},
        Notice, Ui,
    },
    vcs::{commit_and_push, Vcs},
    watch::{FileChange, Monitor},
};
use log::{debug, error, info, warn};
use std::sync::mpsc::{self, Receiver, Sender};

/// Whether the event loop should keep going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The whole application state, owned by the event loop.
///
/// The configuration lives here and is lent to the watcher and the version
/// control calls. Every event is handled to completion before the next one,
/// so a push blocks everything else until git returns.
pub struct App {
    config: WatchConfiguration,
    store: Option<ConfigStore>,
    monitor: Box<dyn Monitor>,
    vcs: Box<dyn Vcs>,
    ui: Box<dyn Ui>,
    prompt: CommitPrompt,
    tray: Tray,
    tx: Sender<Option<Event>>,
    rx: Receiver<Option<Event>>,
}

impl App {
    pub fn new(
        config: WatchConfiguration,
        monitor: Box<dyn Monitor>,
        vcs: Box<dyn Vcs>,
        ui: Box<dyn Ui>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<Option<Event>>();
        App {
            config,
            store: None,
            monitor,
            vcs,
            ui,
            prompt: CommitPrompt::new(),
            tray: Tray::new(),
            tx,
            rx,
        }
    }

    /// Persist the configuration every time monitoring starts.
    pub fn with_store(mut self, store: ConfigStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &WatchConfiguration {
        &self.config
    }

    pub fn prompt(&self) -> &CommitPrompt {
        &self.prompt
    }

    pub fn visibility(&self) -> Visibility {
        self.tray.visibility()
    }

    /// A sender for the triggers to deliver their events.
    pub fn sender(&self) -> Sender<Option<Event>> {
        self.tx.clone()
    }

    /// Show the configuration window, like on a fresh launch.
    pub fn open(&mut self) {
        self.ui.show_window(&self.config, self.monitor.watched_path());
    }

    /// Process events until an exit is requested or a trigger sends `None`.
    pub fn run(&mut self) {
        debug!("Waiting on events.");
        while let Ok(Some(event)) = self.rx.recv() {
            if self.handle(event) == Flow::Exit {
                break;
            }
        }
        self.shutdown();
        debug!("Finished running.");
    }

    pub fn handle(&mut self, event: Event) -> Flow {
        match event {
            Event::Changed(change) => {
                self.on_change(change);
                Flow::Continue
            }
            Event::Input(line) => self.on_input(&line),
        }
    }

    /// Stop monitoring and release the watch handle.
    pub fn shutdown(&mut self) {
        self.monitor.stop_monitoring();
    }

    /// Start watching with the current settings and remember them. Returns whether it worked,
    /// the failure is already reported to the user.
    pub fn start_monitoring(&mut self) -> bool {
        if let Err(err) = self.monitor.start_monitoring(&self.config, self.tx.clone()) {
            self.report("Cannot start monitoring", err.into());
            return false;
        }

        if let Some(store) = &self.store {
            if let Err(err) = store.save(&self.config) {
                warn!("{err}.");
            }
        }
        self.ui.notify(&Notice::success(
            "Success",
            format!(
                "Monitoring started: {}",
                self.config.watch_path.to_string_lossy()
            ),
        ));

        true
    }

    pub fn stop_monitoring(&mut self) {
        self.monitor.stop_monitoring();
    }

    /// Hide the window to the tray, refused when nothing is being monitored.
    pub fn minimize(&mut self) {
        match self.tray.minimize(self.monitor.is_monitoring()) {
            Ok(()) => self.ui.hide_window(),
            Err(err) => {
                let err = AppError::from(err);
                warn!("Cannot minimize: {err}.");
                self.ui.notify(&Notice::warning("Warning", err.to_string()));
            }
        }
    }

    fn on_change(&mut self, change: FileChange) {
        if !self.monitor.is_current(change.generation) {
            debug!(
                "Ignoring change of {} from an earlier monitoring session.",
                change.path.to_string_lossy()
            );
            return;
        }

        match self.prompt.notify(change.path) {
            Transition::Show { file, suggestion } => self.ui.show_prompt(&file, &suggestion),
            Transition::Queued => {}
        }
    }

    fn on_input(&mut self, line: &str) -> Flow {
        if self.prompt.is_shown() {
            return self.on_prompt_input(line);
        }

        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }
        match line.parse::<Command>() {
            Ok(command) => self.on_command(command),
            Err(err) => {
                self.ui.notify(&Notice::error("Error", format!("{err}\n{HELP}")));
                Flow::Continue
            }
        }
    }

    fn on_prompt_input(&mut self, line: &str) -> Flow {
        match PromptInput::parse(line) {
            PromptInput::Cancel => self.cancel_prompt(),
            PromptInput::AcceptSuggestion => {
                let suggestion = self.prompt.suggestion().unwrap_or_default().to_string();
                self.submit(&suggestion);
            }
            PromptInput::Menu(MenuAction::Exit) => {
                self.cancel_prompt();
                return self.on_menu(MenuAction::Exit);
            }
            PromptInput::Menu(action) => return self.on_menu(action),
            PromptInput::Message(message) => self.submit(&message),
        }

        self.resume_pending();
        Flow::Continue
    }

    fn cancel_prompt(&mut self) {
        if self.prompt.cancel().is_ok() {
            self.ui.close_prompt();
        }
    }

    fn submit(&mut self, message: &str) {
        let message = match self.prompt.begin_push(message) {
            Ok(message) => message,
            Err(err) => {
                let err = AppError::from(err);
                self.ui.show_validation(&err.to_string());
                return;
            }
        };

        let result = commit_and_push(self.vcs.as_ref(), &self.config, &message);
        self.prompt.complete_push();
        self.ui.close_prompt();

        match result {
            Ok(_) => {
                info!("Successfully pushed changes: {}.", summary_line(&message));
                self.ui.notify(&Notice::success(
                    "Success",
                    format!(
                        "Changes pushed successfully! Commit: {}",
                        summary_line(&message)
                    ),
                ));
            }
            Err(err) => self.report("Failed to push changes", err.into()),
        }
    }

    fn resume_pending(&mut self) {
        if let Some(Transition::Show { file, suggestion }) = self.prompt.resume() {
            self.ui.show_prompt(&file, &suggestion);
        }
    }

    fn on_command(&mut self, command: Command) -> Flow {
        match command {
            Command::StartMonitoring => {
                self.start_monitoring();
            }
            Command::StopMonitoring => {
                self.stop_monitoring();
                self.ui.notify(&Notice::info("Stopped", "Monitoring stopped"));
            }
            Command::Set(field, value) => match self.config.set(&field, &value) {
                Ok(()) => {
                    self.open();
                    let restart = matches!(
                        field.as_str(),
                        "watch" | "pattern" | "recursive" | "debounce"
                    );
                    if restart && self.monitor.is_monitoring() {
                        self.ui.notify(&Notice::info(
                            "Settings changed",
                            "Stop and start monitoring to apply the new settings",
                        ));
                    }
                }
                Err(err) => self.report("Cannot change setting", err.into()),
            },
            Command::Minimize => self.minimize(),
            Command::Help => self.ui.notify(&Notice::info("Help", HELP)),
            Command::Menu(action) => return self.on_menu(action),
        }

        Flow::Continue
    }

    fn on_menu(&mut self, action: MenuAction) -> Flow {
        match action {
            MenuAction::Reopen => {
                self.tray.reopen();
                self.open();
            }
            MenuAction::ForcePush => {
                self.ui
                    .notify(&Notice::info("Info", "Force pushing changes..."));
                match self.tray.force_push(self.vcs.as_ref(), &self.config) {
                    Ok(_) => self.ui.notify(&Notice::success(
                        "Success",
                        "Force push completed successfully!",
                    )),
                    Err(err) => self.report("Force push failed", err),
                }
            }
            MenuAction::Pull => {
                self.ui
                    .notify(&Notice::info("Info", "Pulling latest changes..."));
                match self.tray.pull(self.vcs.as_ref(), &self.config) {
                    Ok(summary) => self
                        .ui
                        .notify(&Notice::success("Git Pull", summary.message())),
                    Err(err) => self.report("Pull failed", err),
                }
            }
            MenuAction::Fetch => {
                self.ui
                    .notify(&Notice::info("Info", "Fetching latest changes..."));
                match self.tray.fetch(self.vcs.as_ref(), &self.config) {
                    Ok(summary) => self
                        .ui
                        .notify(&Notice::success("Git Fetch", summary.message())),
                    Err(err) => self.report("Fetch failed", err),
                }
            }
            MenuAction::Exit => {
                self.tray.exit(self.monitor.as_mut());
                return Flow::Exit;
            }
        }

        Flow::Continue
    }

    fn report(&mut self, title: &str, err: AppError) {
        error!("{title}: {err}.");
        self.ui.notify(&Notice::error(title, err.to_string()));
    }
}
