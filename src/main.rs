use args::parse_args;
use git_autosync::{
    app::App,
    config::ConfigStore,
    start::{start, StartError, StartOptions},
    triggers::{signal::SignalTrigger, terminal::TerminalTrigger, Trigger},
    ui::terminal::TerminalUi,
    vcs::git::GitCli,
    watch::fs::FsWatcher,
};
use log::debug;
use logger::init_logger;
use std::{path::PathBuf, process};
use thiserror::Error;

mod args;
mod logger;

/// The errors that stop the program before the event loop runs.
#[derive(Debug, Error)]
pub enum MainError {
    #[error("Cannot find the configuration directory, pass the settings file with --config.")]
    MissingConfigDirectory,
    #[error("Timezone offset cannot be determined for logging.")]
    FailedLoggerTimezones,
    #[error("Cannot initialize logger: {0}.")]
    FailedLogger(#[from] log::SetLoggerError),
    #[error(transparent)]
    Start(#[from] StartError),
}

fn main_inner() -> Result<(), MainError> {
    let args = parse_args();

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logger(&args)?;

    let config_path: PathBuf = match &args.config {
        Some(path) => path.clone(),
        None => ConfigStore::default_path().ok_or(MainError::MissingConfigDirectory)?,
    };
    debug!("Using settings file {}.", config_path.to_string_lossy());
    let store = ConfigStore::new(config_path);
    let mut config = store.load_or_default();
    args.apply(&mut config);

    let mut app = App::new(
        config,
        Box::new(FsWatcher::new()),
        Box::new(GitCli::new()),
        Box::new(TerminalUi::stdout()),
    )
    .with_store(store);

    // Setup triggers.
    let triggers: Vec<Box<dyn Trigger>> = vec![
        Box::new(TerminalTrigger),
        Box::new(SignalTrigger::new()),
    ];

    let options = StartOptions {
        monitor: args.start,
        minimize: args.minimize,
    };

    start(triggers, &mut app, options)?;

    Ok(())
}

fn main() {
    if let Err(err) = main_inner() {
        eprintln!("{err}");
        process::exit(1);
    }
}
