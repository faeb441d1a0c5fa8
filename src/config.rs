use duration_string::DurationString;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// The remote used when none is configured.
pub const DEFAULT_REMOTE: &str = "origin";
/// The branch used when none is configured.
pub const DEFAULT_BRANCH: &str = "main";
/// The file pattern used when none is configured.
pub const DEFAULT_PATTERN: &str = "*.lpz";
/// The debounce window used when none is configured.
pub const DEFAULT_DEBOUNCE_MS: u64 = 2000;

const CONFIG_DIRECTORY: &str = "git-autosync";
const CONFIG_FILE: &str = "config.json";

/// A custom error describing why the configuration is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// There is no directory to watch.
    #[error("the path to watch is not set")]
    MissingWatchPath,
    /// The directory to watch doesn't exist.
    #[error("watch path does not exist: {0}")]
    WatchPathNotFound(PathBuf),
    /// There is no repository configured.
    #[error("no repository configured")]
    MissingRepoPath,
    /// The repository directory doesn't exist.
    #[error("repository path does not exist: {0}")]
    RepoPathNotFound(PathBuf),
    /// The directory exists, but git cannot open it.
    #[error("{0} is not a valid git repository ({1})")]
    NotAGitRepository(String, String),
    /// The watched file pattern is empty.
    #[error("the watched file pattern is not set")]
    MissingPattern,
    /// The watched file pattern cannot be compiled.
    #[error("invalid file pattern {0}: {1}")]
    InvalidPattern(String, String),
    /// The field cannot be edited, because it doesn't exist.
    #[error("unknown setting {0}, valid values: watch, repo, pattern, remote, branch, debounce, recursive")]
    UnknownField(String),
    /// The value cannot be parsed for the given field.
    #[error("cannot set {0} to {1}")]
    InvalidValue(String, String),
    /// The settings file exists, but cannot be read.
    #[error("cannot load settings from {0}: {1}")]
    LoadFailed(PathBuf, String),
    /// The settings file cannot be written.
    #[error("cannot save settings to {0}: {1}")]
    SaveFailed(PathBuf, String),
}

/// The settings of a watch session.
///
/// Created from the persisted settings and the command line, edited from the
/// configuration window and passed by reference to everything else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfiguration {
    /// The directory to monitor.
    pub watch_path: PathBuf,
    /// The git repository to commit and push.
    pub repo_path: PathBuf,
    /// The file name or extension to react on.
    pub watched_pattern: String,
    /// The remote to push to, falls back to [DEFAULT_REMOTE] if empty.
    #[serde(rename = "default_remote")]
    pub remote_name: String,
    /// The branch to push to, falls back to [DEFAULT_BRANCH] if empty.
    #[serde(rename = "default_branch")]
    pub branch_name: String,
    /// Whether the subdirectories are monitored as well.
    pub recursive: bool,
    /// The window in which repeated writes collapse into a single change.
    pub debounce_ms: u64,
}

impl Default for WatchConfiguration {
    fn default() -> Self {
        WatchConfiguration {
            watch_path: PathBuf::new(),
            repo_path: PathBuf::new(),
            watched_pattern: String::from(DEFAULT_PATTERN),
            remote_name: String::from(DEFAULT_REMOTE),
            branch_name: String::from(DEFAULT_BRANCH),
            recursive: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl WatchConfiguration {
    pub fn remote(&self) -> &str {
        match self.remote_name.trim() {
            "" => DEFAULT_REMOTE,
            remote => remote,
        }
    }

    pub fn branch(&self) -> &str {
        match self.branch_name.trim() {
            "" => DEFAULT_BRANCH,
            branch => branch,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Check that the repository is set and exists, without opening it.
    ///
    /// This is enough for the menu actions, git reports everything else.
    pub fn require_repository(&self) -> Result<&Path, ConfigError> {
        if self.repo_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRepoPath);
        }
        if !self.repo_path.is_dir() {
            return Err(ConfigError::RepoPathNotFound(self.repo_path.clone()));
        }

        Ok(&self.repo_path)
    }

    /// Check every setting that is needed to start monitoring.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingWatchPath);
        }
        if !self.watch_path.is_dir() {
            return Err(ConfigError::WatchPathNotFound(self.watch_path.clone()));
        }

        let repo_path = self.require_repository()?;
        git2::Repository::open(repo_path).map_err(|err| {
            ConfigError::NotAGitRepository(
                repo_path.to_string_lossy().to_string(),
                err.message().to_string(),
            )
        })?;

        if self.watched_pattern.trim().is_empty() {
            return Err(ConfigError::MissingPattern);
        }

        Ok(())
    }

    /// Edit a single field by its short name, as typed into the configuration window.
    pub fn set(&mut self, field: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue(field.to_string(), value.to_string());
        let value = value.trim();
        match field {
            "watch" => self.watch_path = PathBuf::from(value),
            "repo" => self.repo_path = PathBuf::from(value),
            "pattern" => self.watched_pattern = value.to_string(),
            "remote" => self.remote_name = value.to_string(),
            "branch" => self.branch_name = value.to_string(),
            "debounce" => {
                let duration: Duration = value.parse::<DurationString>().map_err(|_| invalid())?.into();
                self.debounce_ms = u64::try_from(duration.as_millis()).map_err(|_| invalid())?;
            }
            "recursive" => {
                self.recursive = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => return Err(invalid()),
                }
            }
            _ => return Err(ConfigError::UnknownField(field.to_string())),
        }
        debug!("Setting {field} changed to {value:?}.");

        Ok(())
    }
}

/// Loads and saves the [WatchConfiguration] between runs as JSON.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        ConfigStore { path }
    }

    /// The settings file in the user's configuration directory, if there is one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIRECTORY).join(CONFIG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings file. A missing file results in the default configuration.
    pub fn load(&self) -> Result<WatchConfiguration, ConfigError> {
        if !self.path.exists() {
            debug!(
                "There is no settings file at {}, using defaults.",
                self.path.to_string_lossy()
            );
            return Ok(WatchConfiguration::default());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|err| ConfigError::LoadFailed(self.path.clone(), err.to_string()))?;
        let config = serde_json::from_str(&contents)
            .map_err(|err| ConfigError::LoadFailed(self.path.clone(), err.to_string()))?;

        Ok(config)
    }

    /// Same as [ConfigStore::load], but falls back to the defaults on a broken file.
    pub fn load_or_default(&self) -> WatchConfiguration {
        self.load().unwrap_or_else(|err| {
            warn!("{err}, using defaults.");
            WatchConfiguration::default()
        })
    }

    pub fn save(&self, config: &WatchConfiguration) -> Result<(), ConfigError> {
        let failed = |err: String| ConfigError::SaveFailed(self.path.clone(), err);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| failed(err.to_string()))?;
            }
        }
        let contents = serde_json::to_string_pretty(config).map_err(|err| failed(err.to_string()))?;
        fs::write(&self.path, contents).map_err(|err| failed(err.to_string()))?;
        debug!("Saved settings to {}.", self.path.to_string_lossy());

        Ok(())
    }
}
