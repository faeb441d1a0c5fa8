use duration_string::DurationString;
use git_autosync::config::WatchConfiguration;
use gumdrop::Options;
use std::{path::PathBuf, time::Duration};

/// Watch a directory for changed files, then commit and push them to a git repository.
///
/// The saved settings are used, the options below override them.
#[derive(Debug, Options)]
pub struct Args {
    /// The directory to watch for changes.
    #[options(meta = "PATH")]
    pub watch: Option<PathBuf>,

    /// The git repository to commit and push.
    #[options(meta = "PATH")]
    pub repo: Option<PathBuf>,

    /// The file name or extension to react on (default: *.lpz).
    #[options(meta = "PATTERN")]
    pub pattern: Option<String>,

    /// The remote to push to (default: origin).
    #[options(no_short, meta = "REMOTE")]
    pub remote: Option<String>,

    /// The branch to push to (default: main).
    #[options(meta = "BRANCH")]
    pub branch: Option<String>,

    /// Collapse repeated writes within this window (default: 2s).
    ///
    /// Can be a number postfixed with ms, s(econd), m(inutes)
    #[options(no_short, meta = "DURATION")]
    pub debounce: Option<DurationString>,

    /// Only watch the top-level directory.
    #[options(no_short)]
    pub no_recursive: bool,

    /// The settings file to use instead of the one in the user's configuration directory.
    #[options(no_short, meta = "FILE")]
    pub config: Option<PathBuf>,

    /// Start monitoring right away.
    #[options()]
    pub start: bool,

    /// Minimize to the tray after monitoring started.
    #[options()]
    pub minimize: bool,

    /// Increase verbosity, can be set multiple times (-v debug, -vv tracing)
    #[options(count)]
    pub verbose: u8,

    /// Only print error messages.
    #[options()]
    pub quiet: bool,

    /// Print the current version.
    #[options(short = "V")]
    pub version: bool,

    /// Print this help.
    #[options()]
    pub help: bool,
}

impl Args {
    /// Override the saved settings with the ones given on the command line.
    pub fn apply(&self, config: &mut WatchConfiguration) {
        if let Some(watch) = &self.watch {
            config.watch_path = watch.clone();
        }
        if let Some(repo) = &self.repo {
            config.repo_path = repo.clone();
        }
        if let Some(pattern) = &self.pattern {
            config.watched_pattern = pattern.clone();
        }
        if let Some(remote) = &self.remote {
            config.remote_name = remote.clone();
        }
        if let Some(branch) = &self.branch {
            config.branch_name = branch.clone();
        }
        if let Some(debounce) = self.debounce.clone() {
            let debounce: Duration = debounce.into();
            config.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        }
        if self.no_recursive {
            config.recursive = false;
        }
    }
}

pub fn parse_args() -> Args {
    Args::parse_args_default_or_exit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn it_should_override_only_the_given_settings() {
        let args = Args::parse_args_default(&["--watch", "/projects", "--debounce", "500ms"]).unwrap();
        let mut config = WatchConfiguration {
            repo_path: PathBuf::from("/projects/repo"),
            branch_name: String::from("develop"),
            ..WatchConfiguration::default()
        };

        args.apply(&mut config);

        assert_eq!(Path::new("/projects"), config.watch_path);
        assert_eq!(Path::new("/projects/repo"), config.repo_path);
        assert_eq!("develop", config.branch());
        assert_eq!(500, config.debounce_ms);
        assert!(config.recursive);
    }

    #[test]
    fn it_should_turn_off_recursion() {
        let args = Args::parse_args_default(&["--no-recursive", "-s", "-m"]).unwrap();
        let mut config = WatchConfiguration::default();

        args.apply(&mut config);

        assert!(!config.recursive);
        assert!(args.start);
        assert!(args.minimize);
    }
}
