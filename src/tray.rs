use crate::{
    config::WatchConfiguration,
    error::AppError,
    vcs::{FetchSummary, PullSummary, Vcs, VcsOutput},
    watch::Monitor,
};
use log::{debug, info};
use thiserror::Error;

/// A custom error for the refused tray actions.
#[derive(Debug, Error)]
pub enum TrayError {
    /// Hiding the window without monitoring would leave nothing to do.
    #[error("please start monitoring before minimizing to tray")]
    NotMonitoring,
}

/// The entries of the tray menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Reopen,
    ForcePush,
    Pull,
    Fetch,
    Exit,
}

/// Whether the main window is on the screen or only the tray icon is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
}

/// The tray menu. Every action delegates to the version control or the monitor,
/// the only state kept here is the window visibility.
#[derive(Debug)]
pub struct Tray {
    visibility: Visibility,
}

impl Default for Tray {
    fn default() -> Self {
        Self::new()
    }
}

impl Tray {
    pub fn new() -> Self {
        Tray {
            visibility: Visibility::Shown,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Hide the window, but only if there is something running in the background.
    pub fn minimize(&mut self, monitoring: bool) -> Result<(), TrayError> {
        if !monitoring {
            return Err(TrayError::NotMonitoring);
        }

        debug!("Minimizing to tray.");
        self.visibility = Visibility::Hidden;

        Ok(())
    }

    pub fn reopen(&mut self) {
        debug!("Reopening the configuration window.");
        self.visibility = Visibility::Shown;
    }

    /// Push the configured branch right away, without asking for a commit.
    pub fn force_push(
        &self,
        vcs: &dyn Vcs,
        config: &WatchConfiguration,
    ) -> Result<VcsOutput, AppError> {
        let repo = config.require_repository()?;
        let output = vcs.push(repo, config.remote(), config.branch())?;
        info!("Force pushed to {}/{}.", config.remote(), config.branch());

        Ok(output)
    }

    pub fn pull(&self, vcs: &dyn Vcs, config: &WatchConfiguration) -> Result<PullSummary, AppError> {
        let repo = config.require_repository()?;
        let output = vcs.pull(repo, config.remote(), config.branch())?;
        let summary = PullSummary::from_output(&output);
        info!("{}.", summary.message());

        Ok(summary)
    }

    pub fn fetch(&self, vcs: &dyn Vcs, config: &WatchConfiguration) -> Result<FetchSummary, AppError> {
        let repo = config.require_repository()?;
        let output = vcs.fetch(repo, config.remote())?;
        let summary = FetchSummary::from_output(&output);
        info!("{}.", summary.message());

        Ok(summary)
    }

    /// Release the watch handle before the program terminates.
    pub fn exit(&mut self, monitor: &mut dyn Monitor) {
        debug!("Exiting from the tray.");
        monitor.stop_monitoring();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{vcs::MockVcs, watch::MockMonitor};
    use mockall::predicate::eq;
    use std::{error::Error, path::Path, path::PathBuf};

    fn config() -> WatchConfiguration {
        WatchConfiguration {
            repo_path: PathBuf::from("."),
            remote_name: String::from("backup"),
            branch_name: String::from("develop"),
            ..WatchConfiguration::default()
        }
    }

    #[test]
    fn it_should_only_minimize_while_monitoring() {
        let mut tray = Tray::new();

        let error = tray.minimize(false).err().unwrap();
        assert!(matches!(error, TrayError::NotMonitoring));
        assert_eq!(Visibility::Shown, tray.visibility());

        tray.minimize(true).unwrap();
        assert_eq!(Visibility::Hidden, tray.visibility());

        tray.reopen();
        assert_eq!(Visibility::Shown, tray.visibility());
    }

    #[test]
    fn it_should_force_push_with_the_current_config() -> Result<(), Box<dyn Error>> {
        let mut vcs = MockVcs::new();
        vcs.expect_add().times(0);
        vcs.expect_commit().times(0);
        vcs.expect_push()
            .times(1)
            .with(eq(Path::new(".")), eq("backup"), eq("develop"))
            .returning(|_, _, _| Ok(VcsOutput::default()));

        Tray::new().force_push(&vcs, &config())?;

        Ok(())
    }

    #[test]
    fn it_should_not_call_git_without_a_repository() {
        let mut vcs = MockVcs::new();
        vcs.expect_push().times(0);
        vcs.expect_pull().times(0);
        vcs.expect_fetch().times(0);

        let tray = Tray::new();
        let config = WatchConfiguration::default();

        for result in [
            tray.force_push(&vcs, &config).err(),
            tray.pull(&vcs, &config).err(),
            tray.fetch(&vcs, &config).err(),
        ] {
            assert!(
                matches!(result, Some(AppError::ConfigInvalid(_))),
                "{result:?} should be ConfigInvalid"
            );
        }
    }

    #[test]
    fn it_should_summarize_pull_and_fetch() -> Result<(), Box<dyn Error>> {
        let mut vcs = MockVcs::new();
        vcs.expect_pull()
            .times(1)
            .with(eq(Path::new(".")), eq("backup"), eq("develop"))
            .returning(|_, _, _| {
                Ok(VcsOutput {
                    stdout: String::from("Already up to date."),
                    ..VcsOutput::default()
                })
            });
        vcs.expect_fetch()
            .times(1)
            .with(eq(Path::new(".")), eq("backup"))
            .returning(|_, _| Ok(VcsOutput::default()));

        let tray = Tray::new();
        assert_eq!(PullSummary::UpToDate, tray.pull(&vcs, &config())?);
        assert_eq!(FetchSummary::NoChanges, tray.fetch(&vcs, &config())?);

        Ok(())
    }

    #[test]
    fn it_should_report_git_failures() {
        let mut vcs = MockVcs::new();
        vcs.expect_pull().times(1).returning(|_, _, _| {
            Err(crate::vcs::VcsError::CommandFailed {
                command: String::from("git pull backup develop"),
                code: 1,
                message: String::from("CONFLICT (content): Merge conflict in room.lpz"),
            })
        });

        let result = Tray::new().pull(&vcs, &config());
        assert!(
            matches!(result, Err(AppError::VcsCommandFailed(_))),
            "{result:?} should be VcsCommandFailed"
        );
    }

    #[test]
    fn it_should_stop_monitoring_on_exit() {
        let mut monitor = MockMonitor::new();
        monitor.expect_stop_monitoring().times(1).return_const(());

        Tray::new().exit(&mut monitor);
    }
}
