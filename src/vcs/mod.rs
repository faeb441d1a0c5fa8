use crate::config::WatchConfiguration;
use log::{debug, info};
use mockall::automock;
use std::path::Path;
use thiserror::Error;

/// The git executable, called through its command line interface.
pub mod git;

/// A custom error describing the error cases of the version control calls.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The executable cannot be started. The parameter contains the error.
    #[error("the version control tool cannot run: {0}")]
    SpawnFailed(#[from] std::io::Error),
    /// The command returned a non-zero exit code, e.g. nothing to commit,
    /// rejected authentication or a merge conflict.
    #[error("{command} returned non-zero exit code {code} with message: {message}")]
    CommandFailed {
        command: String,
        code: i32,
        message: String,
    },
    /// The command output contains non-UTF8 characters.
    #[error("the version control tool returned invalid characters")]
    NonUtf8Output,
}

/// The captured result of a successful command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VcsOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl VcsOutput {
    /// Both output streams, trimmed and joined.
    pub fn text(&self) -> String {
        [self.stdout.trim(), self.stderr.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The version control operations, each one a blocking call to an external tool.
///
/// There are no retries: every failure is returned to the caller immediately.
#[automock]
pub trait Vcs {
    fn fetch(&self, repo: &Path, remote: &str) -> Result<VcsOutput, VcsError>;
    fn pull(&self, repo: &Path, remote: &str, branch: &str) -> Result<VcsOutput, VcsError>;
    fn add(&self, repo: &Path) -> Result<VcsOutput, VcsError>;
    fn commit(&self, repo: &Path, message: &str) -> Result<VcsOutput, VcsError>;
    fn push(&self, repo: &Path, remote: &str, branch: &str) -> Result<VcsOutput, VcsError>;
}

/// Stage everything, commit it with the message and push it to the configured remote.
///
/// Stops at the first failing step, so nothing gets pushed if the commit fails.
pub fn commit_and_push(
    vcs: &dyn Vcs,
    config: &WatchConfiguration,
    message: &str,
) -> Result<VcsOutput, VcsError> {
    let repo = config.repo_path.as_path();

    vcs.add(repo)?;
    let commit = vcs.commit(repo, message)?;
    debug!("Committed: {}.", commit.text());
    let push = vcs.push(repo, config.remote(), config.branch())?;
    info!(
        "Pushed changes to {}/{}.",
        config.remote(),
        config.branch()
    );

    Ok(push)
}

/// What a successful pull did to the repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PullSummary {
    UpToDate,
    Updated,
    Completed,
}

impl PullSummary {
    pub fn from_output(output: &VcsOutput) -> Self {
        let text = output.text();
        if text.contains("Already up to date") || text.contains("Already up-to-date") {
            PullSummary::UpToDate
        } else if text.contains("Fast-forward")
            || text.contains(" file changed")
            || text.contains(" files changed")
        {
            PullSummary::Updated
        } else {
            PullSummary::Completed
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PullSummary::UpToDate => "Repository is already up to date",
            PullSummary::Updated => "Pull completed - repository updated!",
            PullSummary::Completed => "Pull completed successfully",
        }
    }
}

/// Whether a successful fetch downloaded anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchSummary {
    NewChanges,
    NoChanges,
}

impl FetchSummary {
    /// Git is silent on a fetch without updates, and reports the updated refs otherwise.
    pub fn from_output(output: &VcsOutput) -> Self {
        if output.text().is_empty() {
            FetchSummary::NoChanges
        } else {
            FetchSummary::NewChanges
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FetchSummary::NewChanges => "Fetch completed - new changes available",
            FetchSummary::NoChanges => "Fetch completed - no new changes",
        }
    }
}
