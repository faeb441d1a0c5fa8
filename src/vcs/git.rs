use super::{Vcs, VcsError, VcsOutput};
use duct::cmd;
use log::{debug, trace};
use std::path::Path;

const GIT_PROGRAM: &str = "git";

/// Calls the `git` executable with the standard subcommands.
///
/// Both the stdout and stderr are captured. Git never asks for credentials
/// on the terminal, the credential helpers configured by the user still apply.
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    pub fn new() -> Self {
        GitCli {
            program: String::from(GIT_PROGRAM),
        }
    }

    /// Use a different executable, e.g. a git installed outside the `PATH`.
    pub fn with_program(program: String) -> Self {
        GitCli { program }
    }

    fn run(&self, repo: &Path, args: &[&str]) -> Result<VcsOutput, VcsError> {
        let command_line = shlex::try_join(
            std::iter::once(self.program.as_str()).chain(args.iter().copied()),
        )
        .unwrap_or_else(|_| format!("{} {}", self.program, args.join(" ")));
        debug!(
            "Running {command_line} in directory {}.",
            repo.to_string_lossy()
        );

        let output = cmd(self.program.as_str(), args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .dir(repo)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()?;

        let stdout = String::from_utf8(output.stdout).map_err(|_| VcsError::NonUtf8Output)?;
        let stderr = String::from_utf8(output.stderr).map_err(|_| VcsError::NonUtf8Output)?;
        stdout
            .lines()
            .chain(stderr.lines())
            .for_each(|line| trace!("{line}"));

        let code = output.status.code().unwrap_or(-1);
        if output.status.success() {
            Ok(VcsOutput {
                code,
                stdout,
                stderr,
            })
        } else {
            let message = match stderr.trim() {
                "" => stdout.trim().to_string(),
                stderr => stderr.to_string(),
            };
            Err(VcsError::CommandFailed {
                command: command_line,
                code,
                message,
            })
        }
    }
}

impl Vcs for GitCli {
    fn fetch(&self, repo: &Path, remote: &str) -> Result<VcsOutput, VcsError> {
        self.run(repo, &["fetch", remote])
    }

    fn pull(&self, repo: &Path, remote: &str, branch: &str) -> Result<VcsOutput, VcsError> {
        self.run(repo, &["pull", remote, branch])
    }

    fn add(&self, repo: &Path) -> Result<VcsOutput, VcsError> {
        self.run(repo, &["add", "--all"])
    }

    fn commit(&self, repo: &Path, message: &str) -> Result<VcsOutput, VcsError> {
        self.run(repo, &["commit", "-m", message])
    }

    fn push(&self, repo: &Path, remote: &str, branch: &str) -> Result<VcsOutput, VcsError> {
        self.run(repo, &["push", remote, branch])
    }
}
