use crate::{
    config::ConfigError, prompt::PromptError, tray::TrayError, vcs::VcsError, watch::WatchError,
};
use thiserror::Error;

/// The error categories surfaced to the user. None of them stop the program.
#[derive(Debug, Error)]
pub enum AppError {
    /// A path is missing or doesn't exist.
    #[error("not configured correctly: {0}")]
    ConfigInvalid(String),
    /// The operating system refused to watch the directory.
    #[error("failed to start monitoring: {0}")]
    WatchStartFailed(String),
    /// The version control tool failed, e.g. merge conflict, rejected authentication or nothing to commit.
    #[error("git failed: {0}")]
    VcsCommandFailed(String),
    /// The commit message is empty.
    #[error("{0}")]
    PromptValidationFailed(String),
    /// The action is not possible in the current state.
    #[error("{0}")]
    Refused(String),
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::ConfigInvalid(value.to_string())
    }
}

impl From<WatchError> for AppError {
    fn from(value: WatchError) -> Self {
        match value {
            WatchError::ConfigInvalid(err) => err.into(),
            WatchError::StartFailed(err) => AppError::WatchStartFailed(err.to_string()),
        }
    }
}

impl From<VcsError> for AppError {
    fn from(value: VcsError) -> Self {
        AppError::VcsCommandFailed(value.to_string())
    }
}

impl From<PromptError> for AppError {
    fn from(value: PromptError) -> Self {
        match value {
            PromptError::EmptyMessage => AppError::PromptValidationFailed(value.to_string()),
            PromptError::NotShown => AppError::Refused(value.to_string()),
        }
    }
}

impl From<TrayError> for AppError {
    fn from(value: TrayError) -> Self {
        AppError::Refused(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn it_should_categorize_watch_errors() {
        let error: AppError =
            WatchError::ConfigInvalid(ConfigError::WatchPathNotFound(PathBuf::from("/nowhere")))
                .into();
        assert!(
            matches!(error, AppError::ConfigInvalid(_)),
            "{error:?} should be ConfigInvalid"
        );

        let error: AppError = WatchError::StartFailed(notify::Error::generic("denied")).into();
        assert!(
            matches!(error, AppError::WatchStartFailed(_)),
            "{error:?} should be WatchStartFailed"
        );
    }

    #[test]
    fn it_should_categorize_prompt_errors() {
        let error: AppError = PromptError::EmptyMessage.into();
        assert!(
            matches!(error, AppError::PromptValidationFailed(_)),
            "{error:?} should be PromptValidationFailed"
        );
        assert_eq!("please enter a commit message", error.to_string());
    }

    #[test]
    fn it_should_keep_the_git_message() {
        let error: AppError = VcsError::CommandFailed {
            command: String::from("git push origin main"),
            code: 128,
            message: String::from("fatal: Authentication failed"),
        }
        .into();

        assert!(error.to_string().contains("fatal: Authentication failed"));
    }
}
