use crate::config::ConfigError;
use globset::{GlobBuilder, GlobMatcher};
use std::path::{Component, Path};

/// Decides whether a changed path is one of the watched files.
///
/// The pattern is a glob on the file name, so `project.lpz` matches one file and
/// `*.lpz` every file with the extension. A leading dot is a shorthand for the
/// extension (`.lpz` is the same as `*.lpz`). Matching ignores case, as the
/// editors producing these files are mostly on case-insensitive filesystems.
#[derive(Clone, Debug)]
pub struct ChangeFilter {
    matcher: GlobMatcher,
}

impl ChangeFilter {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(ConfigError::MissingPattern);
        }

        let glob = match pattern.strip_prefix('.') {
            Some(extension) => format!("*.{extension}"),
            None => pattern.to_string(),
        };
        let matcher = GlobBuilder::new(&glob)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|err| ConfigError::InvalidPattern(pattern.to_string(), err.to_string()))?
            .compile_matcher();

        Ok(ChangeFilter { matcher })
    }

    /// Files inside the `.git` directory never match, even with a catch-all pattern.
    pub fn matches(&self, path: &Path) -> bool {
        if path
            .components()
            .any(|component| component == Component::Normal(".git".as_ref()))
        {
            return false;
        }

        path.file_name()
            .map(|name| self.matcher.is_match(name))
            .unwrap_or(false)
    }
}
