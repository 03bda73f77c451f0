//! Exclusion filtering for the staged file set
//!
//! Decides, for each relative path in the source tree, whether it is copied
//! into the staging area. Caller patterns are unioned with a fixed set of
//! always-excluded names; the staging directory's own name is always
//! excluded to prevent self-copy recursion.

use crate::core::error::PublishError;
use glob::Pattern;
use std::path::{Path, PathBuf};

/// Names always excluded from staging
pub const ALWAYS_EXCLUDED: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "npm-shrinkwrap.json",
    ".DS_Store",
];

/// Compiled exclusion patterns for one run
#[derive(Debug)]
pub struct ExclusionSpec {
    patterns: Vec<Pattern>,
}

impl ExclusionSpec {
    /// Build the exclusion set from the staging directory name and caller
    /// patterns
    ///
    /// # Arguments
    ///
    /// * `staging_dir_name` - Name of this run's staging directory
    /// * `extra_patterns` - Caller-supplied glob patterns
    pub fn new(staging_dir_name: &str, extra_patterns: &[String]) -> Result<Self, PublishError> {
        let mut patterns = Vec::new();

        for name in ALWAYS_EXCLUDED {
            patterns.push(Pattern::new(name).map_err(|e| PublishError::Config {
                message: format!("Invalid exclusion pattern \"{}\": {}", name, e),
            })?);
        }

        patterns.push(
            Pattern::new(staging_dir_name).map_err(|e| PublishError::Config {
                message: format!("Invalid staging directory name \"{}\": {}", staging_dir_name, e),
            })?,
        );

        for pattern in extra_patterns {
            patterns.push(Pattern::new(pattern).map_err(|e| PublishError::Config {
                message: format!("Invalid exclusion pattern \"{}\": {}", pattern, e),
            })?);
        }

        Ok(Self { patterns })
    }

    /// Check whether a relative path is excluded
    ///
    /// A path is excluded if any pattern matches the full relative path or
    /// any single path segment, so a directory name excludes everything
    /// beneath it.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        let full = relative.to_string_lossy();
        if self.patterns.iter().any(|p| p.matches(&full)) {
            return true;
        }

        relative.components().any(|component| {
            let segment = component.as_os_str().to_string_lossy();
            self.patterns.iter().any(|p| p.matches(&segment))
        })
    }

    /// Return the retained subset of `paths`, preserving input order
    pub fn filter(&self, paths: Vec<PathBuf>) -> Vec<PathBuf> {
        paths
            .into_iter()
            .filter(|path| !self.is_excluded(path))
            .collect()
    }
}
