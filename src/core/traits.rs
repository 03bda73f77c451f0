//! Collaborator interfaces for the staging pipeline
//!
//! This module defines the seams between the core pipeline and its external
//! collaborators: the registry publish command, the pre-publish hook runner,
//! and the staging-directory provisioner. The orchestrator only depends on
//! these traits, keeping every step independently testable.

use crate::core::error::PublishError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Arguments forwarded to the registry publish command
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PublishArgs {
    /// Validate without uploading to the registry
    #[serde(rename = "dryRun")]
    pub dry_run: bool,

    /// Registry access level ("public" | "restricted")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,

    /// Register the package with the given dist-tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Result of a registry publish invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Registry publish collaborator
///
/// Treated as a black box: the pipeline hands over the staging directory
/// and receives success or failure.
#[async_trait]
pub trait RegistryPublisher: Send + Sync {
    /// Registry client name (e.g., "npm", "pnpm")
    fn name(&self) -> &str;

    /// Publish the staged package
    ///
    /// # Arguments
    ///
    /// * `staging_path` - Directory holding the sanitized package copy
    /// * `args` - Publish arguments (dry-run, access, tag)
    async fn publish(
        &self,
        staging_path: &Path,
        args: &PublishArgs,
    ) -> anyhow::Result<PublishOutcome>;
}

/// Pre-publish hook collaborator
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Run a script with the given working directory, returning whether it
    /// exited successfully
    async fn run(&self, script: &str, working_dir: &Path) -> anyhow::Result<bool>;
}

/// Staging-directory provisioner
#[async_trait]
pub trait StagingProvisioner: Send + Sync {
    /// Create a fresh, uniquely named staging directory
    async fn create(&self) -> Result<PathBuf, PublishError>;

    /// Remove a staging directory and everything beneath it
    async fn remove(&self, path: &Path) -> Result<(), PublishError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_args_default() {
        let args = PublishArgs::default();

        assert!(!args.dry_run);
        assert!(args.access.is_none());
        assert!(args.tag.is_none());
    }

    #[test]
    fn test_publish_args_serialization() {
        let args = PublishArgs {
            dry_run: true,
            access: Some("public".to_string()),
            tag: None,
        };

        let json = serde_json::to_string(&args).unwrap();
        assert!(json.contains("\"dryRun\":true"));
        assert!(json.contains("\"access\":\"public\""));
        assert!(!json.contains("tag"));
    }

    #[test]
    fn test_publish_outcome_failure() {
        let outcome = PublishOutcome {
            success: false,
            output: None,
            error: Some("403 Forbidden".to_string()),
        };

        assert!(!outcome.success);
        assert!(outcome.error.is_some());
    }
}
