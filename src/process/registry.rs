//! Registry publish command execution
//!
//! Default `RegistryPublisher` implementation that shells out to the
//! configured package manager. The package-manager name is validated
//! against a whitelist; arguments are passed as a vector, never
//! interpolated into shell strings.

use crate::core::error::PublishError;
use crate::core::traits::{PublishArgs, PublishOutcome, RegistryPublisher};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Package managers allowed to run the publish command
const ALLOWED_PACKAGE_MANAGERS: &[&str] = &["npm", "pnpm", "yarn", "bun"];

/// Publishes the staged package with `<package-manager> publish`
#[derive(Debug, Clone)]
pub struct CommandRegistryPublisher {
    package_manager: String,
}

impl CommandRegistryPublisher {
    /// Create a publisher for the given package manager
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Command` if the package manager is not in the
    /// whitelist.
    pub fn new(package_manager: &str) -> Result<Self, PublishError> {
        if !ALLOWED_PACKAGE_MANAGERS.contains(&package_manager) {
            return Err(PublishError::Command {
                stage: "publish",
                message: format!(
                    "パッケージマネージャー '{}' は許可されていません",
                    package_manager
                ),
            });
        }

        Ok(Self {
            package_manager: package_manager.to_string(),
        })
    }

    fn command_name(&self) -> String {
        // Windows-specific: npm, yarn, etc. are .cmd files, not .exe
        #[cfg(target_os = "windows")]
        {
            format!("{}.cmd", self.package_manager)
        }

        #[cfg(not(target_os = "windows"))]
        {
            self.package_manager.clone()
        }
    }

    fn publish_args(args: &PublishArgs) -> Vec<String> {
        let mut command_args = vec!["publish".to_string()];

        if args.dry_run {
            command_args.push("--dry-run".to_string());
        }
        if let Some(access) = &args.access {
            command_args.push("--access".to_string());
            command_args.push(access.clone());
        }
        if let Some(tag) = &args.tag {
            command_args.push("--tag".to_string());
            command_args.push(tag.clone());
        }

        command_args
    }
}

#[async_trait]
impl RegistryPublisher for CommandRegistryPublisher {
    fn name(&self) -> &str {
        &self.package_manager
    }

    async fn publish(
        &self,
        staging_path: &Path,
        args: &PublishArgs,
    ) -> anyhow::Result<PublishOutcome> {
        let output = Command::new(self.command_name())
            .args(Self::publish_args(args))
            .current_dir(staging_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(PublishOutcome {
                success: true,
                output: Some(stdout + &stderr),
                error: None,
            })
        } else {
            Ok(PublishOutcome {
                success: false,
                output: Some(stdout),
                error: Some(stderr),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_whitelisted_package_managers() {
        for package_manager in ALLOWED_PACKAGE_MANAGERS {
            assert!(CommandRegistryPublisher::new(package_manager).is_ok());
        }
    }

    #[test]
    fn test_new_rejects_unknown_package_manager() {
        let result = CommandRegistryPublisher::new("curl");

        assert!(matches!(result, Err(PublishError::Command { .. })));
    }

    #[test]
    fn test_name() {
        let publisher = CommandRegistryPublisher::new("pnpm").unwrap();

        assert_eq!(publisher.name(), "pnpm");
    }

    #[test]
    fn test_publish_args_full() {
        let args = PublishArgs {
            dry_run: true,
            access: Some("restricted".to_string()),
            tag: Some("next".to_string()),
        };

        assert_eq!(
            CommandRegistryPublisher::publish_args(&args),
            ["publish", "--dry-run", "--access", "restricted", "--tag", "next"]
        );
    }

    #[test]
    fn test_publish_args_minimal() {
        let args = PublishArgs::default();

        assert_eq!(CommandRegistryPublisher::publish_args(&args), ["publish"]);
    }
}
