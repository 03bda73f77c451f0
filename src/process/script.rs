//! Pre-publish hook execution
//!
//! Runs the caller-supplied script through the platform shell with the
//! staging directory as its working directory. Only the exit status is
//! reported; the script's own output streams pass through to the operator.

use crate::core::traits::ScriptRunner;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Runs hook scripts through `sh -c` (or `cmd /C` on Windows)
#[derive(Debug, Clone, Default)]
pub struct ShellScriptRunner;

impl ShellScriptRunner {
    pub fn new() -> Self {
        Self
    }

    fn shell_command(script: &str) -> Command {
        #[cfg(target_os = "windows")]
        {
            let mut command = Command::new("cmd");
            command.args(["/C", script]);
            command
        }

        #[cfg(not(target_os = "windows"))]
        {
            let mut command = Command::new("sh");
            command.args(["-c", script]);
            command
        }
    }
}

#[async_trait]
impl ScriptRunner for ShellScriptRunner {
    async fn run(&self, script: &str, working_dir: &Path) -> anyhow::Result<bool> {
        if !working_dir.exists() {
            anyhow::bail!("Working directory does not exist: {}", working_dir.display());
        }

        let status = Self::shell_command(script)
            .current_dir(working_dir)
            .status()
            .await?;

        Ok(status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_script() {
        let temp_dir = TempDir::new().unwrap();
        let runner = ShellScriptRunner::new();

        let ok = runner.run("true", temp_dir.path()).await.unwrap();

        assert!(ok);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_script() {
        let temp_dir = TempDir::new().unwrap();
        let runner = ShellScriptRunner::new();

        let ok = runner.run("exit 3", temp_dir.path()).await.unwrap();

        assert!(!ok);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_script_runs_in_working_directory() {
        let temp_dir = TempDir::new().unwrap();
        let runner = ShellScriptRunner::new();

        let ok = runner
            .run("touch marker.txt", temp_dir.path())
            .await
            .unwrap();

        assert!(ok);
        assert!(temp_dir.path().join("marker.txt").exists());
    }

    #[tokio::test]
    async fn test_missing_working_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let runner = ShellScriptRunner::new();

        let result = runner
            .run("true", &temp_dir.path().join("missing"))
            .await;

        assert!(result.is_err());
    }
}
