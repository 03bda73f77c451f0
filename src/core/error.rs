//! Error handling for staged publishing
//!
//! This module provides error types that identify which pipeline stage
//! failed, using the thiserror crate for ergonomic error handling.

use thiserror::Error;

/// Main error type for staged publishing operations
#[derive(Error, Debug)]
pub enum PublishError {
    // Filesystem errors
    #[error("[{stage}] ファイル操作に失敗しました: {message}")]
    Filesystem { stage: &'static str, message: String },

    // Manifest errors
    #[error("[manifest] マニフェストの解析に失敗しました: {message}")]
    ManifestParse { message: String },

    // Configuration errors
    #[error("[config] 設定の読み込みに失敗しました: {message}")]
    Config { message: String },

    // Hook errors
    #[error("[hook] 公開前スクリプトが失敗しました: {script}")]
    HookFailure { script: String },

    // Publishing errors
    #[error("[publish] レジストリへの公開が拒否されました: {message}")]
    PublishRejected { message: String },

    // Command execution errors
    #[error("[{stage}] コマンド実行エラー: {message}")]
    Command { stage: &'static str, message: String },
}

impl PublishError {
    /// Build a filesystem error for the given pipeline stage
    pub fn filesystem(stage: &'static str, message: impl ToString) -> Self {
        Self::Filesystem {
            stage,
            message: message.to_string(),
        }
    }

    /// Get the pipeline stage associated with this error
    pub fn stage(&self) -> &str {
        match self {
            Self::Filesystem { stage, .. } | Self::Command { stage, .. } => stage,
            Self::ManifestParse { .. } => "manifest",
            Self::Config { .. } => "config",
            Self::HookFailure { .. } => "hook",
            Self::PublishRejected { .. } => "publish",
        }
    }

    /// Check if this error unwinds the whole run
    ///
    /// A failed pre-publish hook only aborts the publish step; the run
    /// still completes with a failed report after cleanup.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::HookFailure { .. })
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Filesystem { .. } => "FILESYSTEM_ERROR",
            Self::ManifestParse { .. } => "MANIFEST_PARSE_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
            Self::HookFailure { .. } => "HOOK_FAILURE",
            Self::PublishRejected { .. } => "PUBLISH_REJECTED",
            Self::Command { .. } => "COMMAND_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filesystem_error() {
        let error = PublishError::filesystem("stage", "permission denied");

        assert_eq!(error.stage(), "stage");
        assert!(error.is_fatal());
        assert_eq!(error.code(), "FILESYSTEM_ERROR");
        let display = error.to_string();
        assert!(display.contains("[stage]"));
        assert!(display.contains("permission denied"));
    }

    #[test]
    fn test_manifest_parse_error() {
        let error = PublishError::ManifestParse {
            message: "expected value at line 1".to_string(),
        };

        assert_eq!(error.stage(), "manifest");
        assert!(error.is_fatal());
        assert_eq!(error.code(), "MANIFEST_PARSE_ERROR");
    }

    #[test]
    fn test_config_error() {
        let error = PublishError::Config {
            message: "invalid YAML".to_string(),
        };

        assert_eq!(error.stage(), "config");
        assert_eq!(error.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_hook_failure_is_not_fatal() {
        let error = PublishError::HookFailure {
            script: "npm run lint".to_string(),
        };

        assert_eq!(error.stage(), "hook");
        assert!(!error.is_fatal());
        assert_eq!(error.code(), "HOOK_FAILURE");
        assert!(error.to_string().contains("npm run lint"));
    }

    #[test]
    fn test_publish_rejected_error() {
        let error = PublishError::PublishRejected {
            message: "403 Forbidden".to_string(),
        };

        assert_eq!(error.stage(), "publish");
        assert!(error.is_fatal());
        assert_eq!(error.code(), "PUBLISH_REJECTED");
        assert!(error.to_string().contains("403 Forbidden"));
    }

    #[test]
    fn test_command_error() {
        let error = PublishError::Command {
            stage: "publish",
            message: "npm not found".to_string(),
        };

        assert_eq!(error.stage(), "publish");
        assert_eq!(error.code(), "COMMAND_ERROR");
    }

    #[test]
    fn test_error_display() {
        let error = PublishError::HookFailure {
            script: "./scripts/check.sh".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("[hook]"));
        assert!(display.contains("スクリプトが失敗"));
    }
}
