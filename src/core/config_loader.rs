//! Configuration loading for staged-publish
//!
//! This module merges configuration from the project config file, the
//! manifest's embedded section, and CLI arguments.

use crate::core::config::PublishConfig;
use crate::core::error::PublishError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Configuration file name
const CONFIG_FILENAME: &str = ".staged-publish.yaml";

/// Manifest key holding an embedded configuration section
const MANIFEST_CONFIG_KEY: &str = "staged-publish";

/// Manifest file name
pub const MANIFEST_FILENAME: &str = "package.json";

/// Configuration load options
#[derive(Debug, Clone)]
pub struct ConfigLoadOptions {
    /// Project path to load config from
    pub project_path: PathBuf,

    /// CLI arguments (highest priority)
    pub cli_args: Option<PublishConfig>,
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. CLI arguments
    /// 2. Manifest "staged-publish" section
    /// 3. Project config (./.staged-publish.yaml)
    /// 4. Default values
    pub async fn load(options: ConfigLoadOptions) -> Result<PublishConfig, PublishError> {
        let mut configs: Vec<PublishConfig> = Vec::new();

        // 4. Default values (lowest priority)
        configs.push(PublishConfig::default());

        // 3. Project config
        if let Some(project_config) = Self::load_project_config(&options.project_path).await? {
            configs.push(project_config);
        }

        // 2. Manifest section
        if let Some(manifest_config) = Self::load_manifest_config(&options.project_path).await? {
            configs.push(manifest_config);
        }

        // 1. CLI arguments (highest priority)
        if let Some(cli_config) = options.cli_args {
            configs.push(cli_config);
        }

        Ok(Self::merge_configs(configs))
    }

    /// Load project configuration from ./.staged-publish.yaml
    async fn load_project_config(
        project_path: &Path,
    ) -> Result<Option<PublishConfig>, PublishError> {
        let config_path = project_path.join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&config_path).await.map_err(|e| {
            PublishError::Config {
                message: format!("Failed to read config file: {}", e),
            }
        })?;

        let config: PublishConfig =
            serde_yaml::from_str(&content).map_err(|e| PublishError::Config {
                message: format!("Failed to parse YAML config: {}", e),
            })?;

        Ok(Some(config))
    }

    /// Load the "staged-publish" section embedded in the manifest
    async fn load_manifest_config(
        project_path: &Path,
    ) -> Result<Option<PublishConfig>, PublishError> {
        let manifest_path = project_path.join(MANIFEST_FILENAME);

        if !manifest_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&manifest_path).await.map_err(|e| {
            PublishError::filesystem("config", format!("Failed to read manifest: {}", e))
        })?;

        let manifest: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| PublishError::ManifestParse {
                message: e.to_string(),
            })?;

        let Some(section) = manifest.get(MANIFEST_CONFIG_KEY) else {
            return Ok(None);
        };

        let config: PublishConfig =
            serde_json::from_value(section.clone()).map_err(|e| PublishError::Config {
                message: format!("Invalid \"{}\" manifest section: {}", MANIFEST_CONFIG_KEY, e),
            })?;

        Ok(Some(config))
    }

    /// Merge multiple configurations with priority (later entries win)
    fn merge_configs(configs: Vec<PublishConfig>) -> PublishConfig {
        let mut result = PublishConfig::default();

        for config in configs {
            Self::merge_into(&mut result, config);
        }

        result
    }

    fn merge_into(base: &mut PublishConfig, overlay: PublishConfig) {
        if overlay.files.is_some() {
            base.files = overlay.files;
        }
        if overlay.fields.is_some() {
            base.fields = overlay.fields;
        }
        if overlay.exports.is_some() {
            base.exports = overlay.exports;
        }
        if overlay.clean_docs.is_some() {
            base.clean_docs = overlay.clean_docs;
        }
        if overlay.clean_comments.is_some() {
            base.clean_comments = overlay.clean_comments;
        }
        if overlay.before_script.is_some() {
            base.before_script = overlay.before_script;
        }
        if overlay.without_publish.is_some() {
            base.without_publish = overlay.without_publish;
        }
        if overlay.dry_run.is_some() {
            base.dry_run = overlay.dry_run;
        }
        if overlay.keep_staging.is_some() {
            base.keep_staging = overlay.keep_staging;
        }
        if overlay.package_manager.is_some() {
            base.package_manager = overlay.package_manager;
        }
        if overlay.access.is_some() {
            base.access = overlay.access;
        }
        if overlay.tag.is_some() {
            base.tag = overlay.tag;
        }
        if overlay.repository_url.is_some() {
            base.repository_url = overlay.repository_url;
        }
        if overlay.default_fields.is_some() {
            base.default_fields = overlay.default_fields;
        }
        if overlay.prune_empty_exports.is_some() {
            base.prune_empty_exports = overlay.prune_empty_exports;
        }
    }
}
