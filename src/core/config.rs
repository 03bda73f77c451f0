//! Configuration structures for staged-publish
//!
//! This module provides type-safe configuration management with serde support.
//! Every field is optional so that partial configurations from different
//! sources (config file, manifest section, CLI) can be merged by priority.

use serde::{Deserialize, Serialize};

/// Developer-only manifest fields removed by default before publishing
pub const DEFAULT_EXCLUDED_FIELDS: &[&str] = &[
    "devDependencies",
    "scripts",
    "husky",
    "lint-staged",
    "eslintConfig",
    "eslintIgnore",
    "prettier",
    "jest",
    "commitlint",
    "stylelint",
    "size-limit",
    "clean-publish",
    "staged-publish",
];

/// Options record recognized by every pipeline component
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PublishConfig {
    /// Extra exclusion patterns for the staged file set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    /// Extra manifest fields to remove
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    /// Export conditions to remove from the manifest "exports" structure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exports: Option<Vec<String>>,

    /// Keep only the main section of README.md (default: false)
    #[serde(skip_serializing_if = "Option::is_none", rename = "cleanDocs")]
    pub clean_docs: Option<bool>,

    /// Strip inline comments from staged source files (default: false)
    #[serde(skip_serializing_if = "Option::is_none", rename = "cleanComments")]
    pub clean_comments: Option<bool>,

    /// Script to run in the staging directory before publishing
    #[serde(skip_serializing_if = "Option::is_none", rename = "beforeScript")]
    pub before_script: Option<String>,

    /// Clean the package without invoking the registry publish command
    #[serde(skip_serializing_if = "Option::is_none", rename = "withoutPublish")]
    pub without_publish: Option<bool>,

    /// Forward --dry-run to the registry publish command
    #[serde(skip_serializing_if = "Option::is_none", rename = "dryRun")]
    pub dry_run: Option<bool>,

    /// Keep the staging directory after the run (default: false)
    #[serde(skip_serializing_if = "Option::is_none", rename = "keepStaging")]
    pub keep_staging: Option<bool>,

    /// Package manager used for publishing (default: "npm")
    #[serde(skip_serializing_if = "Option::is_none", rename = "packageManager")]
    pub package_manager: Option<String>,

    /// Registry access level ("public" | "restricted")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,

    /// Register the package with the given dist-tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Repository URL used to absolutize README links
    #[serde(skip_serializing_if = "Option::is_none", rename = "repositoryUrl")]
    pub repository_url: Option<String>,

    /// Apply the default excluded-field set (default: true)
    #[serde(skip_serializing_if = "Option::is_none", rename = "defaultFields")]
    pub default_fields: Option<bool>,

    /// Delete exports mappings emptied by condition removal (default: false)
    #[serde(skip_serializing_if = "Option::is_none", rename = "pruneEmptyExports")]
    pub prune_empty_exports: Option<bool>,
}

impl PublishConfig {
    /// Extra exclusion patterns supplied by the caller
    pub fn excluded_files(&self) -> &[String] {
        self.files.as_deref().unwrap_or(&[])
    }

    /// Manifest fields to remove: the default developer-only set (unless
    /// disabled) unioned with caller-specified fields
    pub fn excluded_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = if self.default_fields.unwrap_or(true) {
            DEFAULT_EXCLUDED_FIELDS.iter().map(|f| f.to_string()).collect()
        } else {
            Vec::new()
        };

        for field in self.fields.as_deref().unwrap_or(&[]) {
            if !fields.contains(field) {
                fields.push(field.clone());
            }
        }

        fields
    }

    /// Export conditions to remove
    pub fn excluded_conditions(&self) -> &[String] {
        self.exports.as_deref().unwrap_or(&[])
    }

    pub fn clean_docs(&self) -> bool {
        self.clean_docs.unwrap_or(false)
    }

    pub fn clean_comments(&self) -> bool {
        self.clean_comments.unwrap_or(false)
    }

    pub fn before_script(&self) -> Option<&str> {
        self.before_script.as_deref()
    }

    pub fn without_publish(&self) -> bool {
        self.without_publish.unwrap_or(false)
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run.unwrap_or(false)
    }

    pub fn keep_staging(&self) -> bool {
        self.keep_staging.unwrap_or(false)
    }

    pub fn package_manager(&self) -> &str {
        self.package_manager.as_deref().unwrap_or("npm")
    }

    pub fn repository_url(&self) -> Option<&str> {
        self.repository_url.as_deref()
    }

    pub fn prune_empty_exports(&self) -> bool {
        self.prune_empty_exports.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PublishConfig::default();

        assert_eq!(config.package_manager(), "npm");
        assert!(!config.clean_docs());
        assert!(!config.clean_comments());
        assert!(!config.without_publish());
        assert!(!config.dry_run());
        assert!(!config.keep_staging());
        assert!(!config.prune_empty_exports());
        assert!(config.excluded_files().is_empty());
        assert!(config.excluded_conditions().is_empty());
    }

    #[test]
    fn test_excluded_fields_include_defaults() {
        let config = PublishConfig::default();
        let fields = config.excluded_fields();

        assert!(fields.contains(&"devDependencies".to_string()));
        assert!(fields.contains(&"scripts".to_string()));
    }

    #[test]
    fn test_excluded_fields_union_with_caller_fields() {
        let config = PublishConfig {
            fields: Some(vec!["browserslist".to_string(), "scripts".to_string()]),
            ..Default::default()
        };
        let fields = config.excluded_fields();

        assert!(fields.contains(&"browserslist".to_string()));
        assert_eq!(
            fields.iter().filter(|f| f.as_str() == "scripts").count(),
            1
        );
    }

    #[test]
    fn test_excluded_fields_without_defaults() {
        let config = PublishConfig {
            fields: Some(vec!["browserslist".to_string()]),
            default_fields: Some(false),
            ..Default::default()
        };

        assert_eq!(config.excluded_fields(), vec!["browserslist".to_string()]);
    }

    #[test]
    fn test_deserialize_camel_case_yaml() {
        let yaml = r#"
files:
  - "*.test.js"
cleanDocs: true
beforeScript: "npm run lint"
packageManager: pnpm
withoutPublish: true
"#;
        let config: PublishConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.excluded_files(), ["*.test.js".to_string()]);
        assert!(config.clean_docs());
        assert_eq!(config.before_script(), Some("npm run lint"));
        assert_eq!(config.package_manager(), "pnpm");
        assert!(config.without_publish());
    }

    #[test]
    fn test_deserialize_json_manifest_section() {
        let json = r#"{
            "fields": ["browserslist"],
            "exports": ["development"],
            "cleanComments": true,
            "pruneEmptyExports": true
        }"#;
        let config: PublishConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.fields, Some(vec!["browserslist".to_string()]));
        assert_eq!(config.excluded_conditions(), ["development".to_string()]);
        assert!(config.clean_comments());
        assert!(config.prune_empty_exports());
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        let config = PublishConfig {
            clean_docs: Some(true),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();

        assert!(yaml.contains("cleanDocs: true"));
        assert!(!yaml.contains("packageManager"));
    }
}
