//! staged-publish CLI
//!
//! Prepares a sanitized copy of a package for registry publishing

use anyhow::Result;
use clap::Parser;
use staged_publish::{PublishConfig, StagedPublisher};
use std::path::PathBuf;
use std::process;

/// Stage, sanitize, and publish a package copy
#[derive(Parser)]
#[command(name = "staged-publish")]
#[command(version = "0.1.0")]
#[command(about = "Stage, sanitize, and publish a package copy", long_about = None)]
struct Cli {
    /// Project path (defaults to current directory)
    #[arg(value_name = "PROJECT_PATH")]
    project_path: Option<PathBuf>,

    /// One or more exclude file patterns
    #[arg(long, value_delimiter = ',')]
    files: Vec<String>,

    /// One or more exclude manifest fields
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,

    /// One or more exclude exports conditions
    #[arg(long, value_delimiter = ',')]
    exports: Vec<String>,

    /// Keep only the main section of README.md
    #[arg(long)]
    clean_docs: bool,

    /// Strip inline comments from staged source files
    #[arg(long)]
    clean_comments: bool,

    /// Run script in the staging directory before publishing
    #[arg(long)]
    before_script: Option<String>,

    /// Clean the package without publishing to the registry
    #[arg(long)]
    without_publish: bool,

    /// Report what would have been published without uploading
    #[arg(long)]
    dry_run: bool,

    /// Keep the staging directory after the run
    #[arg(long)]
    keep_staging: bool,

    /// Package manager to publish with
    #[arg(long)]
    package_manager: Option<String>,

    /// Whether the registry publishes this package as public or restricted
    #[arg(long)]
    access: Option<String>,

    /// Register the package with the given tag
    #[arg(long)]
    tag: Option<String>,

    /// Repository URL used to absolutize README links
    #[arg(long)]
    repository_url: Option<String>,

    /// Skip the default excluded-field set
    #[arg(long)]
    no_default_fields: bool,

    /// Delete exports mappings emptied by condition removal
    #[arg(long)]
    prune_empty_exports: bool,
}

impl Cli {
    /// Convert parsed flags into a partial configuration, leaving unset
    /// flags to lower-priority sources
    fn into_config(self) -> (PathBuf, PublishConfig) {
        let project_path = self
            .project_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config = PublishConfig {
            files: (!self.files.is_empty()).then_some(self.files),
            fields: (!self.fields.is_empty()).then_some(self.fields),
            exports: (!self.exports.is_empty()).then_some(self.exports),
            clean_docs: self.clean_docs.then_some(true),
            clean_comments: self.clean_comments.then_some(true),
            before_script: self.before_script,
            without_publish: self.without_publish.then_some(true),
            dry_run: self.dry_run.then_some(true),
            keep_staging: self.keep_staging.then_some(true),
            package_manager: self.package_manager,
            access: self.access,
            tag: self.tag,
            repository_url: self.repository_url,
            default_fields: self.no_default_fields.then_some(false),
            prune_empty_exports: self.prune_empty_exports.then_some(true),
        };

        (project_path, config)
    }
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let (project_path, config) = cli.into_config();

    println!("\n📦 staged-publish\n");

    let mut publisher = StagedPublisher::new(&project_path);

    match publisher.publish(config).await {
        Ok(report) => {
            if report.success {
                println!(
                    "\n✅ {} {} prepared successfully ({} ms)",
                    report.package_name, report.version, report.duration
                );
                for warning in &report.warnings {
                    println!("  ⚠️  {}", warning);
                }
                Ok(0)
            } else {
                println!("\n❌ Publishing aborted");
                for error in &report.errors {
                    eprintln!("  - {}", error);
                }
                Ok(1)
            }
        }
        Err(e) => {
            eprintln!("\n❌ Publishing failed: {}", e);
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_flags_stay_unset() {
        let cli = Cli::parse_from(["staged-publish"]);
        let (project_path, config) = cli.into_config();

        assert_eq!(project_path, PathBuf::from("."));
        assert_eq!(config, PublishConfig::default());
    }

    #[test]
    fn test_flags_map_to_config() {
        let cli = Cli::parse_from([
            "staged-publish",
            "pkg",
            "--files",
            "*.test.js,docs",
            "--fields",
            "browserslist",
            "--exports",
            "development",
            "--clean-docs",
            "--clean-comments",
            "--before-script",
            "npm test",
            "--dry-run",
            "--package-manager",
            "pnpm",
            "--tag",
            "next",
            "--no-default-fields",
        ]);
        let (project_path, config) = cli.into_config();

        assert_eq!(project_path, PathBuf::from("pkg"));
        assert_eq!(
            config.files,
            Some(vec!["*.test.js".to_string(), "docs".to_string()])
        );
        assert_eq!(config.fields, Some(vec!["browserslist".to_string()]));
        assert_eq!(config.exports, Some(vec!["development".to_string()]));
        assert_eq!(config.clean_docs, Some(true));
        assert_eq!(config.clean_comments, Some(true));
        assert_eq!(config.before_script, Some("npm test".to_string()));
        assert_eq!(config.dry_run, Some(true));
        assert_eq!(config.package_manager, Some("pnpm".to_string()));
        assert_eq!(config.tag, Some("next".to_string()));
        assert_eq!(config.default_fields, Some(false));
        assert_eq!(config.without_publish, None);
    }
}
