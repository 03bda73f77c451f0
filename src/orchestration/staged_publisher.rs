//! Staged Publisher - Main orchestrator for the staging pipeline
//!
//! Sequences the complete run: staging the filtered source tree, writing
//! the sanitized manifest, the optional doc-trim and comment-strip passes,
//! the pre-publish hook, the registry publish command, and staging-directory
//! cleanup. Two invariants hold on every path: publish never runs after a
//! failed hook, and cleanup runs on every exit unless the caller asked to
//! keep the staged output.

use crate::core::config::PublishConfig;
use crate::core::config_loader::{ConfigLoadOptions, ConfigLoader};
use crate::core::error::PublishError;
use crate::core::state_machine::{PublishState, PublishStateMachine};
use crate::core::traits::{PublishArgs, RegistryPublisher, ScriptRunner, StagingProvisioner};
use crate::process::registry::CommandRegistryPublisher;
use crate::process::script::ShellScriptRunner;
use crate::staging::exclusion::ExclusionSpec;
use crate::staging::provisioner::TempStagingProvisioner;
use crate::staging::{comments, docs, manifest, stager};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Report returned after a publishing run
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub success: bool,
    pub package_name: String,
    pub version: String,
    /// Staging directory path, set only when the run retained it
    pub staging_dir: Option<PathBuf>,
    pub published_at: Option<DateTime<Utc>>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub duration: u64,
    pub state: String,
}

/// Result of the staging pipeline before cleanup
struct PipelineOutcome {
    published: bool,
    hook_failed: Option<String>,
}

/// Main orchestrator for staged publishing
pub struct StagedPublisher {
    project_path: PathBuf,
    state_machine: PublishStateMachine,
    provisioner: Option<Box<dyn StagingProvisioner>>,
    publisher: Option<Box<dyn RegistryPublisher>>,
    runner: Option<Box<dyn ScriptRunner>>,
    config: Option<PublishConfig>,
}

impl StagedPublisher {
    /// Create a new StagedPublisher for the given project directory
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
            state_machine: PublishStateMachine::new(),
            provisioner: None,
            publisher: None,
            runner: None,
            config: None,
        }
    }

    /// Replace the registry publish collaborator
    pub fn with_publisher(mut self, publisher: Box<dyn RegistryPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Replace the hook runner collaborator
    pub fn with_script_runner(mut self, runner: Box<dyn ScriptRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Replace the staging-directory provisioner
    pub fn with_provisioner(mut self, provisioner: Box<dyn StagingProvisioner>) -> Self {
        self.provisioner = Some(provisioner);
        self
    }

    /// Get the recorded state transitions of the last run
    pub fn state_history(&self) -> String {
        self.state_machine.history()
    }

    /// Run the full staging-and-publish pipeline
    ///
    /// # Arguments
    ///
    /// * `cli_config` - CLI options, merged over file and manifest
    ///   configuration with the highest priority
    pub async fn publish(&mut self, cli_config: PublishConfig) -> anyhow::Result<PublishReport> {
        let start_time = Instant::now();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // Resolve configuration if not already loaded
        if self.config.is_none() {
            self.config = Some(
                ConfigLoader::load(ConfigLoadOptions {
                    project_path: self.project_path.clone(),
                    cli_args: Some(cli_config),
                })
                .await?,
            );
        }
        let config = self.config.clone().unwrap_or_default();

        // Read the source manifest before any staging work
        let source_manifest = manifest::read(&self.project_path).await?;
        let package_name = manifest_string(&source_manifest, "name");
        let version = manifest_string(&source_manifest, "version");

        self.state_machine = PublishStateMachine::new();

        let provisioner: Box<dyn StagingProvisioner> = match self.provisioner.take() {
            Some(provisioner) => provisioner,
            None => Box::new(TempStagingProvisioner::new(&self.project_path)),
        };
        let publisher: Box<dyn RegistryPublisher> = match self.publisher.take() {
            Some(publisher) => publisher,
            None => Box::new(CommandRegistryPublisher::new(config.package_manager())?),
        };
        let runner: Box<dyn ScriptRunner> = match self.runner.take() {
            Some(runner) => runner,
            None => Box::new(ShellScriptRunner::new()),
        };

        let staging = provisioner.create().await?;

        let result = self
            .run_pipeline(
                &staging,
                &config,
                &source_manifest,
                publisher.as_ref(),
                runner.as_ref(),
                &mut warnings,
            )
            .await;

        if result.is_err() {
            self.state_machine.transition(PublishState::Aborted);
        }

        // Cleanup runs on every exit path unless the caller asked to keep
        // the staged output; without-publish mode retains it for inspection
        let retain = match &result {
            Ok(_) => config.keep_staging() || config.without_publish(),
            Err(_) => config.keep_staging(),
        };

        let mut staging_dir = None;
        if retain {
            println!("📂 Staging directory kept: {}", staging.display());
            staging_dir = Some(staging.clone());
        } else if let Err(cleanup_error) = provisioner.remove(&staging).await {
            warnings.push(format!(
                "Failed to remove staging directory: {}",
                cleanup_error
            ));
        } else {
            self.state_machine.transition(PublishState::CleanedUp);
        }

        let duration = start_time.elapsed().as_millis() as u64;

        match result {
            Ok(outcome) => {
                if let Some(script) = outcome.hook_failed {
                    errors.push(PublishError::HookFailure { script }.to_string());
                    Ok(PublishReport {
                        success: false,
                        package_name,
                        version,
                        staging_dir,
                        published_at: None,
                        errors,
                        warnings,
                        duration,
                        state: PublishState::Aborted.as_str().to_string(),
                    })
                } else {
                    Ok(PublishReport {
                        success: true,
                        package_name,
                        version,
                        staging_dir,
                        published_at: outcome.published.then(Utc::now),
                        errors,
                        warnings,
                        duration,
                        state: self.state_machine.state().as_str().to_string(),
                    })
                }
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn run_pipeline(
        &mut self,
        staging: &Path,
        config: &PublishConfig,
        source_manifest: &serde_json::Value,
        publisher: &dyn RegistryPublisher,
        runner: &dyn ScriptRunner,
        warnings: &mut Vec<String>,
    ) -> Result<PipelineOutcome, PublishError> {
        // 1. Stage the filtered source tree
        let staging_name = staging
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let tree = stager::read_source_tree(&self.project_path)?;
        let exclusions = ExclusionSpec::new(&staging_name, config.excluded_files())?;
        let retained = exclusions.filter(tree);
        stager::stage(&retained, &self.project_path, staging).await?;
        self.state_machine.transition(PublishState::Staged);
        println!("📦 Staged {} files", retained.len());

        // 2. Write the sanitized manifest into the staged copy
        let cleaned = manifest::sanitize(
            source_manifest,
            &config.excluded_fields(),
            config.excluded_conditions(),
            config.prune_empty_exports(),
        );
        manifest::write(staging, &cleaned).await?;
        self.state_machine.transition(PublishState::ManifestWritten);
        println!("🧹 Manifest sanitized");

        // 3. Optional transformers; they touch disjoint file sets
        if config.clean_docs() {
            let repository_url = config
                .repository_url()
                .map(|url| url.to_string())
                .or_else(|| docs::repository_from_manifest(source_manifest));

            match repository_url {
                Some(url) => {
                    if docs::trim_staged_docs(staging, &url).await? {
                        self.state_machine.transition(PublishState::DocsTrimmed);
                        println!("📄 Docs trimmed");
                    }
                }
                None => {
                    warnings.push("Repository URL unknown; docs left untrimmed".to_string());
                }
            }
        }

        if config.clean_comments() {
            let processed = comments::strip_staged_sources(staging).await?;
            self.state_machine.transition(PublishState::CommentsStripped);
            println!("✂️  Comments stripped from {} files", processed);
        }

        // 4. Pre-publish hook gates the publish step
        if let Some(script) = config.before_script() {
            println!("🪝 Running pre-publish hook...");
            let hook_ok =
                runner
                    .run(script, staging)
                    .await
                    .map_err(|e| PublishError::Command {
                        stage: "hook",
                        message: e.to_string(),
                    })?;
            self.state_machine.transition(PublishState::HookRun);

            if !hook_ok {
                self.state_machine.transition(PublishState::Aborted);
                println!("❌ Pre-publish hook failed; publish skipped");
                return Ok(PipelineOutcome {
                    published: false,
                    hook_failed: Some(script.to_string()),
                });
            }
        }

        // 5. Publish, unless the caller opted out
        if config.without_publish() {
            println!("📦 Publish skipped (without-publish mode)");
            return Ok(PipelineOutcome {
                published: false,
                hook_failed: None,
            });
        }

        println!("📤 Publishing with {}...", publisher.name());
        let args = PublishArgs {
            dry_run: config.dry_run(),
            access: config.access.clone(),
            tag: config.tag.clone(),
        };
        let outcome = publisher
            .publish(staging, &args)
            .await
            .map_err(|e| PublishError::Command {
                stage: "publish",
                message: e.to_string(),
            })?;

        if !outcome.success {
            return Err(PublishError::PublishRejected {
                message: outcome
                    .error
                    .unwrap_or_else(|| "publish command failed".to_string()),
            });
        }

        self.state_machine.transition(PublishState::Published);
        println!("✅ Published");

        Ok(PipelineOutcome {
            published: true,
            hook_failed: None,
        })
    }
}

fn manifest_string(manifest: &serde_json::Value, key: &str) -> String {
    manifest
        .get(key)
        .and_then(|value| value.as_str())
        .unwrap_or("unknown")
        .to_string()
}
