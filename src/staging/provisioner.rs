//! Staging-directory provisioning
//!
//! Creates the uniquely named staging directory inside the project root and
//! removes it at run end. The name is derived per run so two runs never
//! share a staging area.

use crate::core::error::PublishError;
use crate::core::traits::StagingProvisioner;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Prefix of every staging directory name
pub const STAGING_PREFIX: &str = ".staging-";

/// Default provisioner creating `.staging-<uuid>` under the project root
#[derive(Debug, Clone)]
pub struct TempStagingProvisioner {
    project_path: PathBuf,
}

impl TempStagingProvisioner {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl StagingProvisioner for TempStagingProvisioner {
    async fn create(&self) -> Result<PathBuf, PublishError> {
        let name = format!("{}{}", STAGING_PREFIX, Uuid::new_v4());
        let path = self.project_path.join(name);

        fs::create_dir_all(&path).await.map_err(|e| {
            PublishError::filesystem("stage", format!("{}: {}", path.display(), e))
        })?;

        Ok(path)
    }

    async fn remove(&self, path: &Path) -> Result<(), PublishError> {
        if !path.exists() {
            return Ok(());
        }

        fs::remove_dir_all(path).await.map_err(|e| {
            PublishError::filesystem("cleanup", format!("{}: {}", path.display(), e))
        })
    }
}
