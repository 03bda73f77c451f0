pub mod core;
pub mod orchestration;
pub mod process;
pub mod staging;

pub use self::core::*;
pub use self::orchestration::{PublishReport, StagedPublisher};
pub use self::process::{CommandRegistryPublisher, ShellScriptRunner};
pub use self::staging::{ExclusionSpec, TempStagingProvisioner};
