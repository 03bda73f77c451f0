pub mod registry;
pub mod script;

pub use registry::CommandRegistryPublisher;
pub use script::ShellScriptRunner;
