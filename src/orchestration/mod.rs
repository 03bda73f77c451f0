pub mod staged_publisher;

pub use staged_publisher::{PublishReport, StagedPublisher};
