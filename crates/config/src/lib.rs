// Configuration loading

pub mod error;
pub mod job;

pub use error::ConfigError;
pub use job::{FilesConfig, JobConfig, Overrides};
