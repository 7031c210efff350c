pub mod bedrock;
pub mod config;
pub mod error;
pub mod handler;
pub mod logger;
pub mod models;
pub mod request;
pub mod storage;

pub use bedrock::{ImageClient, ModelFamily, ModelInvoker};
pub use config::{BedrockConfig, Config};
pub use error::{GenerationError, Result};
pub use handler::ImageGenerationHandler;
pub use models::*;
pub use storage::{ArtifactPublisher, ObjectStore, S3ObjectStore};
