//! Request pipeline: normalize, generate, publish, and wrap the outcome in a response envelope.

use crate::{
    bedrock::{self, ModelFamily, ModelInvoker},
    config::Config,
    error::{GenerationError, Result},
    models::{GenerationRequest, GenerationResult, InboundEvent, ResponseEnvelope},
    storage::{ArtifactPublisher, ObjectStore},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::sync::Arc;

pub const SUCCESS_MESSAGE: &str = "Image generated and stored";

/// Process-wide state shared by every invocation: configuration plus the client handles.
#[derive(Clone)]
pub struct ImageGenerationHandler {
    model_id: String,
    family: ModelFamily,
    default_url_expiry: i64,
    invoker: Arc<dyn ModelInvoker>,
    publisher: ArtifactPublisher,
}

impl ImageGenerationHandler {
    pub fn new(
        config: &Config,
        invoker: Arc<dyn ModelInvoker>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            model_id: config.model_id.clone(),
            family: ModelFamily::from_model_id(&config.model_id),
            default_url_expiry: config.default_url_expiry_seconds,
            invoker,
            publisher: ArtifactPublisher::new(
                store,
                config.image_bucket.clone(),
                config.image_prefix.clone(),
            ),
        }
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    /// Never fails: every error becomes a 400 or 500 envelope.
    pub async fn handle(&self, event: InboundEvent) -> ResponseEnvelope {
        match self.process(&event).await {
            Ok(result) => ResponseEnvelope::json(200, &result),
            Err(e) => {
                if e.is_client_error() {
                    log::warn!("Rejected request: {}", e);
                } else {
                    log::error!("Image generation failed: {}", e);
                }
                ResponseEnvelope::error(e.status_code(), e.to_string())
            }
        }
    }

    pub async fn process(&self, event: &InboundEvent) -> Result<GenerationResult> {
        let request = GenerationRequest::from_event(event, self.default_url_expiry)?;
        log::info!(
            "Generating {}x{} image with {} (seed {})",
            request.width,
            request.height,
            self.model_id,
            request.seed
        );

        let image_b64 =
            bedrock::generate_image(self.invoker.as_ref(), &self.model_id, self.family, &request)
                .await?;
        let image = BASE64
            .decode(image_b64.trim())
            .map_err(|e| GenerationError::ResponseError(e.to_string()))?;

        let (artifact, presigned_url) = self
            .publisher
            .publish(image, request.url_expires_in)
            .await?;

        Ok(GenerationResult {
            message: SUCCESS_MESSAGE.to_string(),
            model_id: self.model_id.clone(),
            bucket: artifact.bucket.clone(),
            s3_uri: artifact.s3_uri(),
            key: artifact.key,
            presigned_url,
            url_expires_in: request.url_expires_in,
        })
    }
}
