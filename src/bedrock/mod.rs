pub mod family;
pub mod image_client;

use crate::{
    config::BedrockConfig,
    error::{GenerationError, Result},
    models::{GenerationRequest, ModelRequestPayload},
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_bedrockruntime::config::Credentials;

pub use family::ModelFamily;
pub use image_client::ImageClient;

/// A hosted model endpoint: JSON bytes in, JSON bytes out.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>>;
}

/// Loads the shared AWS configuration used by both the Bedrock and S3 clients.
pub async fn load_sdk_config(bedrock_config: &BedrockConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &bedrock_config.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let (Some(access_key), Some(secret_key)) =
        (&bedrock_config.access_key, &bedrock_config.secret_key)
    {
        loader = loader.credentials_provider(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "imagegen-env",
        ));
    }

    loader.load().await
}

/// Shapes `request` for `family`, calls the model and returns the base64 image it produced.
pub async fn generate_image(
    invoker: &dyn ModelInvoker,
    model_id: &str,
    family: ModelFamily,
    request: &GenerationRequest,
) -> Result<String> {
    let payload: ModelRequestPayload = family.build_payload(request);
    let body = serde_json::to_vec(&payload)
        .map_err(|e| GenerationError::SerializationError(e.to_string()))?;

    log::debug!(
        "Image generation request payload: {}",
        String::from_utf8_lossy(&body)
    );

    let response = {
        let _timer = crate::logger::timer("bedrock invoke_model");
        invoker.invoke(model_id, body).await?
    };

    family.extract_image(&response)
}
