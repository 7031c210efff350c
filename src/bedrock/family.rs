use crate::{
    error::{GenerationError, Result},
    models::{
        GenerationRequest, ImageGenerationConfig, LegacyImageRequest, ModelRequestPayload,
        ModelResponsePayload, TextPrompt, TextToImageParams, TitanImageRequest,
    },
};
use serde_json::Value;
use std::fmt;

const TITAN_IMAGE_PREFIX: &str = "amazon.titan-image-generator";

/// Request/response schema family of an image model, resolved once from the configured model id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Titan,
    /// Stability-style `text_prompts` schema. Any unrecognized model id lands here.
    Legacy,
}

impl ModelFamily {
    pub fn from_model_id(model_id: &str) -> Self {
        if model_id.starts_with(TITAN_IMAGE_PREFIX) {
            ModelFamily::Titan
        } else {
            ModelFamily::Legacy
        }
    }

    pub fn build_payload(&self, request: &GenerationRequest) -> ModelRequestPayload {
        match self {
            ModelFamily::Titan => ModelRequestPayload::Titan(titan_payload(request)),
            ModelFamily::Legacy => ModelRequestPayload::Legacy(legacy_payload(request)),
        }
    }

    /// Extracts the base64 image from a raw `InvokeModel` response body.
    ///
    /// Both families share one extractor: either schema is accepted whatever
    /// family produced the request, so only the request side differs per family.
    pub fn extract_image(&self, body: &[u8]) -> Result<String> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| GenerationError::ResponseError(e.to_string()))?;
        extract_image_base64(&ModelResponsePayload::from_value(&value))
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFamily::Titan => write!(f, "titan"),
            ModelFamily::Legacy => write!(f, "legacy"),
        }
    }
}

fn titan_payload(request: &GenerationRequest) -> TitanImageRequest {
    TitanImageRequest {
        task_type: "TEXT_IMAGE".to_string(),
        text_to_image_params: TextToImageParams {
            text: request.prompt.clone(),
            negative_text: request.negative_prompt.clone(),
        },
        image_generation_config: ImageGenerationConfig {
            number_of_images: 1,
            quality: "standard".to_string(),
            cfg_scale: request.cfg_scale,
            height: request.height,
            width: request.width,
            seed: request.seed,
        },
    }
}

fn legacy_payload(request: &GenerationRequest) -> LegacyImageRequest {
    let mut text_prompts = vec![TextPrompt {
        text: request.prompt.clone(),
        weight: None,
    }];
    if let Some(negative) = &request.negative_prompt {
        text_prompts.push(TextPrompt {
            text: negative.clone(),
            weight: Some(-1),
        });
    }

    LegacyImageRequest {
        text_prompts,
        height: request.height,
        width: request.width,
        cfg_scale: request.cfg_scale,
        steps: request.steps,
        seed: request.seed,
    }
}

/// `images[0]` wins, then `artifacts[0].base64`.
pub fn extract_image_base64(response: &ModelResponsePayload) -> Result<String> {
    if let Some(image) = response.first_image().or_else(|| response.first_artifact()) {
        return Ok(image.to_string());
    }

    if let Some(error) = &response.error {
        log::warn!("Model reported an error instead of an image: {}", error);
    }
    Err(GenerationError::NoImagePayload)
}
