use serde::Serialize;
use serde_json::Value;

/// Normalized generation parameters with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub height: i64,
    pub width: i64,
    pub cfg_scale: f64,
    pub steps: i64,
    pub seed: i64,
    pub url_expires_in: i64,
}

/// Body sent to `InvokeModel`, one shape per model family.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ModelRequestPayload {
    Titan(TitanImageRequest),
    Legacy(LegacyImageRequest),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TitanImageRequest {
    pub task_type: String,
    pub text_to_image_params: TextToImageParams,
    pub image_generation_config: ImageGenerationConfig,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextToImageParams {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    pub number_of_images: u32,
    pub quality: String,
    pub cfg_scale: f64,
    pub height: i64,
    pub width: i64,
    pub seed: i64,
}

/// Stability-style request (`stability.stable-diffusion-xl-*`).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LegacyImageRequest {
    pub text_prompts: Vec<TextPrompt>,
    pub height: i64,
    pub width: i64,
    pub cfg_scale: f64,
    pub steps: i64,
    pub seed: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextPrompt {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

/// Decoded `InvokeModel` response. Titan fills `images`, Stability fills `artifacts`.
///
/// Fields stay untyped so an unexpected shape in one of them does not hide the other.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponsePayload {
    pub images: Option<Value>,
    pub artifacts: Option<Value>,
    pub error: Option<Value>,
}

impl ModelResponsePayload {
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).cloned();
        Self {
            images: field("images"),
            artifacts: field("artifacts"),
            error: field("error"),
        }
    }

    /// First entry of `images`, when it is a string.
    pub fn first_image(&self) -> Option<&str> {
        self.images.as_ref()?.as_array()?.first()?.as_str()
    }

    /// `base64` of the first entry of `artifacts`, when present.
    pub fn first_artifact(&self) -> Option<&str> {
        self.artifacts
            .as_ref()?
            .as_array()?
            .first()?
            .get("base64")?
            .as_str()
    }
}

/// An image persisted in the object store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArtifact {
    pub bucket: String,
    pub key: String,
    pub size_bytes: usize,
}

impl StoredArtifact {
    pub fn s3_uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}
