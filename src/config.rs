use crate::error::{GenerationError, Result};
use std::env;

pub const DEFAULT_MODEL_ID: &str = "amazon.titan-image-generator-v2:0";
pub const DEFAULT_IMAGE_PREFIX: &str = "generated";
pub const DEFAULT_URL_EXPIRY_SECONDS: i64 = 3600;

#[derive(Debug, Clone)]
pub struct Config {
    pub image_bucket: String,
    pub model_id: String,
    pub image_prefix: String,
    pub default_url_expiry_seconds: i64,
    pub bedrock: BedrockConfig,
}

impl Config {
    pub fn new(image_bucket: impl Into<String>) -> Self {
        Config {
            image_bucket: image_bucket.into(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            image_prefix: DEFAULT_IMAGE_PREFIX.to_string(),
            default_url_expiry_seconds: DEFAULT_URL_EXPIRY_SECONDS,
            bedrock: BedrockConfig::default(),
        }
    }

    /// Reads the handler configuration. `IMAGE_BUCKET` has no default.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|name| env::var(name).ok())?;
        config.bedrock = BedrockConfig::from_env();
        Ok(config)
    }

    /// Same as [`Config::from_env`] but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let image_bucket = lookup("IMAGE_BUCKET")
            .filter(|bucket| !bucket.is_empty())
            .ok_or_else(|| GenerationError::ConfigError("IMAGE_BUCKET is not set".into()))?;
        let default_url_expiry_seconds = match lookup("PRESIGNED_URL_EXPIRY_SECONDS") {
            Some(raw) => parse_expiry(&raw)?,
            None => DEFAULT_URL_EXPIRY_SECONDS,
        };

        Ok(Config {
            image_bucket,
            model_id: lookup("BEDROCK_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            image_prefix: lookup("IMAGE_PREFIX")
                .unwrap_or_else(|| DEFAULT_IMAGE_PREFIX.to_string()),
            default_url_expiry_seconds,
            bedrock: BedrockConfig::default(),
        })
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_prefix = prefix.into();
        self
    }

    pub fn with_default_url_expiry(mut self, seconds: i64) -> Self {
        self.default_url_expiry_seconds = seconds;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self
    }
}

fn parse_expiry(raw: &str) -> Result<i64> {
    raw.trim().parse().map_err(|_| {
        GenerationError::ConfigError(format!(
            "PRESIGNED_URL_EXPIRY_SECONDS must be an integer, got {:?}",
            raw
        ))
    })
}

#[derive(Debug, Clone, Default)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let region = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .ok();
        let access_key = env::var("AWS_ACCESS_KEY_ID").ok();
        let secret_key = env::var("AWS_SECRET_ACCESS_KEY").ok();

        BedrockConfig {
            region,
            access_key,
            secret_key,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }
}
