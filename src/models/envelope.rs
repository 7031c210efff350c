use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The parts of the API Gateway / function URL event the handler reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundEvent {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, rename = "isBase64Encoded")]
    pub is_base64_encoded: Option<bool>,
}

impl InboundEvent {
    pub fn with_body(body: impl Into<String>) -> Self {
        InboundEvent {
            body: Some(body.into()),
            is_base64_encoded: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ResponseEnvelope {
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            status_code,
            headers,
            body: serde_json::to_string(body).unwrap_or_default(),
        }
    }

    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self::json(
            status_code,
            &ErrorBody {
                error: message.into(),
            },
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of a successful response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    pub message: String,
    pub model_id: String,
    pub bucket: String,
    pub key: String,
    pub s3_uri: String,
    pub presigned_url: String,
    pub url_expires_in: i64,
}
