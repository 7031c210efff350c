//! Turns an inbound gateway event into a [`GenerationRequest`].

use crate::{
    error::{GenerationError, Result},
    models::{GenerationRequest, InboundEvent},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{Map, Value};

pub const DEFAULT_HEIGHT: i64 = 1024;
pub const DEFAULT_WIDTH: i64 = 1024;
pub const DEFAULT_CFG_SCALE: f64 = 10.0;
pub const DEFAULT_STEPS: i64 = 30;
const SEED_MODULUS: i64 = 4_294_967_295;

impl InboundEvent {
    /// The JSON text carried by the event, decoded when the gateway flagged it as binary.
    pub fn decoded_body(&self) -> Result<String> {
        let body = match self.body.as_deref() {
            Some(body) if !body.is_empty() => body,
            _ => "{}",
        };

        if !self.is_base64_encoded.unwrap_or(false) {
            return Ok(body.to_string());
        }

        let bytes = BASE64.decode(body.trim()).map_err(|e| {
            log::warn!("Failed to base64-decode request body: {}", e);
            GenerationError::InvalidJsonBody
        })?;
        String::from_utf8(bytes).map_err(|_| GenerationError::InvalidJsonBody)
    }
}

impl GenerationRequest {
    pub fn from_event(event: &InboundEvent, default_url_expiry: i64) -> Result<Self> {
        let body = event.decoded_body()?;
        Self::from_json(&body, default_url_expiry)
    }

    pub fn from_json(body: &str, default_url_expiry: i64) -> Result<Self> {
        let payload: Value =
            serde_json::from_str(body).map_err(|_| GenerationError::InvalidJsonBody)?;
        let fields = payload.as_object().ok_or(GenerationError::InvalidJsonBody)?;

        let prompt = match fields.get("prompt") {
            None => return Err(GenerationError::MissingPrompt),
            Some(value) if is_blank(value) => return Err(GenerationError::MissingPrompt),
            Some(Value::String(prompt)) => prompt.clone(),
            Some(_) => {
                return Err(GenerationError::InvalidField {
                    field: "prompt",
                    expected: "a string",
                })
            }
        };

        let negative_prompt = match fields.get("negative_prompt") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) if text.is_empty() => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => {
                return Err(GenerationError::InvalidField {
                    field: "negative_prompt",
                    expected: "a string",
                })
            }
        };

        Ok(GenerationRequest {
            prompt,
            negative_prompt,
            height: integer_field(fields, "height", DEFAULT_HEIGHT)?,
            width: integer_field(fields, "width", DEFAULT_WIDTH)?,
            cfg_scale: float_field(fields, "cfg_scale", DEFAULT_CFG_SCALE)?,
            steps: integer_field(fields, "steps", DEFAULT_STEPS)?,
            seed: integer_field(fields, "seed", default_seed())?,
            url_expires_in: integer_field(fields, "url_expires_in", default_url_expiry)?,
        })
    }
}

// null, false, zero and empty strings/arrays/objects count as not supplied.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Wall-clock derived seed, in `[0, 4294967295)`.
pub fn default_seed() -> i64 {
    chrono::Utc::now().timestamp().rem_euclid(SEED_MODULUS)
}

// Numbers are truncated toward zero and numeric strings are parsed; anything else is rejected.
fn integer_field(fields: &Map<String, Value>, name: &'static str, default: i64) -> Result<i64> {
    let invalid = || GenerationError::InvalidField {
        field: name,
        expected: "an integer",
    };

    match fields.get(name) {
        None => Ok(default),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(value) => Ok(value),
            None => number
                .as_f64()
                .filter(|value| value.is_finite())
                .map(|value| value.trunc() as i64)
                .ok_or_else(invalid),
        },
        Some(Value::String(raw)) => raw.trim().parse().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn float_field(fields: &Map<String, Value>, name: &'static str, default: f64) -> Result<f64> {
    let invalid = || GenerationError::InvalidField {
        field: name,
        expected: "a number",
    };

    let value = match fields.get(name) {
        None => return Ok(default),
        Some(Value::Number(number)) => number.as_f64().ok_or_else(invalid)?,
        Some(Value::String(raw)) => raw.trim().parse::<f64>().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let request = GenerationRequest::from_json(r#"{"prompt": "a red fox"}"#, 3600).unwrap();
        assert_eq!(request.prompt, "a red fox");
        assert_eq!(request.negative_prompt, None);
        assert_eq!(request.height, 1024);
        assert_eq!(request.width, 1024);
        assert_eq!(request.cfg_scale, 10.0);
        assert_eq!(request.steps, 30);
        assert_eq!(request.url_expires_in, 3600);
        assert!((0..SEED_MODULUS).contains(&request.seed));
    }

    #[test]
    fn test_explicit_values_pass_through() {
        let body = r#"{
            "prompt": "lighthouse",
            "negative_prompt": "fog",
            "height": 512,
            "width": "768",
            "cfg_scale": 7.5,
            "steps": 50,
            "seed": 42,
            "url_expires_in": 60
        }"#;
        let request = GenerationRequest::from_json(body, 3600).unwrap();
        assert_eq!(request.negative_prompt.as_deref(), Some("fog"));
        assert_eq!(request.height, 512);
        assert_eq!(request.width, 768);
        assert_eq!(request.cfg_scale, 7.5);
        assert_eq!(request.steps, 50);
        assert_eq!(request.seed, 42);
        assert_eq!(request.url_expires_in, 60);
    }

    #[test]
    fn test_float_integers_truncate() {
        let request =
            GenerationRequest::from_json(r#"{"prompt": "p", "height": 512.9}"#, 3600).unwrap();
        assert_eq!(request.height, 512);
    }

    #[test]
    fn test_missing_or_empty_prompt() {
        let bodies = [
            r#"{}"#,
            r#"{"prompt": ""}"#,
            r#"{"prompt": null}"#,
            r#"{"prompt": false}"#,
            r#"{"prompt": 0}"#,
            r#"{"prompt": []}"#,
            r#"{"prompt": {}}"#,
        ];
        for body in bodies {
            assert!(matches!(
                GenerationRequest::from_json(body, 3600),
                Err(GenerationError::MissingPrompt)
            ));
        }
    }

    #[test]
    fn test_non_string_prompt_is_rejected() {
        for body in [r#"{"prompt": 7}"#, r#"{"prompt": ["fox"]}"#, r#"{"prompt": true}"#] {
            let err = GenerationRequest::from_json(body, 3600).unwrap_err();
            assert_eq!(err.to_string(), "'prompt' must be a string");
        }
    }

    #[test]
    fn test_malformed_json() {
        for body in ["{not json", "[1, 2]", "null"] {
            assert!(matches!(
                GenerationRequest::from_json(body, 3600),
                Err(GenerationError::InvalidJsonBody)
            ));
        }
    }

    #[test]
    fn test_non_numeric_field_is_client_error() {
        let err = GenerationRequest::from_json(r#"{"prompt": "p", "steps": "many"}"#, 3600)
            .unwrap_err();
        assert_eq!(err.to_string(), "'steps' must be an integer");
        assert_eq!(err.status_code(), 400);

        let err = GenerationRequest::from_json(r#"{"prompt": "p", "cfg_scale": [1]}"#, 3600)
            .unwrap_err();
        assert_eq!(err.to_string(), "'cfg_scale' must be a number");
    }

    #[test]
    fn test_empty_negative_prompt_is_absent() {
        let request =
            GenerationRequest::from_json(r#"{"prompt": "p", "negative_prompt": ""}"#, 3600)
                .unwrap();
        assert_eq!(request.negative_prompt, None);
    }

    #[test]
    fn test_decoded_body() {
        assert_eq!(InboundEvent::default().decoded_body().unwrap(), "{}");
        assert_eq!(InboundEvent::with_body("").decoded_body().unwrap(), "{}");

        let event = InboundEvent {
            body: Some(BASE64.encode(r#"{"prompt": "encoded"}"#)),
            is_base64_encoded: Some(true),
        };
        let request = GenerationRequest::from_event(&event, 3600).unwrap();
        assert_eq!(request.prompt, "encoded");

        let event = InboundEvent {
            body: Some("%%%".into()),
            is_base64_encoded: Some(true),
        };
        assert!(matches!(
            event.decoded_body(),
            Err(GenerationError::InvalidJsonBody)
        ));
    }
}
