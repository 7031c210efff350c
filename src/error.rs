use aws_sdk_bedrockruntime::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid JSON body")]
    InvalidJsonBody,
    #[error("'prompt' is required")]
    MissingPrompt,
    #[error("'{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("No image payload found in Bedrock response")]
    NoImagePayload,
    #[error("{0}")]
    ResponseError(String),
    #[error("{0}")]
    AwsServiceError(String),
    #[error("{0}")]
    AwsError(String),
}

impl GenerationError {
    /// Status code of the response envelope this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            GenerationError::InvalidJsonBody
            | GenerationError::MissingPrompt
            | GenerationError::InvalidField { .. } => 400,
            _ => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() == 400
    }

    /// Converts an SDK failure for `operation` (e.g. `PutObject`).
    pub fn from_sdk<E, R>(operation: &str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug + 'static,
    {
        log::error!("AWS SDK {} error details: {:?}", operation, err);

        if let Some(service_error) = err.as_service_error() {
            log::error!("Service error code: {:?}", service_error.code());
            log::error!("Service error message: {:?}", service_error.message());
            GenerationError::AwsServiceError(format!(
                "An error occurred ({}) when calling the {} operation: {}",
                service_error.code().unwrap_or("Unknown"),
                operation,
                service_error.message().unwrap_or("no message")
            ))
        } else {
            GenerationError::AwsError(DisplayErrorContext(&err).to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_render_verbatim() {
        assert_eq!(GenerationError::InvalidJsonBody.to_string(), "Invalid JSON body");
        assert_eq!(GenerationError::MissingPrompt.to_string(), "'prompt' is required");
        assert_eq!(GenerationError::InvalidJsonBody.status_code(), 400);
        assert!(GenerationError::MissingPrompt.is_client_error());

        let err = GenerationError::InvalidField {
            field: "height",
            expected: "an integer",
        };
        assert_eq!(err.to_string(), "'height' must be an integer");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_server_errors() {
        assert_eq!(
            GenerationError::NoImagePayload.to_string(),
            "No image payload found in Bedrock response"
        );
        assert_eq!(GenerationError::NoImagePayload.status_code(), 500);

        let err = GenerationError::AwsServiceError("AccessDenied".into());
        assert_eq!(err.to_string(), "AccessDenied");
        assert!(!err.is_client_error());
    }
}
