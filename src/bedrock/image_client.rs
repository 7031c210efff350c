use crate::{
    bedrock::ModelInvoker,
    error::{GenerationError, Result},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{primitives::Blob, Client};

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
}

impl ImageClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelInvoker for ImageClient {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        log::info!("Invoking image model: {}", model_id);

        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| GenerationError::from_sdk("InvokeModel", e))?;

        Ok(response.body.into_inner())
    }
}
