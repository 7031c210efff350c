use crate::{
    error::{GenerationError, Result},
    storage::traits::ObjectStore,
};
use async_trait::async_trait;
use aws_sdk_s3::{presigning::PresigningConfig, primitives::ByteStream, Client};
use std::time::Duration;

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        log::debug!("Uploading {} bytes to s3://{}/{}", body.len(), bucket, key);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| GenerationError::from_sdk("PutObject", e))?;

        Ok(())
    }

    async fn presign_get(&self, bucket: &str, key: &str, expires_in: i64) -> Result<String> {
        let seconds = u64::try_from(expires_in).map_err(|_| {
            GenerationError::AwsError(format!(
                "Invalid presigned URL expiry: {} seconds",
                expires_in
            ))
        })?;
        let presigning = PresigningConfig::expires_in(Duration::from_secs(seconds))
            .map_err(|e| GenerationError::AwsError(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| GenerationError::from_sdk("GetObject", e))?;

        Ok(presigned.uri().to_string())
    }
}
