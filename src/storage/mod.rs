pub mod s3;
pub mod traits;

use crate::{error::Result, models::StoredArtifact};
use std::sync::Arc;
use uuid::Uuid;

pub use s3::S3ObjectStore;
pub use traits::ObjectStore;

pub const IMAGE_CONTENT_TYPE: &str = "image/png";

/// Writes generated images under `{prefix}/{uuid}.png` and mints retrieval links for them.
#[derive(Clone)]
pub struct ArtifactPublisher {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    prefix: String,
}

impl ArtifactPublisher {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    pub fn new_key(&self) -> String {
        format!("{}/{}.png", self.prefix, Uuid::new_v4())
    }

    pub async fn store(&self, image: Vec<u8>) -> Result<StoredArtifact> {
        let key = self.new_key();
        let size_bytes = image.len();

        {
            let _timer = crate::logger::timer("s3 put_object");
            self.store
                .put_object(&self.bucket, &key, image, IMAGE_CONTENT_TYPE)
                .await?;
        }

        log::info!("Stored image at s3://{}/{} ({} bytes)", self.bucket, key, size_bytes);

        Ok(StoredArtifact {
            bucket: self.bucket.clone(),
            key,
            size_bytes,
        })
    }

    pub async fn presign(&self, artifact: &StoredArtifact, expires_in: i64) -> Result<String> {
        self.store
            .presign_get(&artifact.bucket, &artifact.key, expires_in)
            .await
    }

    /// Stores `image`, then presigns a GET URL for it valid for `expires_in` seconds.
    /// A presign failure leaves the stored object in place.
    pub async fn publish(
        &self,
        image: Vec<u8>,
        expires_in: i64,
    ) -> Result<(StoredArtifact, String)> {
        let artifact = self.store(image).await?;
        let url = self.presign(&artifact, expires_in).await?;
        Ok((artifact, url))
    }
}
