use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    /// Presigned GET URL for `bucket/key`. `expires_in` is passed through unvalidated.
    async fn presign_get(&self, bucket: &str, key: &str, expires_in: i64) -> Result<String>;
}
