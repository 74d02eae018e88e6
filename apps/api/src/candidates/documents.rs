//! Object storage for uploaded resume files.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores `bytes` at `path` and returns the public URL.
    async fn put(&self, path: &str, bytes: Bytes, content_type: &str) -> Result<String, AppError>;

    async fn fetch(&self, path: &str) -> Result<Bytes, AppError>;

    /// Inverse of the URL returned by [`DocumentStore::put`]. `None` for URLs
    /// that point elsewhere.
    fn path_from_public_url(&self, url: &str) -> Option<String>;
}

/// Builds `{base}/{bucket}/{path}` and recovers `path` from it.
#[derive(Debug, Clone)]
pub struct PublicUrls {
    prefix: String,
}

impl PublicUrls {
    pub fn new(public_base: &str, bucket: &str) -> Self {
        Self {
            prefix: format!("{}/{}/", public_base.trim_end_matches('/'), bucket),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }

    pub fn path_of(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.prefix)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
    }
}

pub struct S3DocumentStore {
    client: S3Client,
    bucket: String,
    urls: PublicUrls,
}

impl S3DocumentStore {
    pub fn new(client: S3Client, bucket: String, public_base: &str) -> Self {
        let urls = PublicUrls::new(public_base, &bucket);
        Self {
            client,
            bucket,
            urls,
        }
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn put(&self, path: &str, bytes: Bytes, content_type: &str) -> Result<String, AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded resume to s3://{}/{}", self.bucket, path);
        Ok(self.urls.url_for(path))
    }

    async fn fetch(&self, path: &str) -> Result<Bytes, AppError> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 download failed: {e}")))?;

        let data = object
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("S3 body read failed: {e}")))?;
        Ok(data.into_bytes())
    }

    fn path_from_public_url(&self, url: &str) -> Option<String> {
        self.urls.path_of(url)
    }
}
