use std::time::Duration;

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::{
    config::Credentials, error::DisplayErrorContext, presigning::PresigningConfig,
    primitives::ByteStream, Client,
};

use crate::conf::settings;
use crate::pkg::internal::ingest::pipeline::BlobStore;
use crate::pkg::internal::ingest::spec::{StorageError, StoredRef};
use crate::prelude::Result;

pub async fn s3_client() -> Client {
    let credentials = Credentials::new(
        &settings.s3_access_key,
        &settings.s3_secret_key,
        None,
        None,
        "hireline-static",
    );
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(settings.s3_region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&settings.s3_endpoint)
        .load()
        .await;
    // MinIO needs path-style addressing
    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .force_path_style(true)
        .build();
    Client::from_conf(s3_config)
}

pub async fn ensure_bucket(client: &Client, bucket_name: &str) -> Result<()> {
    let create = client.create_bucket().bucket(bucket_name).send().await;
    create.map(|_| ()).or_else(|err| {
        if err
            .as_service_error()
            .map(|se| se.is_bucket_already_exists() || se.is_bucket_already_owned_by_you())
            == Some(true)
        {
            Ok(())
        } else {
            Err(StorageError(format!(
                "create bucket {}: {}",
                bucket_name,
                DisplayErrorContext(&err)
            ))
            .into())
        }
    })
}

/// S3-backed blob store for resume binaries.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        S3Store {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl BlobStore for S3Store {
    async fn store(
        &self,
        path: &str,
        bytes: &[u8],
        media_type: &str,
    ) -> core::result::Result<StoredRef, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            // upsert disabled; a path collision must fail the item
            .if_none_match("*")
            .content_type(media_type)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| StorageError(format!("put {}: {}", path, DisplayErrorContext(&e))))?;
        Ok(StoredRef::new(path))
    }

    async fn fetch(&self, stored: &StoredRef) -> core::result::Result<Vec<u8>, StorageError> {
        let out = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&stored.path)
            .send()
            .await
            .map_err(|e| StorageError(format!("get {}: {}", stored.path, DisplayErrorContext(&e))))?;
        let data = out
            .body
            .collect()
            .await
            .map_err(|e| StorageError(format!("read {}: {}", stored.path, e)))?;
        Ok(data.into_bytes().to_vec())
    }

    async fn issue_retrieval_url(
        &self,
        stored: &StoredRef,
        ttl_secs: u64,
    ) -> core::result::Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(Duration::from_secs(ttl_secs))
            .map_err(|e| StorageError(format!("presign config: {}", e)))?;
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&stored.path)
            .presigned(presigning)
            .await
            .map_err(|e| {
                StorageError(format!("presign {}: {}", stored.path, DisplayErrorContext(&e)))
            })?;
        Ok(presigned.uri().to_string())
    }
}
