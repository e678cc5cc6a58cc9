#[cfg(feature = "s3")]
use crate::adapters::http_storage::content_type_for;
#[cfg(feature = "s3")]
use crate::domain::model::ImageRef;
#[cfg(feature = "s3")]
use crate::domain::ports::ObjectStorage;
#[cfg(feature = "s3")]
use crate::utils::error::{ListingError, Result};
#[cfg(feature = "s3")]
use aws_sdk_s3::error::ProvideErrorMetadata;
#[cfg(feature = "s3")]
use aws_sdk_s3::primitives::ByteStream;
#[cfg(feature = "s3")]
use aws_sdk_s3::Client as S3Client;

#[cfg(feature = "s3")]
#[derive(Debug, Clone)]
pub struct S3ObjectStorage {
    client: S3Client,
    bucket: String,
    region: String,
}

#[cfg(feature = "s3")]
impl S3ObjectStorage {
    pub fn new(client: S3Client, bucket: String, region: String) -> Self {
        Self {
            client,
            bucket,
            region,
        }
    }

    /// Builds a client from the default AWS credential chain.
    pub async fn from_env(bucket: String, region: String) -> Self {
        let shared = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let config = aws_sdk_s3::config::Builder::from(&shared)
            .region(aws_sdk_s3::config::Region::new(region.clone()))
            .build();
        Self::new(S3Client::from_conf(config), bucket, region)
    }

    pub fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, key
        )
    }
}

#[cfg(feature = "s3")]
#[async_trait::async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn upload(&self, image: &ImageRef, destination: &str) -> Result<String> {
        let body = ByteStream::from_path(image.path())
            .await
            .map_err(|e| ListingError::ImageUploadError {
                image: image.to_string(),
                message: format!("cannot read file: {}", e),
            })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(destination)
            .content_type(content_type_for(image))
            .body(body)
            .send()
            .await
            .map_err(|err| {
                let service_error = err.into_service_error();
                ListingError::ImageUploadError {
                    image: image.to_string(),
                    message: format!(
                        "{}: {}",
                        service_error.code().unwrap_or("S3"),
                        service_error.message().unwrap_or("put_object failed")
                    ),
                }
            })?;

        Ok(self.public_url(destination))
    }
}
