use crate::domain::model::ImageRef;
use crate::domain::ports::ObjectStorage;
use crate::utils::error::{ListingError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const DEFAULT_IMAGE_PREFIX: &str = "images";
pub const DEFAULT_MAX_CONCURRENT_UPLOADS: usize = 4;

/// Uploads a batch of images concurrently and waits for every one of them.
pub struct ImageBatchUploader<S: ObjectStorage + 'static> {
    storage: Arc<S>,
    image_prefix: String,
    max_concurrent_uploads: usize,
}

impl<S: ObjectStorage + 'static> ImageBatchUploader<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            image_prefix: DEFAULT_IMAGE_PREFIX.to_string(),
            max_concurrent_uploads: DEFAULT_MAX_CONCURRENT_UPLOADS,
        }
    }

    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_prefix = prefix.into();
        self
    }

    pub fn with_max_concurrent_uploads(mut self, limit: usize) -> Self {
        self.max_concurrent_uploads = limit.max(1);
        self
    }

    pub fn destination_for(&self, image: &ImageRef) -> String {
        self.under_prefix(&image.file_name())
    }

    /// One object path per image. A repeated file name gets a `-N` suffix
    /// before its extension so no upload overwrites another in the batch.
    pub fn destinations_for(&self, images: &[ImageRef]) -> Vec<String> {
        let mut taken = HashSet::new();
        images
            .iter()
            .map(|image| {
                let mut destination = self.destination_for(image);
                let mut n = 1;
                while !taken.insert(destination.clone()) {
                    destination = self.under_prefix(&numbered(&image.file_name(), n));
                    n += 1;
                }
                destination
            })
            .collect()
    }

    fn under_prefix(&self, name: &str) -> String {
        let prefix = self.image_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", prefix, name)
        }
    }

    /// Returns the remote URLs in input order, or the first failure once
    /// every upload has finished.
    pub async fn upload_all(&self, images: &[ImageRef]) -> Result<Vec<String>> {
        let total = images.len();
        tracing::info!("📤 Uploading {} image(s)", total);

        let permits = Arc::new(Semaphore::new(self.max_concurrent_uploads));
        let mut tasks = JoinSet::new();

        let destinations = self.destinations_for(images);
        for (index, (image, destination)) in images.iter().cloned().zip(destinations).enumerate() {
            let storage = Arc::clone(&self.storage);
            let permits = Arc::clone(&permits);

            tasks.spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => {
                        tracing::debug!("Uploading {} -> {}", image, destination);
                        storage.upload(&image, &destination).await
                    }
                    Err(e) => Err(ListingError::ImageUploadError {
                        image: image.to_string(),
                        message: format!("upload slot unavailable: {}", e),
                    }),
                };
                (index, image, result)
            });
        }

        // 等待全部完成，不因單張失敗提早結束
        let mut slots: Vec<Option<Result<String>>> = (0..total).map(|_| None).collect();
        let mut aborted = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, image, result)) => {
                    if let Err(e) = &result {
                        tracing::warn!("⚠️ Upload of {} failed: {}", image, e);
                    }
                    slots[index] = Some(result);
                }
                Err(e) => {
                    tracing::error!("Upload task aborted: {}", e);
                    aborted.get_or_insert(e);
                }
            }
        }
        if let Some(e) = aborted {
            return Err(ListingError::TaskJoinError(e));
        }

        // 依輸入順序整理結果
        let mut urls = Vec::with_capacity(total);
        let mut first_failure = None;
        let mut failed = 0;
        for slot in slots.into_iter().flatten() {
            match slot {
                Ok(url) => urls.push(url),
                Err(e) => {
                    failed += 1;
                    first_failure.get_or_insert(e);
                }
            }
        }

        match first_failure {
            Some(source) => Err(ListingError::UploadBatchError {
                failed,
                total,
                source: Box::new(source),
            }),
            None => {
                tracing::info!("✅ Uploaded {} image(s)", urls.len());
                Ok(urls)
            }
        }
    }
}

// photo.jpg -> photo-1.jpg
fn numbered(file_name: &str, n: usize) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, n, ext),
        _ => format!("{}-{}", file_name, n),
    }
}
