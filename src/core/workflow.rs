use crate::core::form::ListingForm;
use crate::core::submitter::{ListingSubmitter, DEFAULT_COLLECTION};
use crate::core::uploader::{
    ImageBatchUploader, DEFAULT_IMAGE_PREFIX, DEFAULT_MAX_CONCURRENT_UPLOADS,
};
use crate::domain::model::{ListingDraft, SubmissionReceipt};
use crate::domain::ports::{DocumentStore, Navigator, ObjectStorage};
use crate::utils::error::{ListingError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_NAVIGATION_ROUTE: &str = "myRentals";

/// When the navigation signal fires after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPolicy {
    /// Only after the listing record was written.
    #[default]
    OnSuccess,
    /// As soon as every image is uploaded, even if the write then fails.
    AfterUploads,
}

impl FromStr for NavigationPolicy {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "on_success" => Ok(NavigationPolicy::OnSuccess),
            "after_uploads" => Ok(NavigationPolicy::AfterUploads),
            other => Err(ListingError::InvalidConfigValueError {
                field: "submission.navigation_policy".to_string(),
                value: other.to_string(),
                reason: "Expected on_success or after_uploads".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub collection: String,
    pub image_prefix: String,
    pub max_concurrent_uploads: usize,
    pub navigation_route: String,
    pub navigation_policy: NavigationPolicy,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            image_prefix: DEFAULT_IMAGE_PREFIX.to_string(),
            max_concurrent_uploads: DEFAULT_MAX_CONCURRENT_UPLOADS,
            navigation_route: DEFAULT_NAVIGATION_ROUTE.to_string(),
            navigation_policy: NavigationPolicy::default(),
        }
    }
}

/// Submit Appliance Listing: upload images, write the record, navigate.
pub struct SubmissionWorkflow<S, D, N>
where
    S: ObjectStorage + 'static,
    D: DocumentStore,
    N: Navigator,
{
    uploader: ImageBatchUploader<S>,
    submitter: ListingSubmitter<D>,
    navigator: N,
    navigation_route: String,
    navigation_policy: NavigationPolicy,
}

impl<S, D, N> SubmissionWorkflow<S, D, N>
where
    S: ObjectStorage + 'static,
    D: DocumentStore,
    N: Navigator,
{
    pub fn new(storage: Arc<S>, store: D, navigator: N, settings: WorkflowSettings) -> Self {
        Self {
            uploader: ImageBatchUploader::new(storage)
                .with_image_prefix(settings.image_prefix)
                .with_max_concurrent_uploads(settings.max_concurrent_uploads),
            submitter: ListingSubmitter::new(store).with_collection(settings.collection),
            navigator,
            navigation_route: settings.navigation_route,
            navigation_policy: settings.navigation_policy,
        }
    }

    pub fn navigation_policy(&self) -> NavigationPolicy {
        self.navigation_policy
    }

    /// Validates the form first; an incomplete form never reaches the upload stage.
    pub async fn submit_form(&self, form: &ListingForm, user_id: &str) -> Result<SubmissionReceipt> {
        let draft = form.validate()?;
        self.submit(draft, user_id).await
    }

    /// Rejects an incomplete draft or a blank user before any upload starts.
    pub async fn submit(&self, draft: ListingDraft, user_id: &str) -> Result<SubmissionReceipt> {
        if user_id.trim().is_empty() {
            return Err(ListingError::ValidationError {
                message: "A signed-in user is required to add a listing".to_string(),
            });
        }
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            tracing::warn!("Draft rejected before upload, missing: {:?}", missing);
            return Err(ListingError::InvalidForm { missing });
        }

        tracing::info!("🚀 Submitting listing '{}' for user {}", draft.name(), user_id);

        // 上傳全部圖片，任何一張失敗就不寫入
        let image_urls = self.uploader.upload_all(draft.images()).await?;

        // 寫入刊登資料
        match self
            .submitter
            .submit(draft, image_urls.clone(), user_id)
            .await
        {
            Ok(document_id) => {
                tracing::info!("✅ Listing stored as {}", document_id);
                self.navigator.navigate(&self.navigation_route);
                Ok(SubmissionReceipt {
                    document_id,
                    image_urls,
                    navigated_to: Some(self.navigation_route.clone()),
                    submitted_at: chrono::Utc::now(),
                })
            }
            Err(e) => {
                tracing::error!("❌ Listing write failed after image upload: {}", e);
                // 已上傳的圖片不回滾
                if self.navigation_policy == NavigationPolicy::AfterUploads {
                    tracing::warn!(
                        "Navigating to {} although the listing was not saved",
                        self.navigation_route
                    );
                    self.navigator.navigate(&self.navigation_route);
                }
                Err(e)
            }
        }
    }

    /// Callback flavour of [`submit`](Self::submit): exactly one of the two
    /// callbacks fires.
    pub async fn submit_with_callbacks<F, E>(
        &self,
        draft: ListingDraft,
        user_id: &str,
        on_success: F,
        on_error: E,
    ) -> Result<SubmissionReceipt>
    where
        F: FnOnce(&SubmissionReceipt),
        E: FnOnce(&ListingError),
    {
        let outcome = self.submit(draft, user_id).await;
        match &outcome {
            Ok(receipt) => on_success(receipt),
            Err(e) => on_error(e),
        }
        outcome
    }
}
