use crate::domain::model::{Listing, ListingDraft};
use crate::domain::ports::DocumentStore;
use crate::utils::error::{ListingError, Result};

pub const DEFAULT_COLLECTION: &str = "myAppliances";

pub struct ListingSubmitter<D: DocumentStore> {
    store: D,
    collection: String,
}

impl<D: DocumentStore> ListingSubmitter<D> {
    pub fn new(store: D) -> Self {
        Self {
            store,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Issues exactly one insert. The built record is dropped once the
    /// request completes, whatever the outcome.
    pub async fn submit(
        &self,
        draft: ListingDraft,
        image_urls: Vec<String>,
        user_id: &str,
    ) -> Result<String> {
        let listing: Listing = draft.into_listing(image_urls, user_id);
        tracing::debug!(
            "Writing listing '{}' with {} image(s) to {}",
            listing.name,
            listing.images.len(),
            self.collection
        );

        self.store
            .insert(&self.collection, &listing)
            .await
            .map_err(|e| match e {
                already @ ListingError::MetadataWriteError { .. } => already,
                other => ListingError::MetadataWriteError {
                    message: other.to_string(),
                },
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Category, Coordinates, ImageRef};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MemoryStore {
        rows: Arc<Mutex<Vec<(String, Listing)>>>,
        broken: bool,
    }

    #[async_trait]
    impl DocumentStore for MemoryStore {
        async fn insert(&self, collection: &str, listing: &Listing) -> Result<String> {
            if self.broken {
                return Err(ListingError::IoError(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                )));
            }
            let mut rows = self.rows.lock().await;
            rows.push((collection.to_string(), listing.clone()));
            Ok(format!("doc-{}", rows.len()))
        }
    }

    fn draft() -> ListingDraft {
        ListingDraft::new(
            "Stand mixer",
            "5L bowl",
            Category::Kitchen,
            8,
            "Groenplaats, Antwerpen",
            Coordinates::new(51.2194, 4.4009),
            vec![ImageRef::new("mixer.jpg")],
        )
    }

    #[tokio::test]
    async fn test_submit_writes_one_record() {
        let store = MemoryStore::default();
        let submitter = ListingSubmitter::new(store.clone());

        let id = tokio_test::assert_ok!(
            submitter
                .submit(draft(), vec!["https://cdn/mixer.jpg".to_string()], "u-42")
                .await
        );

        assert_eq!(id, "doc-1");
        let rows = store.rows.lock().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "myAppliances");
        assert_eq!(rows[0].1.user_id, "u-42");
        assert_eq!(rows[0].1.images, vec!["https://cdn/mixer.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_write_failure_is_metadata_error() {
        let store = MemoryStore {
            broken: true,
            ..Default::default()
        };
        let submitter = ListingSubmitter::new(store).with_collection("listings");

        let err = tokio_test::assert_err!(submitter.submit(draft(), vec![], "u-42").await);
        assert!(matches!(err, ListingError::MetadataWriteError { .. }));
        assert!(err.to_string().contains("connection reset"));
    }
}
