use crate::domain::model::{Coordinates, ImageRef, Listing};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Blob storage for listing images.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Uploads `image` to `destination` and returns its durable URL.
    async fn upload(&self, image: &ImageRef, destination: &str) -> Result<String>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts one record and returns the generated id.
    async fn insert(&self, collection: &str, listing: &Listing) -> Result<String>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn home_location(&self, user_id: &str) -> Result<Option<Coordinates>>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn forward(&self, address: &str) -> Result<Option<Coordinates>>;
    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>>;
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

impl<T: Navigator + ?Sized> Navigator for &T {
    fn navigate(&self, route: &str) {
        (**self).navigate(route)
    }
}

impl<T: Navigator + ?Sized> Navigator for std::sync::Arc<T> {
    fn navigate(&self, route: &str) {
        (**self).navigate(route)
    }
}
