// Adapters layer: concrete implementations of the domain ports (storage, documents, geocoding, navigation).

pub mod http_storage;
pub mod navigation;
pub mod nominatim;
pub mod rest_store;
#[cfg(feature = "s3")]
pub mod s3_storage;
