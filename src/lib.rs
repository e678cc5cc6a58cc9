pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::{AppConfig, ListingInput, StorageKind};

pub use adapters::{
    http_storage::HttpObjectStorage, navigation::LoggingNavigator, nominatim::NominatimGeocoder,
    rest_store::RestDocumentStore,
};
#[cfg(feature = "s3")]
pub use adapters::s3_storage::S3ObjectStorage;

pub use crate::core::{
    form::ListingForm,
    location::LocationResolver,
    workflow::{NavigationPolicy, SubmissionWorkflow, WorkflowSettings},
};
pub use domain::model::{Category, Coordinates, ImageRef, Listing, SubmissionReceipt};
pub use utils::error::{ListingError, Result};
