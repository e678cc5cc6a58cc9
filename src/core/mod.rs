pub mod form;
pub mod location;
pub mod submitter;
pub mod uploader;
pub mod workflow;

pub use crate::domain::model::{Category, Coordinates, ImageRef, Listing, ListingDraft, SubmissionReceipt};
pub use crate::domain::ports::{DocumentStore, Geocoder, Navigator, ObjectStorage, UserDirectory};
pub use crate::utils::error::Result;
