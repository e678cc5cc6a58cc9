use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::utils::error::ListingError;

/// Appliance category offered in the listing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Garden,
    Kitchen,
    Maintenance,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Garden,
        Category::Kitchen,
        Category::Maintenance,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Garden => "Garden",
            Category::Kitchen => "Kitchen",
            Category::Maintenance => "Maintenance",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ListingError::ValidationError {
                message: format!(
                    "Unknown category '{}'. Valid categories: Garden, Kitchen, Maintenance, Other",
                    s
                ),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// A zero component means the location was never resolved. NaN,
    /// infinities and out-of-range values never count as a location.
    pub fn is_set(&self) -> bool {
        let in_range = self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude);
        in_range && self.latitude != 0.0 && self.longitude != 0.0
    }
}

/// Local image selected for upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(PathBuf);

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Last path segment; names the uploaded object.
    pub fn file_name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.to_string_lossy().into_owned())
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Form fields that passed validation. Built by `ListingForm::validate`;
/// the workflow checks it again before anything leaves the process.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    name: String,
    description: String,
    category: Category,
    price_per_day: u32,
    address: String,
    coordinates: Coordinates,
    images: Vec<ImageRef>,
}

impl ListingDraft {
    /// Unchecked; callers run `missing_fields` before trusting the result.
    pub(crate) fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        price_per_day: u32,
        address: impl Into<String>,
        coordinates: Coordinates,
        images: Vec<ImageRef>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category,
            price_per_day,
            address: address.into(),
            coordinates,
            images,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn price_per_day(&self) -> u32 {
        self.price_per_day
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub(crate) fn missing_form_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name".to_string());
        }
        if self.description.trim().is_empty() {
            missing.push("description".to_string());
        }
        if self.images.is_empty() {
            missing.push("images".to_string());
        }
        if self.price_per_day == 0 {
            missing.push("pricePerDay".to_string());
        }
        missing
    }

    pub(crate) fn missing_location_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.address.trim().is_empty() {
            missing.push("address".to_string());
        }
        if !self.coordinates.is_set() {
            missing.push("location".to_string());
        }
        missing
    }

    /// Every blank or invalid field, form fields first.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = self.missing_form_fields();
        missing.extend(self.missing_location_fields());
        missing
    }

    pub fn into_listing(self, image_urls: Vec<String>, user_id: &str) -> Listing {
        Listing {
            name: self.name,
            description: self.description,
            images: image_urls,
            category: self.category,
            address: self.address,
            latitude: self.coordinates.latitude,
            longitude: self.coordinates.longitude,
            user_id: user_id.to_string(),
            price_per_day: self.price_per_day,
        }
    }
}

/// Record written to the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub category: Category,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub user_id: String,
    pub price_per_day: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub document_id: String,
    pub image_urls: Vec<String>,
    pub navigated_to: Option<String>,
    pub submitted_at: DateTime<Utc>,
}
