use crate::domain::model::{Category, Coordinates, ImageRef, ListingDraft};
use crate::utils::error::{ListingError, Result};

/// Mutable state behind the "add appliance" form.
#[derive(Debug, Clone, Default)]
pub struct ListingForm {
    name: String,
    description: String,
    images: Vec<ImageRef>,
    price_per_day: u32,
    category: Option<Category>,
    address: String,
    coordinates: Coordinates,
}

impl ListingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_price(&mut self, price_per_day: u32) {
        self.price_per_day = price_per_day;
    }

    /// 非數字輸入一律歸零
    pub fn set_price_text(&mut self, text: &str) {
        self.price_per_day = text.trim().parse().unwrap_or(0);
    }

    pub fn select_category(&mut self, category: Category) {
        self.category = Some(category);
    }

    /// Appends to the current selection.
    pub fn add_images<I>(&mut self, images: I)
    where
        I: IntoIterator<Item = ImageRef>,
    {
        self.images.extend(images);
    }

    pub fn remove_image(&mut self, image: &ImageRef) -> bool {
        match self.images.iter().position(|i| i == image) {
            Some(index) => {
                self.images.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
    }

    pub fn set_coordinates(&mut self, coordinates: Coordinates) {
        self.coordinates = coordinates;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
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

    /// Category stored on submit; `Other` when nothing was picked.
    pub fn effective_category(&self) -> Category {
        self.category.unwrap_or_default()
    }

    pub fn is_form_valid(&self) -> bool {
        self.snapshot().missing_form_fields().is_empty()
    }

    pub fn has_valid_location(&self) -> bool {
        self.snapshot().missing_location_fields().is_empty()
    }

    fn snapshot(&self) -> ListingDraft {
        ListingDraft::new(
            self.name.clone(),
            self.description.clone(),
            self.effective_category(),
            self.price_per_day,
            self.address.clone(),
            self.coordinates,
            self.images.clone(),
        )
    }

    pub fn validate(&self) -> Result<ListingDraft> {
        let draft = self.snapshot();
        let missing = draft.missing_fields();

        if !missing.is_empty() {
            tracing::debug!("Form rejected, missing: {:?}", missing);
            return Err(ListingError::InvalidForm { missing });
        }
        Ok(draft)
    }
}
