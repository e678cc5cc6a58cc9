use crate::core::form::ListingForm;
use crate::domain::ports::{Geocoder, UserDirectory};
use crate::utils::error::{ListingError, Result};

/// Fills the location part of a [`ListingForm`] through the geocoder.
pub struct LocationResolver<G: Geocoder> {
    geocoder: G,
}

impl<G: Geocoder> LocationResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    /// Resolves the typed address, then replaces it with the geocoder's
    /// canonical form. Returns `false` when the address is unknown.
    pub async fn find_location(&self, form: &mut ListingForm) -> Result<bool> {
        let address = form.address().trim().to_string();
        if address.is_empty() {
            return Err(ListingError::ValidationError {
                message: "Enter an address before looking up its location".to_string(),
            });
        }

        let Some(coordinates) = self.geocoder.forward(&address).await? else {
            tracing::info!("📍 No location found for '{}'", address);
            return Ok(false);
        };

        // 以反查結果取代使用者輸入的地址
        form.set_coordinates(coordinates);
        if let Some(canonical) = self.geocoder.reverse(coordinates).await? {
            form.set_address(canonical);
        }

        tracing::info!(
            "📍 Resolved '{}' to ({}, {})",
            address,
            coordinates.latitude,
            coordinates.longitude
        );
        Ok(true)
    }

    /// Prefills coordinates and address from the user's saved location.
    pub async fn prefill_from_profile<U: UserDirectory>(
        &self,
        users: &U,
        form: &mut ListingForm,
        user_id: &str,
    ) -> Result<bool> {
        let Some(coordinates) = users.home_location(user_id).await? else {
            tracing::debug!("User {} has no saved location", user_id);
            return Ok(false);
        };

        form.set_coordinates(coordinates);
        // 座標無效時不反查
        if coordinates.is_set() {
            if let Some(address) = self.geocoder.reverse(coordinates).await? {
                form.set_address(address);
            }
        }
        Ok(true)
    }
}
