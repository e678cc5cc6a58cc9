use crate::core::form::ListingForm;
use crate::domain::model::{Category, Coordinates, ImageRef};
use crate::utils::error::{ListingError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Listing described in a TOML file, as entered on the form.
///
/// ```toml
/// user_id = "u-42"
/// name = "Hedge trimmer"
/// description = "Cordless, two batteries"
/// price_per_day = 12
/// category = "Garden"
/// address = "Meir 1, Antwerpen"
/// images = ["photos/trimmer-1.jpg", "photos/trimmer-2.jpg"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingInput {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_per_day: Option<i64>,
    pub category: Option<String>,
    #[serde(default)]
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub images: Vec<PathBuf>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl ListingInput {
    /// Relative image paths resolve against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let mut input = Self::from_toml_str(&content)?;
        input.base_dir = path.as_ref().parent().map(Path::to_path_buf);
        Ok(input)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ListingError::ConfigValidationError {
            field: "listing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn image_refs(&self) -> Result<Vec<ImageRef>> {
        self.images
            .iter()
            .map(|p| {
                if p.as_os_str().is_empty() {
                    return Err(ListingError::InvalidConfigValueError {
                        field: "images".to_string(),
                        value: String::new(),
                        reason: "Image path cannot be empty".to_string(),
                    });
                }
                Ok(match &self.base_dir {
                    Some(base) if p.is_relative() => ImageRef::new(base.join(p)),
                    _ => ImageRef::new(p.clone()),
                })
            })
            .collect()
    }

    /// Copies the fields onto the form. An unknown category is an error;
    /// a missing category, address or coordinate pair keeps the form's value.
    pub fn apply_to(&self, form: &mut ListingForm) -> Result<()> {
        form.set_name(self.name.clone());
        form.set_description(self.description.clone());
        form.set_price(
            self.price_per_day
                .and_then(|p| u32::try_from(p).ok())
                .unwrap_or(0),
        );
        if let Some(category) = &self.category {
            form.select_category(category.parse::<Category>()?);
        }
        if !self.address.trim().is_empty() {
            form.set_address(self.address.clone());
        }
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            form.set_coordinates(Coordinates::new(latitude, longitude));
        }
        form.add_images(self.image_refs()?);
        Ok(())
    }

    pub fn to_form(&self) -> Result<ListingForm> {
        let mut form = ListingForm::new();
        self.apply_to(&mut form)?;
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_input_fills_form() {
        let input = ListingInput::from_toml_str(
            r#"
user_id = "u-1"
name = "Drill"
description = "Hammer drill"
price_per_day = 7
category = "maintenance"
address = "Meir 1"
latitude = 51.2
longitude = 4.4
images = ["/abs/drill.jpg"]
"#,
        )
        .unwrap();

        let form = input.to_form().unwrap();
        let draft = form.validate().unwrap();
        assert_eq!(draft.category(), Category::Maintenance);
        assert_eq!(draft.price_per_day(), 7);
        assert_eq!(draft.images(), &[ImageRef::new("/abs/drill.jpg")][..]);
    }

    #[test]
    fn test_negative_price_becomes_zero() {
        let input = ListingInput::from_toml_str("user_id = \"u\"\nprice_per_day = -4\n").unwrap();
        assert_eq!(input.to_form().unwrap().price_per_day(), 0);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let input =
            ListingInput::from_toml_str("user_id = \"u\"\ncategory = \"Select Category\"\n").unwrap();
        assert!(input.to_form().is_err());
    }

    #[test]
    fn test_nan_coordinates_do_not_count_as_location() {
        let input = ListingInput::from_toml_str(
            r#"
user_id = "u-1"
name = "Drill"
description = "Hammer drill"
price_per_day = 7
address = "Meir 1"
latitude = nan
longitude = nan
images = ["/abs/drill.jpg"]
"#,
        )
        .unwrap();

        let form = input.to_form().unwrap();
        assert!(!form.has_valid_location());
        match form.validate() {
            Err(ListingError::InvalidForm { missing }) => {
                assert_eq!(missing, vec!["location".to_string()])
            }
            other => panic!("expected InvalidForm, got {:?}", other),
        }
    }

    #[test]
    fn test_relative_images_resolve_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"user_id = \"u\"\nimages = [\"photos/a.jpg\"]\n")
            .unwrap();

        let input = ListingInput::from_file(&path).unwrap();
        let refs = input.image_refs().unwrap();
        assert_eq!(refs[0].path(), dir.path().join("photos/a.jpg"));
    }

    #[test]
    fn test_empty_image_path_is_rejected() {
        let input = ListingInput::from_toml_str("user_id = \"u\"\nimages = [\"\"]\n").unwrap();
        assert!(matches!(
            input.image_refs(),
            Err(ListingError::InvalidConfigValueError { .. })
        ));
    }
}
