use crate::utils::error::{ListingError, Result};
use std::fmt::Display;
use std::ops::RangeInclusive;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn rejected(field: &str, value: impl Display, reason: impl Into<String>) -> ListingError {
    ListingError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Backends are only ever reached over http(s).
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| rejected(field, value, format!("Invalid URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(rejected(field, value, format!("Expected http or https, got {}", other))),
    }
}

pub fn require<'a, T>(field: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ListingError::MissingConfigError {
        field: field.to_string(),
    })
}

pub fn validate_not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(rejected(field, value, "Must not be blank"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display>(
    field: &str,
    value: T,
    range: RangeInclusive<T>,
) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        let reason = format!("Must be between {} and {}", range.start(), range.end());
        Err(rejected(field, value, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_http_urls_pass() {
        assert!(validate_url("backend.endpoint", "https://db.example.com/v1").is_ok());
        assert!(validate_url("geocoding.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("backend.endpoint", "").is_err());
        assert!(validate_url("backend.endpoint", "db.example.com").is_err());

        match validate_url("storage.endpoint", "s3://bucket/images") {
            Err(ListingError::InvalidConfigValueError { field, reason, .. }) => {
                assert_eq!(field, "storage.endpoint");
                assert!(reason.contains("s3"));
            }
            other => panic!("expected InvalidConfigValueError, got {:?}", other),
        }
    }

    #[test]
    fn test_upload_limit_range() {
        assert!(validate_range("submission.max_concurrent_uploads", 4, 1..=32).is_ok());
        assert!(validate_range("submission.max_concurrent_uploads", 32, 1..=32).is_ok());
        assert!(validate_range("submission.max_concurrent_uploads", 0, 1..=32).is_err());
        assert!(validate_range("submission.max_concurrent_uploads", 33, 1..=32).is_err());
    }

    #[test]
    fn test_require_and_not_blank() {
        let bucket = Some("listing-images".to_string());
        assert_eq!(require("storage.bucket", &bucket).unwrap(), "listing-images");
        assert!(matches!(
            require::<String>("storage.region", &None),
            Err(ListingError::MissingConfigError { .. })
        ));
        assert!(validate_not_blank("submission.navigation_route", "  ").is_err());
    }
}
