use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Form is incomplete: {}", missing.join(", "))]
    InvalidForm { missing: Vec<String> },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Upload of image '{image}' failed: {message}")]
    ImageUploadError { image: String, message: String },

    #[error("{failed} of {total} image uploads failed: {source}")]
    UploadBatchError {
        failed: usize,
        total: usize,
        #[source]
        source: Box<ListingError>,
    },

    #[error("Upload task aborted: {0}")]
    TaskJoinError(#[from] tokio::task::JoinError),

    #[error("Failed to write listing: {message}")]
    MetadataWriteError { message: String },

    #[error("Geocoding failed: {message}")]
    GeocodingError { message: String },
}

/// Workflow stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Validation,
    Upload,
    MetadataWrite,
    Geocoding,
    Configuration,
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserInput,
    Configuration,
    Network,
    Backend,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ListingError {
    pub fn stage(&self) -> SubmissionStage {
        match self {
            ListingError::InvalidForm { .. } | ListingError::ValidationError { .. } => {
                SubmissionStage::Validation
            }
            ListingError::ImageUploadError { .. }
            | ListingError::UploadBatchError { .. }
            | ListingError::TaskJoinError(_) => SubmissionStage::Upload,
            ListingError::MetadataWriteError { .. } => SubmissionStage::MetadataWrite,
            ListingError::GeocodingError { .. } => SubmissionStage::Geocoding,
            ListingError::ConfigError { .. }
            | ListingError::MissingConfigError { .. }
            | ListingError::InvalidConfigValueError { .. }
            | ListingError::ConfigValidationError { .. } => SubmissionStage::Configuration,
            ListingError::HttpError(_)
            | ListingError::IoError(_)
            | ListingError::SerializationError(_) => SubmissionStage::Transport,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ListingError::InvalidForm { .. } | ListingError::ValidationError { .. } => {
                ErrorCategory::UserInput
            }
            ListingError::ConfigError { .. }
            | ListingError::MissingConfigError { .. }
            | ListingError::InvalidConfigValueError { .. }
            | ListingError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ListingError::HttpError(_) => ErrorCategory::Network,
            ListingError::ImageUploadError { .. }
            | ListingError::UploadBatchError { .. }
            | ListingError::MetadataWriteError { .. }
            | ListingError::GeocodingError { .. } => ErrorCategory::Backend,
            ListingError::IoError(_)
            | ListingError::SerializationError(_)
            | ListingError::TaskJoinError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::UserInput => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Backend => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ListingError::InvalidForm { .. } | ListingError::ValidationError { .. } => {
                "Fill in all fields and select at least one image"
            }
            ListingError::ImageUploadError { .. } | ListingError::UploadBatchError { .. } => {
                "Check the image files and the storage endpoint, then submit again"
            }
            ListingError::MetadataWriteError { .. } => {
                "Images were uploaded but the listing was not saved; submit again"
            }
            ListingError::GeocodingError { .. } => {
                "Enter the address differently or set the coordinates manually"
            }
            ListingError::HttpError(_) => "Check the network connection and backend URLs",
            ListingError::ConfigError { .. }
            | ListingError::MissingConfigError { .. }
            | ListingError::InvalidConfigValueError { .. }
            | ListingError::ConfigValidationError { .. } => {
                "Fix the configuration file and try again"
            }
            ListingError::IoError(_)
            | ListingError::SerializationError(_)
            | ListingError::TaskJoinError(_) => "Re-run with --verbose and inspect the logs",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ListingError::InvalidForm { .. } => {
                "Please fill in all fields and select at least one image.".to_string()
            }
            other => format!("Error adding item: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ListingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_distinguishes_upload_and_write() {
        let upload = ListingError::UploadBatchError {
            failed: 1,
            total: 2,
            source: Box::new(ListingError::ImageUploadError {
                image: "a.jpg".to_string(),
                message: "denied".to_string(),
            }),
        };
        let write = ListingError::MetadataWriteError {
            message: "unavailable".to_string(),
        };

        assert_eq!(upload.stage(), SubmissionStage::Upload);
        assert_eq!(write.stage(), SubmissionStage::MetadataWrite);
        assert_eq!(upload.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_invalid_form_message_lists_fields() {
        let err = ListingError::InvalidForm {
            missing: vec!["name".to_string(), "images".to_string()],
        };
        assert_eq!(err.to_string(), "Form is incomplete: name, images");
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().contains("at least one image"));
    }
}
