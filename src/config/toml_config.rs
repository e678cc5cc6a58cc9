use crate::adapters::nominatim::DEFAULT_NOMINATIM_ENDPOINT;
use crate::core::submitter::DEFAULT_COLLECTION;
use crate::core::uploader::{DEFAULT_IMAGE_PREFIX, DEFAULT_MAX_CONCURRENT_UPLOADS};
use crate::core::workflow::{NavigationPolicy, WorkflowSettings, DEFAULT_NAVIGATION_ROUTE};
use crate::utils::error::{ListingError, Result};
use crate::utils::validation::{require, validate_not_blank, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_USER_AGENT: &str = "appliance-listing/0.1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub geocoding: Option<GeocodingConfig>,
    pub submission: Option<SubmissionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub endpoint: String,
    pub api_token: Option<String>,
    pub collection: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub r#type: Option<String>,
    pub endpoint: Option<String>,
    pub public_base_url: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub image_prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    pub endpoint: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    pub max_concurrent_uploads: Option<usize>,
    pub navigation_route: Option<String>,
    pub navigation_policy: Option<NavigationPolicy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Http,
    S3,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ListingError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ListingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LISTING_API_TOKEN})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ListingError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn storage_kind(&self) -> Result<StorageKind> {
        match self.storage.r#type.as_deref().unwrap_or("http") {
            "http" => Ok(StorageKind::Http),
            "s3" => Ok(StorageKind::S3),
            other => Err(ListingError::InvalidConfigValueError {
                field: "storage.type".to_string(),
                value: other.to_string(),
                reason: "Supported storage types: http, s3".to_string(),
            }),
        }
    }

    pub fn collection(&self) -> &str {
        self.backend.collection.as_deref().unwrap_or(DEFAULT_COLLECTION)
    }

    pub fn image_prefix(&self) -> &str {
        self.storage.image_prefix.as_deref().unwrap_or(DEFAULT_IMAGE_PREFIX)
    }

    pub fn max_concurrent_uploads(&self) -> usize {
        self.submission
            .as_ref()
            .and_then(|s| s.max_concurrent_uploads)
            .unwrap_or(DEFAULT_MAX_CONCURRENT_UPLOADS)
    }

    pub fn navigation_route(&self) -> &str {
        self.submission
            .as_ref()
            .and_then(|s| s.navigation_route.as_deref())
            .unwrap_or(DEFAULT_NAVIGATION_ROUTE)
    }

    pub fn navigation_policy(&self) -> NavigationPolicy {
        self.submission
            .as_ref()
            .and_then(|s| s.navigation_policy)
            .unwrap_or_default()
    }

    pub fn set_navigation_policy(&mut self, policy: NavigationPolicy) {
        self.submission
            .get_or_insert(SubmissionConfig {
                max_concurrent_uploads: None,
                navigation_route: None,
                navigation_policy: None,
            })
            .navigation_policy = Some(policy);
    }

    pub fn geocoding_endpoint(&self) -> &str {
        self.geocoding
            .as_ref()
            .and_then(|g| g.endpoint.as_deref())
            .unwrap_or(DEFAULT_NOMINATIM_ENDPOINT)
    }

    pub fn user_agent(&self) -> &str {
        self.geocoding
            .as_ref()
            .and_then(|g| g.user_agent.as_deref())
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            collection: self.collection().to_string(),
            image_prefix: self.image_prefix().to_string(),
            max_concurrent_uploads: self.max_concurrent_uploads(),
            navigation_route: self.navigation_route().to_string(),
            navigation_policy: self.navigation_policy(),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        // 後端
        validate_url("backend.endpoint", &self.backend.endpoint)?;
        validate_not_blank("backend.collection", self.collection())?;

        // 圖片儲存，依類型檢查必填欄位
        match self.storage_kind()? {
            StorageKind::Http => {
                let endpoint = require("storage.endpoint", &self.storage.endpoint)?;
                validate_url("storage.endpoint", endpoint)?;
                if let Some(base) = &self.storage.public_base_url {
                    validate_url("storage.public_base_url", base)?;
                }
            }
            StorageKind::S3 => {
                let bucket = require("storage.bucket", &self.storage.bucket)?;
                validate_not_blank("storage.bucket", bucket)?;
                let region = require("storage.region", &self.storage.region)?;
                validate_not_blank("storage.region", region)?;
            }
        }

        // 地理編碼與送出設定
        validate_url("geocoding.endpoint", self.geocoding_endpoint())?;
        validate_range(
            "submission.max_concurrent_uploads",
            self.max_concurrent_uploads(),
            1..=32,
        )?;
        validate_not_blank("submission.navigation_route", self.navigation_route())?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
