#[cfg(feature = "cli")]
pub mod cli;
pub mod listing_input;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliArgs;
pub use listing_input::ListingInput;
pub use toml_config::{AppConfig, StorageKind};
