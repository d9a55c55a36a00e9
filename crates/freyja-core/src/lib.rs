//! Shared configuration and domain types for Freyja Studio.

pub mod app_config;
pub mod brand_profile;
pub mod config;
pub mod site_url;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, SupabaseSettings};
pub use brand_profile::BrandProfile;
pub use config::{load_app_config, load_app_config_from_env};
pub use site_url::normalize_site_url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
