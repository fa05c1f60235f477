//! Runtime configuration for the review services.
//!
//! Defaults match the production deployment; [`ReviewConfig::from_env`]
//! overrides them from `FIELDREVIEW_*` environment variables.

use crate::review::domain::{ReviewDomainError, TrustedImageHost};
use thiserror::Error;

/// Environment variable overriding the trusted image-host prefix.
pub const TRUSTED_IMAGE_PREFIX_ENV: &str = "FIELDREVIEW_TRUSTED_IMAGE_PREFIX";

/// Environment variable overriding the claimable-restaurant cap.
pub const CLAIMABLE_LIMIT_ENV: &str = "FIELDREVIEW_CLAIMABLE_LIMIT";

/// Default cap on candidates scanned per nearby-restaurants query.
pub const DEFAULT_CLAIMABLE_LIMIT: usize = 200;

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// The image-host prefix is not an `https` URL.
    #[error("FIELDREVIEW_TRUSTED_IMAGE_PREFIX: {0}")]
    InvalidImageHost(#[source] ReviewDomainError),

    /// The claimable limit is not a positive integer.
    #[error("FIELDREVIEW_CLAIMABLE_LIMIT must be a positive integer, got '{0}'")]
    InvalidClaimableLimit(String),
}

/// Settings shared by the task coordinator and its queries.
///
/// # Examples
///
/// ```
/// use fieldreview::config::{DEFAULT_CLAIMABLE_LIMIT, ReviewConfig};
///
/// let config = ReviewConfig::default();
/// assert_eq!(config.claimable_limit, DEFAULT_CLAIMABLE_LIMIT);
/// assert_eq!(config.trusted_image_host.prefix(), "https://res.cloudinary.com/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewConfig {
    /// Image store whose URLs are accepted as review evidence.
    pub trusted_image_host: TrustedImageHost,
    /// Maximum number of unclaimed restaurants ranked per query. There is no
    /// pagination beyond this cap.
    pub claimable_limit: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            trusted_image_host: TrustedImageHost::default(),
            claimable_limit: DEFAULT_CLAIMABLE_LIMIT,
        }
    }
}

impl ReviewConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value. Unset or blank variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(prefix) = read(TRUSTED_IMAGE_PREFIX_ENV) {
            config.trusted_image_host =
                TrustedImageHost::new(prefix).map_err(ConfigError::InvalidImageHost)?;
        }
        if let Some(raw) = read(CLAIMABLE_LIMIT_ENV) {
            config.claimable_limit = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidClaimableLimit(raw))?;
        }
        Ok(config)
    }

    /// Replaces the trusted image host.
    #[must_use]
    pub fn with_trusted_image_host(mut self, host: TrustedImageHost) -> Self {
        self.trusted_image_host = host;
        self
    }

    /// Replaces the claimable-restaurant cap.
    #[must_use]
    pub const fn with_claimable_limit(mut self, limit: usize) -> Self {
        self.claimable_limit = limit;
        self
    }
}
