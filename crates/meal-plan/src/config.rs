//! Planner configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! default_categories = ["soup", "main_chicken", "side_vegetable"]
//! default_mode = "weekly"
//! no_repeat_across_week = true
//! timeout_ms = 2000
//! diagnose_filters = true
//! ```

use crate::types::PlanMode;
use meal_catalog::SlotCategory;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML or field values
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantically invalid settings
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Categories used when no usable profile is supplied
    pub default_categories: Vec<SlotCategory>,
    /// Mode for requests built from config
    pub default_mode: PlanMode,
    /// Repeat rule for requests built from config
    pub no_repeat_across_week: bool,
    /// Deadline for one whole generation call
    pub timeout_ms: Option<u64>,
    /// Probe which filters block an empty slot
    pub diagnose_filters: bool,
}

impl PlannerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML
    ///
    /// # Errors
    /// Malformed TOML, an empty default category list or a zero timeout.
    /// Repeated categories are kept at their first position only.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(toml)?;
        config.validate()?;
        config.default_categories = first_occurrences(&config.default_categories);
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// IO failure or any [`from_toml_str`](Self::from_toml_str) error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_categories.is_empty() {
            return Err(ConfigError::Invalid(
                "default_categories must not be empty".to_string(),
            ));
        }
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid("timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// With default categories, repeats dropped after their first position
    #[inline]
    #[must_use]
    pub fn with_default_categories(mut self, categories: Vec<SlotCategory>) -> Self {
        self.default_categories = first_occurrences(&categories);
        self
    }

    /// With timeout
    ///
    /// A zero duration clears the deadline; anything shorter than a
    /// millisecond is rounded up to one.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = if timeout.is_zero() {
            None
        } else {
            Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX).max(1))
        };
        self
    }

    /// With filter diagnosis toggled
    #[inline]
    #[must_use]
    pub fn with_diagnose_filters(mut self, enabled: bool) -> Self {
        self.diagnose_filters = enabled;
        self
    }

    /// Configured deadline
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Categories in order with repeats removed
pub(crate) fn first_occurrences(categories: &[SlotCategory]) -> Vec<SlotCategory> {
    let mut unique = Vec::with_capacity(categories.len());
    for &category in categories {
        if !unique.contains(&category) {
            unique.push(category);
        }
    }
    unique
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_categories: SlotCategory::ALL.to_vec(),
            default_mode: PlanMode::Daily,
            no_repeat_across_week: true,
            timeout_ms: None,
            diagnose_filters: true,
        }
    }
}
