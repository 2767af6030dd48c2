//! Dashboard configuration.
//!
//! Read from an optional TOML file. Every key has a default, so a missing
//! file and an empty file behave the same.
//!
//! ```toml
//! data_path = "data/api_1_analysis.json"
//! positive_threshold = 6.0
//! negative_threshold = 4.0
//! sentiment_range = [4.0, 6.0]
//! marker_size = 12
//! ```

use std::path::{Path, PathBuf};

use sentiment_map_analytics::posts::Thresholds;
use serde::{Deserialize, Serialize};

use crate::{DatasetError, paths};

/// Tunables for rendering and analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Dataset to load. Relative paths resolve against the project root.
    pub data_path: Option<PathBuf>,
    /// Timeseries scores strictly above this count as positive.
    pub positive_threshold: f64,
    /// Timeseries scores strictly below this count as negative.
    pub negative_threshold: f64,
    /// Substitute for missing scores when aggregating regions.
    pub missing_score_default: f64,
    /// `[low, high]` of the red-to-green sentiment scale.
    pub sentiment_range: [f64; 2],
    /// City marker diameter in pixels.
    pub marker_size: u32,
    /// Region marker diameter in pixels.
    pub region_marker_size: u32,
    /// Initial map center as `[lat, lng]`.
    pub map_center: [f64; 2],
    /// Initial map zoom.
    pub map_zoom: f64,
    /// Posts listed in the attention detail panel.
    pub recent_posts_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            positive_threshold: 6.0,
            negative_threshold: 4.0,
            missing_score_default: 5.0,
            sentiment_range: [4.0, 6.0],
            marker_size: 12,
            region_marker_size: 24,
            map_center: [55.0, -1.0],
            map_zoom: 6.5,
            recent_posts_limit: 10,
        }
    }
}

impl DashboardConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Config`] on invalid TOML or unknown keys, and
    /// [`DatasetError::Invalid`] if the thresholds or sentiment range are
    /// inverted.
    pub fn from_toml(text: &str) -> Result<Self, DatasetError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration at `path`, or the defaults if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_toml(&text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(DatasetError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Loads the configuration from `SENTIMENT_MAP_CONFIG` or the default
    /// location.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn from_env() -> Result<Self, DatasetError> {
        Self::load(&paths::config_path_from_env())
    }

    fn validate(&self) -> Result<(), DatasetError> {
        if self.negative_threshold > self.positive_threshold {
            return Err(DatasetError::Invalid {
                message: format!(
                    "negative_threshold {} is above positive_threshold {}",
                    self.negative_threshold, self.positive_threshold
                ),
            });
        }
        if self.sentiment_range[0] > self.sentiment_range[1] {
            return Err(DatasetError::Invalid {
                message: format!(
                    "sentiment_range [{}, {}] is inverted",
                    self.sentiment_range[0], self.sentiment_range[1]
                ),
            });
        }
        Ok(())
    }

    /// Post partition thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> Thresholds {
        Thresholds {
            positive_above: self.positive_threshold,
            negative_below: self.negative_threshold,
        }
    }

    /// Dataset path to load: `SENTIMENT_MAP_DATA`, then `data_path`, then
    /// the default.
    #[must_use]
    pub fn resolve_data_path(&self) -> PathBuf {
        if let Some(path) = std::env::var_os(paths::DATA_PATH_ENV) {
            return PathBuf::from(path);
        }
        self.configured_data_path()
    }

    /// Dataset path from this configuration alone, ignoring the
    /// environment.
    #[must_use]
    pub fn configured_data_path(&self) -> PathBuf {
        match &self.data_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => paths::project_root().join(path),
            None => paths::default_dataset_path(),
        }
    }
}
