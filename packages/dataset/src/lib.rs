#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static dataset loading and dashboard configuration.
//!
//! The analysis export is a single JSON array of location records. It is
//! read once, validated up front, and then shared immutably behind an
//! [`Arc`]. A malformed export fails the load with a [`DatasetError`]
//! instead of rendering a partial map.

pub mod config;
pub mod paths;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sentiment_map_location_models::LocationRecord;
use sentiment_map_sentiment_models::{Topic, compute_chs};
use tokio::sync::OnceCell;

/// Errors that can occur while loading the dataset or configuration.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The dataset is not valid JSON or does not match the record schema.
    #[error("Malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file is not valid TOML.
    #[error("Malformed configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The dataset parsed but violates a record invariant.
    #[error("Invalid dataset: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// How far `overall_chs` may stray from the weighted topic scores before
/// the loader mentions it.
const CHS_DRIFT_TOLERANCE: f64 = 0.5;

/// Shared, immutable location set.
pub type Locations = Arc<Vec<LocationRecord>>;

/// Parses and validates a dataset from its JSON text.
///
/// # Errors
///
/// Returns [`DatasetError::Json`] if the text is not a JSON array of
/// location records, or [`DatasetError::Invalid`] if a record has an empty
/// city name, non-finite or out-of-range coordinates, a non-finite
/// composite score, or a city name that appears twice (ignoring case).
pub fn parse_dataset(json: &str) -> Result<Vec<LocationRecord>, DatasetError> {
    let locations: Vec<LocationRecord> = serde_json::from_str(json)?;
    validate(&locations)?;
    Ok(locations)
}

fn validate(locations: &[LocationRecord]) -> Result<(), DatasetError> {
    let mut seen = BTreeSet::new();

    for (index, location) in locations.iter().enumerate() {
        let invalid = |what: String| DatasetError::Invalid {
            message: format!("record {index} ({:?}): {what}", location.city),
        };

        if location.city.trim().is_empty() {
            return Err(invalid("empty city name".to_string()));
        }
        if !location.lat.is_finite() || !(-90.0..=90.0).contains(&location.lat) {
            return Err(invalid(format!("latitude {} out of range", location.lat)));
        }
        if !location.lng.is_finite() || !(-180.0..=180.0).contains(&location.lng) {
            return Err(invalid(format!("longitude {} out of range", location.lng)));
        }
        if !location.overall_chs.is_finite() {
            return Err(invalid(format!(
                "overall_chs {} is not a number",
                location.overall_chs
            )));
        }
        // City lookups ignore ASCII case, so "York" and "york" collide.
        if !seen.insert(location.city.trim().to_ascii_lowercase()) {
            return Err(invalid("duplicate city".to_string()));
        }
        match &location.overall_topic_scores_0_10 {
            Some(scores) => {
                let missing = Topic::all().len() - scores.present_count();
                if missing > 0 {
                    log::debug!(
                        "Location {} is missing {missing} topic scores, charting them as 0",
                        location.city
                    );
                }
                let weighted = compute_chs(scores);
                if (weighted - location.overall_chs).abs() > CHS_DRIFT_TOLERANCE {
                    log::debug!(
                        "Location {} has overall_chs {:.2} but its topic scores weigh {weighted:.2}",
                        location.city,
                        location.overall_chs
                    );
                }
            }
            None => log::warn!(
                "Location {} has no overall_topic_scores_0_10, details will be unavailable",
                location.city
            ),
        }
    }

    Ok(())
}

/// Reads, parses, and validates the dataset at `path`.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or fails
/// [`parse_dataset`].
pub async fn load_dataset(path: &Path) -> Result<Locations, DatasetError> {
    log::info!("Loading dataset from {}...", path.display());

    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let locations = parse_dataset(&json)?;

    log::info!(
        "Loaded {} locations ({} posts)",
        locations.len(),
        locations.iter().map(LocationRecord::post_count).sum::<usize>()
    );

    Ok(Arc::new(locations))
}

/// A dataset that is loaded on first access and shared afterwards.
///
/// Concurrent first accesses wait on the same load; a failed load is not
/// cached, so the next access retries.
pub struct DatasetCell {
    path: PathBuf,
    cell: OnceCell<Locations>,
}

impl DatasetCell {
    /// Creates a cell that will load from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Returns the dataset, loading it if this is the first access.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the load fails.
    pub async fn get(&self) -> Result<Locations, DatasetError> {
        self.cell
            .get_or_try_init(|| load_dataset(&self.path))
            .await
            .cloned()
    }
}
