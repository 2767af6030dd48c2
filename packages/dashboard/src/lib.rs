#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sentiment map dashboard.
//!
//! Owns the loaded dataset, the region aggregates, and one session's
//! [`SelectionState`], and renders them into the models a map/chart
//! frontend draws: marker layers, topic charts, and the detail panel.
//!
//! All selection changes go through the `choose_*` methods on
//! [`Dashboard`], which resolve cities, regions, and marker clicks into
//! locations before handing them to the state machine.

pub mod chart;
pub mod detail;
pub mod markers;
pub mod selection;
pub mod view;

use sentiment_map_analytics::{
    AnalyticsError,
    posts::{PostPartition, partition_with},
    ranking::{find_location, rank_by_chs},
    regions::RegionCache,
};
use sentiment_map_dataset::{DatasetError, Locations, config::DashboardConfig, load_dataset};
use sentiment_map_location_models::{LocationRecord, Region, RegionRecord};
use sentiment_map_sentiment_models::Topic;
use serde::{Deserialize, Serialize};

use crate::{
    chart::{ChartSeries, topic_chart},
    detail::{DetailPanel, detail_panel},
    markers::{MarkerKey, MarkerLayer, MarkerStyle, legacy_markers, markers_for_view},
    selection::{SelectionError, SelectionState},
    view::ViewMode,
};

/// Errors from dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The selection transition is not valid in the current state.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// A lookup against the dataset failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// The region has no locations, so there is nothing to select.
    #[error("No data for region {}", region.name())]
    RegionWithoutData {
        /// The empty region.
        region: Region,
    },
}

/// Initial map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSettings {
    /// `[lat, lng]`.
    pub center: [f64; 2],
    pub zoom: f64,
}

/// Everything the frontend needs to draw the current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub view: ViewMode,
    pub map: MapSettings,
    pub markers: MarkerLayer,
    pub detail: DetailPanel,
}

/// A dataset plus one user's selection.
pub struct Dashboard {
    locations: Locations,
    config: DashboardConfig,
    regions: RegionCache,
    selection: SelectionState,
}

impl Dashboard {
    /// Creates a dashboard over `locations` with nothing selected.
    #[must_use]
    pub fn new(locations: Locations, config: DashboardConfig) -> Self {
        Self {
            regions: RegionCache::new(config.missing_score_default),
            selection: SelectionState::new(config.thresholds()),
            locations,
            config,
        }
    }

    /// Loads the dataset `config` points at and creates a dashboard over it.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the dataset cannot be loaded.
    pub async fn load(config: DashboardConfig) -> Result<Self, DatasetError> {
        let locations = load_dataset(&config.resolve_data_path()).await?;
        Ok(Self::new(locations, config))
    }

    #[must_use]
    pub const fn locations(&self) -> &Locations {
        &self.locations
    }

    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Region aggregates, computed on first use.
    pub fn regions(&mut self) -> &[RegionRecord] {
        self.regions.get(&self.locations)
    }

    /// Marker sizes and sentiment range from the configuration.
    #[must_use]
    pub const fn style(&self) -> MarkerStyle {
        MarkerStyle {
            city_size: self.config.marker_size,
            region_size: self.config.region_marker_size,
            sentiment_range: self.config.sentiment_range,
        }
    }

    #[must_use]
    pub const fn map_settings(&self) -> MapSettings {
        MapSettings {
            center: self.config.map_center,
            zoom: self.config.map_zoom,
        }
    }

    /// Marker layer for `view`.
    pub fn markers(&mut self, view: ViewMode) -> MarkerLayer {
        let style = self.style();
        let regions = self.regions.get(&self.locations);
        markers_for_view(view, &self.locations, regions, &style)
    }

    /// Single-layer city markers on the `[0, 10]` scale.
    #[must_use]
    pub fn legacy_markers(&self) -> MarkerLayer {
        legacy_markers(&self.locations, &self.style())
    }

    /// Locations ordered by composite score, happiest first.
    #[must_use]
    pub fn ranked(&self) -> Vec<&LocationRecord> {
        rank_by_chs(&self.locations)
    }

    /// Looks up a city by name.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Analytics`] if the city is unknown.
    pub fn location(&self, city: &str) -> Result<&LocationRecord, DashboardError> {
        Ok(find_location(&self.locations, city)?)
    }

    /// Topic chart for a city, or `None` if it has no topic scores.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Analytics`] if the city is unknown.
    pub fn chart(&self, city: &str) -> Result<Option<ChartSeries>, DashboardError> {
        Ok(topic_chart(self.location(city)?))
    }

    /// Contributing posts for a city and topic, independent of the
    /// selection.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Analytics`] if the city is unknown.
    pub fn posts(&self, city: &str, topic: Topic) -> Result<PostPartition, DashboardError> {
        let location = self.location(city)?;
        Ok(partition_with(location, topic, self.config.thresholds()))
    }

    pub fn choose_view(&mut self, view: ViewMode) {
        self.selection.choose_view(view);
    }

    /// Selects a city.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Analytics`] if the city is unknown. The
    /// selection is unchanged on error.
    pub fn choose_city(&mut self, city: &str) -> Result<(), DashboardError> {
        let location = find_location(&self.locations, city)?.clone();
        self.selection.choose_location(location);
        Ok(())
    }

    /// Selects a region, displayed as a location named after it.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::RegionWithoutData`] if no location falls in
    /// `region`.
    pub fn choose_region(&mut self, region: Region) -> Result<(), DashboardError> {
        let location = self
            .regions
            .get(&self.locations)
            .iter()
            .find(|record| record.region == region)
            .and_then(RegionRecord::to_location_record)
            .ok_or(DashboardError::RegionWithoutData { region })?;
        self.selection.choose_location(location);
        Ok(())
    }

    /// Selects whatever a marker click points at.
    ///
    /// # Errors
    ///
    /// See [`Self::choose_city`] and [`Self::choose_region`].
    pub fn choose_marker(&mut self, key: &MarkerKey) -> Result<(), DashboardError> {
        match key {
            MarkerKey::City(city) => self.choose_city(city),
            MarkerKey::Region(region) => self.choose_region(*region),
        }
    }

    /// Drills into `topic` for the selected location.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Selection`] if the transition is not
    /// valid in the current state.
    pub fn choose_topic(&mut self, topic: Topic) -> Result<&PostPartition, DashboardError> {
        Ok(self.selection.choose_topic(topic)?)
    }

    pub fn clear_topic(&mut self) {
        self.selection.clear_topic();
    }

    /// Detail panel for the current selection.
    #[must_use]
    pub fn detail(&self) -> DetailPanel {
        detail_panel(&self.selection, self.config.recent_posts_limit)
    }

    /// Renders the whole dashboard for the current selection.
    pub fn snapshot(&mut self) -> DashboardSnapshot {
        let view = self.selection.view();
        DashboardSnapshot {
            view,
            map: self.map_settings(),
            markers: self.markers(view),
            detail: self.detail(),
        }
    }
}
