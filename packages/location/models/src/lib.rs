#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location, post, and region record types.
//!
//! [`LocationRecord`] mirrors the static analysis export one-to-one (field
//! names are the export's `snake_case` keys). [`RegionRecord`] is derived at
//! runtime by grouping locations into one of the four [`Region`]s.

use chrono::{DateTime, Utc};
use sentiment_map_sentiment_models::TopicScores;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single social media post mentioning a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Unix timestamp (seconds) the post was created at.
    pub posted_at_timestamp: i64,
    /// Post body.
    pub text: String,
}

impl PostRecord {
    /// Returns the creation time, or `None` if the timestamp is out of
    /// range.
    #[must_use]
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.posted_at_timestamp, 0)
    }
}

/// Per-post topic attribution used for drill-down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesEntry {
    /// Topic scores for this post (usually a subset of topics).
    #[serde(default)]
    pub topic_scores_0_10: TopicScores,
    /// Unix timestamp (seconds) the post was created at.
    pub posted_at_timestamp: i64,
    /// Post body.
    pub text: String,
}

impl TimeseriesEntry {
    /// Returns this entry as a plain [`PostRecord`].
    #[must_use]
    pub fn to_post(&self) -> PostRecord {
        PostRecord {
            posted_at_timestamp: self.posted_at_timestamp,
            text: self.text.clone(),
        }
    }
}

/// A scored city as loaded from the static analysis export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// City name. Unique within a dataset.
    pub city: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Composite happiness/sentiment score (0-10).
    pub overall_chs: f64,
    /// Mean topic scores. `None` when the export omitted them.
    #[serde(default)]
    pub overall_topic_scores_0_10: Option<TopicScores>,
    /// Total post count as written by the batch export, which does not
    /// ship the posts themselves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_posts: Option<usize>,
    /// Posts mentioning this city, in source order.
    #[serde(default)]
    pub posts: Vec<PostRecord>,
    /// Per-post topic attribution, in source order.
    #[serde(default)]
    pub timeseries: Vec<TimeseriesEntry>,
}

impl LocationRecord {
    /// Number of posts mentioning this location. Prefers the exported
    /// `n_posts` total over the length of `posts`.
    #[must_use]
    pub const fn post_count(&self) -> usize {
        match self.n_posts {
            Some(count) => count,
            None => self.posts.len(),
        }
    }

    /// `[lat, lng]` position for map markers.
    #[must_use]
    pub const fn position(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

/// The four fixed UK regions locations are grouped into.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Region {
    /// Scotland
    Scotland,
    /// Northern Ireland
    NorthernIreland,
    /// Wales
    Wales,
    /// England
    England,
}

impl Region {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Scotland,
            Self::NorthernIreland,
            Self::Wales,
            Self::England,
        ]
    }

    /// Human-readable region name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scotland => "Scotland",
            Self::NorthernIreland => "Northern Ireland",
            Self::Wales => "Wales",
            Self::England => "England",
        }
    }

    /// Representative `(lat, lng)` used to place the region's marker.
    #[must_use]
    pub const fn centroid(self) -> (f64, f64) {
        match self {
            Self::Scotland => (56.49, -4.20),
            Self::NorthernIreland => (54.61, -6.63),
            Self::Wales => (52.13, -3.78),
            Self::England => (52.36, -1.17),
        }
    }

    /// Looks a region up by its display name or wire name
    /// (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::all().iter().copied().find(|region| {
            region.name().eq_ignore_ascii_case(name) || region.as_ref().eq_ignore_ascii_case(name)
        })
    }
}

/// Mean scores of every location assigned to one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionScores {
    /// Mean composite score.
    pub overall_chs: f64,
    /// Mean per-topic scores. Every topic is present.
    pub overall_topic_scores_0_10: TopicScores,
}

/// Aggregated scores for one [`Region`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    /// Which region this is.
    pub region: Region,
    /// Representative latitude.
    pub lat: f64,
    /// Representative longitude.
    pub lng: f64,
    /// Number of locations assigned to this region.
    pub location_count: usize,
    /// Total posts across the assigned locations.
    pub post_count: usize,
    /// Mean scores, or `None` when no location was assigned.
    pub scores: Option<RegionScores>,
}

impl RegionRecord {
    /// An empty record for `region` with no assigned locations.
    #[must_use]
    pub const fn empty(region: Region) -> Self {
        let (lat, lng) = region.centroid();
        Self {
            region,
            lat,
            lng,
            location_count: 0,
            post_count: 0,
            scores: None,
        }
    }

    /// Whether at least one location contributed to this region.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.scores.is_some()
    }

    /// Mean composite score, if the region has data.
    #[must_use]
    pub fn overall_chs(&self) -> Option<f64> {
        self.scores.as_ref().map(|s| s.overall_chs)
    }

    /// Converts the region into a [`LocationRecord`] (named after the
    /// region, with no posts) so it can be selected and displayed like a
    /// city. Returns `None` for regions without data.
    #[must_use]
    pub fn to_location_record(&self) -> Option<LocationRecord> {
        let scores = self.scores.as_ref()?;
        Some(LocationRecord {
            city: self.region.name().to_string(),
            lat: self.lat,
            lng: self.lng,
            overall_chs: scores.overall_chs,
            overall_topic_scores_0_10: Some(scores.overall_topic_scores_0_10.clone()),
            n_posts: None,
            posts: Vec::new(),
            timeseries: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_without_posts_or_timeseries() {
        let record: LocationRecord = serde_json::from_str(
            r#"{
                "city": "Leeds",
                "lat": 53.7997,
                "lng": -1.5492,
                "overall_chs": 5.2,
                "overall_topic_scores_0_10": {"safety": 4.1}
            }"#,
        )
        .unwrap();
        assert_eq!(record.city, "Leeds");
        assert_eq!(record.post_count(), 0);
        assert!(record.timeseries.is_empty());
        assert_eq!(
            record.overall_topic_scores_0_10.and_then(|s| s.safety),
            Some(4.1)
        );
    }

    #[test]
    fn batch_export_post_total_wins_over_missing_posts() {
        let record: LocationRecord = serde_json::from_str(
            r#"{
                "city": "Bristol",
                "lat": 51.4545,
                "lng": -2.5879,
                "n_posts": 250,
                "overall_topic_scores_0_10": {"safety": 6.0},
                "overall_chs": 6.1,
                "timeseries": []
            }"#,
        )
        .unwrap();
        assert!(record.posts.is_empty());
        assert_eq!(record.post_count(), 250);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["n_posts"], 250);
    }

    #[test]
    fn rejects_record_without_coordinates() {
        let result: Result<LocationRecord, _> =
            serde_json::from_str(r#"{"city": "Leeds", "overall_chs": 5.2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn post_timestamp_converts_to_datetime() {
        let post = PostRecord {
            posted_at_timestamp: 1_700_000_000,
            text: "hello".to_string(),
        };
        assert_eq!(
            post.posted_at().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }

    #[test]
    fn region_lookup_by_name() {
        assert_eq!(
            Region::from_name("Northern Ireland"),
            Some(Region::NorthernIreland)
        );
        assert_eq!(
            Region::from_name("northern_ireland"),
            Some(Region::NorthernIreland)
        );
        assert_eq!(Region::from_name("wales"), Some(Region::Wales));
        assert_eq!(Region::from_name("Cornwall"), None);
    }

    #[test]
    fn empty_region_has_no_location_record() {
        let record = RegionRecord::empty(Region::Wales);
        assert!(!record.has_data());
        assert!(record.overall_chs().is_none());
        assert!(record.to_location_record().is_none());
    }

    #[test]
    fn region_with_data_converts_to_location_record() {
        let record = RegionRecord {
            scores: Some(RegionScores {
                overall_chs: 6.0,
                overall_topic_scores_0_10: TopicScores::uniform(6.0),
            }),
            location_count: 2,
            ..RegionRecord::empty(Region::Scotland)
        };
        let location = record.to_location_record().unwrap();
        assert_eq!(location.city, "Scotland");
        assert!((location.overall_chs - 6.0).abs() < f64::EPSILON);
        assert!(location.posts.is_empty());
    }
}
