#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the sentiment map server.
//!
//! Render models (markers, charts, detail panels) are served as-is from the
//! dashboard crate. The types here cover everything else: listings, query
//! strings, and selection request bodies. Enum-valued inputs arrive as
//! plain strings so the server can answer unknown values with its own
//! error body.

use sentiment_map_location_models::{LocationRecord, Region};
use sentiment_map_sentiment_models::Topic;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Number of locations in the loaded dataset.
    pub location_count: usize,
}

/// A sentiment topic and its composite score weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTopic {
    /// Wire name, e.g. `access_to_services`.
    pub name: Topic,
    /// Display label.
    pub label: String,
    pub weight: f64,
}

impl From<Topic> for ApiTopic {
    fn from(topic: Topic) -> Self {
        Self {
            name: topic,
            label: topic.label().to_string(),
            weight: topic.chs_weight(),
        }
    }
}

/// One row of the location ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLocationSummary {
    /// 1-based rank by composite score.
    pub rank: usize,
    pub city: String,
    pub region: Region,
    pub lat: f64,
    pub lng: f64,
    pub overall_chs: f64,
    pub post_count: usize,
    /// Whether per-topic scores are available.
    pub has_topic_scores: bool,
}

impl ApiLocationSummary {
    #[must_use]
    pub fn new(rank: usize, region: Region, location: &LocationRecord) -> Self {
        Self {
            rank,
            city: location.city.clone(),
            region,
            lat: location.lat,
            lng: location.lng,
            overall_chs: location.overall_chs,
            post_count: location.post_count(),
            has_topic_scores: location.overall_topic_scores_0_10.is_some(),
        }
    }
}

/// Query parameters for the markers endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkersQuery {
    /// View name. Defaults to the session's active view.
    pub view: Option<String>,
}

/// Query parameters for the posts endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsQuery {
    /// Topic name, e.g. `safety`.
    pub topic: String,
}

/// `POST /api/selection/view` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChooseViewRequest {
    pub view: String,
}

/// `POST /api/selection/location` body. Exactly one of `city`, `region`
/// must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChooseLocationRequest {
    pub city: Option<String>,
    pub region: Option<String>,
}

/// `POST /api/selection/topic` body. A missing topic returns to the topic
/// overview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChooseTopicRequest {
    pub topic: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_listing_uses_wire_names() {
        let json = serde_json::to_value(ApiTopic::from(Topic::LifeSatisfaction)).unwrap();
        assert_eq!(json["name"], "life_satisfaction");
        assert_eq!(json["label"], "Life satisfaction");
        assert!((json["weight"].as_f64().unwrap() - 0.06).abs() < 1e-12);
    }

    #[test]
    fn location_summary_is_camel_case() {
        let location = LocationRecord {
            city: "Inverness".to_string(),
            lat: 57.4778,
            lng: -4.2247,
            overall_chs: 6.8,
            overall_topic_scores_0_10: None,
            n_posts: None,
            posts: Vec::new(),
            timeseries: Vec::new(),
        };
        let json =
            serde_json::to_value(ApiLocationSummary::new(1, Region::Scotland, &location)).unwrap();
        assert_eq!(json["overallChs"], 6.8);
        assert_eq!(json["postCount"], 0);
        assert_eq!(json["hasTopicScores"], false);
        assert_eq!(json["region"], "scotland");
    }

    #[test]
    fn location_request_accepts_either_key() {
        let by_city: ChooseLocationRequest = serde_json::from_str(r#"{"city": "Leeds"}"#).unwrap();
        assert_eq!(by_city.city.as_deref(), Some("Leeds"));
        assert!(by_city.region.is_none());

        let by_region: ChooseLocationRequest =
            serde_json::from_str(r#"{"region": "wales"}"#).unwrap();
        assert_eq!(by_region.region.as_deref(), Some("wales"));
    }
}
