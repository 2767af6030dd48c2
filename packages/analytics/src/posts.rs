//! Attribution of a location's posts to a topic.
//!
//! Splits a location's timeseries into posts that pulled a topic's score up
//! and posts that dragged it down. Entries in the neutral band, and entries
//! with no score for the topic, belong to neither side.

use sentiment_map_location_models::{LocationRecord, PostRecord};
use sentiment_map_sentiment_models::Topic;
use serde::{Deserialize, Serialize};

/// Score thresholds separating positive and negative contributors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    /// Scores strictly above this are positive.
    pub positive_above: f64,
    /// Scores strictly below this are negative.
    pub negative_below: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            positive_above: 6.0,
            negative_below: 4.0,
        }
    }
}

/// Positive and negative contributors for one topic at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPartition {
    /// Location the posts came from.
    pub city: String,
    /// Topic the posts were scored on.
    pub topic: Topic,
    /// Posts scoring above the positive threshold, in source order.
    pub positive: Vec<PostRecord>,
    /// Posts scoring below the negative threshold, in source order.
    pub negative: Vec<PostRecord>,
}

impl PostPartition {
    /// Whether neither side has any posts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

/// Partitions `location`'s timeseries for `topic` using the default
/// thresholds (> 6 positive, < 4 negative).
#[must_use]
pub fn partition(location: &LocationRecord, topic: Topic) -> PostPartition {
    partition_with(location, topic, Thresholds::default())
}

/// Partitions `location`'s timeseries for `topic` using `thresholds`.
#[must_use]
pub fn partition_with(
    location: &LocationRecord,
    topic: Topic,
    thresholds: Thresholds,
) -> PostPartition {
    let mut positive = Vec::new();
    let mut negative = Vec::new();

    for entry in &location.timeseries {
        let Some(score) = entry.topic_scores_0_10.get(topic) else {
            continue;
        };
        if score > thresholds.positive_above {
            positive.push(entry.to_post());
        } else if score < thresholds.negative_below {
            negative.push(entry.to_post());
        }
    }

    log::trace!(
        "Partitioned {} timeseries entries for {}/{topic}: {} positive, {} negative",
        location.timeseries.len(),
        location.city,
        positive.len(),
        negative.len()
    );

    PostPartition {
        city: location.city.clone(),
        topic,
        positive,
        negative,
    }
}

#[cfg(test)]
mod tests {
    use sentiment_map_location_models::TimeseriesEntry;
    use sentiment_map_sentiment_models::TopicScores;

    use super::*;

    fn entry(ts: i64, text: &str, safety: Option<f64>) -> TimeseriesEntry {
        TimeseriesEntry {
            topic_scores_0_10: TopicScores {
                safety,
                ..TopicScores::default()
            },
            posted_at_timestamp: ts,
            text: text.to_string(),
        }
    }

    fn location(timeseries: Vec<TimeseriesEntry>) -> LocationRecord {
        LocationRecord {
            city: "Norwich".to_string(),
            lat: 52.6309,
            lng: 1.2974,
            overall_chs: 5.0,
            overall_topic_scores_0_10: None,
            n_posts: None,
            posts: Vec::new(),
            timeseries,
        }
    }

    #[test]
    fn splits_on_strict_thresholds() {
        let loc = location(vec![
            entry(1, "bad", Some(3.0)),
            entry(2, "meh", Some(5.0)),
            entry(3, "good", Some(7.0)),
        ]);
        let result = partition(&loc, Topic::Safety);
        assert_eq!(result.positive.len(), 1);
        assert_eq!(result.positive[0].text, "good");
        assert_eq!(result.negative.len(), 1);
        assert_eq!(result.negative[0].text, "bad");
    }

    #[test]
    fn boundary_scores_are_excluded() {
        let loc = location(vec![entry(1, "four", Some(4.0)), entry(2, "six", Some(6.0))]);
        assert!(partition(&loc, Topic::Safety).is_empty());
    }

    #[test]
    fn entries_without_the_topic_are_skipped() {
        let loc = location(vec![entry(1, "untagged", None)]);
        assert!(partition(&loc, Topic::Safety).is_empty());
        let loc = location(vec![entry(1, "other topic", Some(9.0))]);
        assert!(partition(&loc, Topic::Housing).is_empty());
    }

    #[test]
    fn preserves_source_order_without_dedup() {
        let loc = location(vec![
            entry(30, "late", Some(9.0)),
            entry(10, "early", Some(8.0)),
            entry(30, "late", Some(9.0)),
        ]);
        let result = partition(&loc, Topic::Safety);
        let texts: Vec<&str> = result
            .positive
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(texts, ["late", "early", "late"]);
    }

    #[test]
    fn custom_thresholds() {
        let loc = location(vec![entry(1, "a", Some(5.5)), entry(2, "b", Some(4.5))]);
        let result = partition_with(
            &loc,
            Topic::Safety,
            Thresholds {
                positive_above: 5.0,
                negative_below: 5.0,
            },
        );
        assert_eq!(result.positive.len(), 1);
        assert_eq!(result.negative.len(), 1);
    }
}
