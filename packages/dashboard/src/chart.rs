//! Per-topic bar chart for the detail panel.

use sentiment_map_location_models::LocationRecord;
use sentiment_map_sentiment_models::{SCORE_MAX, SCORE_MIN, Topic, TopicScores};
use serde::{Deserialize, Serialize};

/// One bar of the topic chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    pub topic: Topic,
    pub label: String,
    pub value: f64,
}

/// A bar chart over the 0-10 score axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Chart heading, the location's name.
    pub title: String,
    /// One bar per topic, in [`Topic::all`] order.
    pub bars: Vec<ChartBar>,
    pub axis_min: f64,
    pub axis_max: f64,
}

impl ChartSeries {
    /// Bar for `topic`.
    #[must_use]
    pub fn bar(&self, topic: Topic) -> Option<&ChartBar> {
        self.bars.iter().find(|bar| bar.topic == topic)
    }
}

/// Builds the 11-bar chart from a set of topic scores. Missing topics are
/// drawn as 0.
#[must_use]
pub fn scores_chart(title: &str, scores: &TopicScores) -> ChartSeries {
    let bars = Topic::all()
        .iter()
        .map(|&topic| ChartBar {
            topic,
            label: topic.label().to_string(),
            value: scores.get(topic).unwrap_or(0.0),
        })
        .collect();

    ChartSeries {
        title: title.to_string(),
        bars,
        axis_min: SCORE_MIN,
        axis_max: SCORE_MAX,
    }
}

/// Topic chart for `location`, or `None` if it has no topic scores.
#[must_use]
pub fn topic_chart(location: &LocationRecord) -> Option<ChartSeries> {
    let scores = location.overall_topic_scores_0_10.as_ref()?;
    Some(scores_chart(&location.city, scores))
}
