//! Detail panel for the selected location.

use sentiment_map_analytics::{
    attention::{current_activity, recent_posts},
    posts::PostPartition,
};
use sentiment_map_location_models::PostRecord;
use sentiment_map_sentiment_models::Topic;
use serde::{Deserialize, Serialize};

use crate::{
    chart::{ChartSeries, topic_chart},
    selection::SelectionState,
    view::ViewMode,
};

/// Shown when there is nothing to detail.
pub const PLACEHOLDER_MESSAGE: &str = "Select a location to view details";

/// A topic button in the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicOption {
    pub topic: Topic,
    pub label: String,
    pub selected: bool,
}

/// Populated detail panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    pub city: String,
    pub overall_chs: f64,
    pub chart: ChartSeries,
    pub view: ViewMode,
    /// Topic buttons. Empty in views without topic drill-down.
    pub topics: Vec<TopicOption>,
    pub selected_topic: Option<Topic>,
    /// Contributing posts for `selected_topic`.
    pub partition: Option<PostPartition>,
    /// Newest posts first. Only filled in the attention view.
    pub recent_posts: Vec<PostRecord>,
    /// Recency-decayed post activity over the last hour. Attention view only.
    pub activity: Option<f64>,
}

/// What the detail panel shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DetailPanel {
    Placeholder { message: String },
    Location(Box<LocationDetail>),
}

impl DetailPanel {
    /// The empty panel.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::Placeholder {
            message: PLACEHOLDER_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    /// The populated detail, if any.
    #[must_use]
    pub fn location(&self) -> Option<&LocationDetail> {
        match self {
            Self::Placeholder { .. } => None,
            Self::Location(detail) => Some(detail),
        }
    }
}

/// Renders the detail panel for `selection`.
///
/// Falls back to the placeholder when nothing is selected or the selected
/// location has no topic scores.
#[must_use]
pub fn detail_panel(selection: &SelectionState, recent_posts_limit: usize) -> DetailPanel {
    let Some(location) = selection.location() else {
        return DetailPanel::placeholder();
    };
    let Some(chart) = topic_chart(location) else {
        log::debug!("{} has no topic scores, showing placeholder", location.city);
        return DetailPanel::placeholder();
    };

    let view = selection.view();
    let selected_topic = selection.topic();
    let topics = if view.supports_topics() {
        Topic::all()
            .iter()
            .map(|&topic| TopicOption {
                topic,
                label: topic.label().to_string(),
                selected: selected_topic == Some(topic),
            })
            .collect()
    } else {
        Vec::new()
    };
    let (recent, activity) = if view == ViewMode::Attention {
        (
            recent_posts(&location.posts, recent_posts_limit),
            Some(current_activity(&location.posts)),
        )
    } else {
        (Vec::new(), None)
    };

    DetailPanel::Location(Box::new(LocationDetail {
        city: location.city.clone(),
        overall_chs: location.overall_chs,
        chart,
        view,
        topics,
        selected_topic,
        partition: selection.partition().cloned(),
        recent_posts: recent,
        activity,
    }))
}

#[cfg(test)]
mod tests {
    use sentiment_map_location_models::{LocationRecord, TimeseriesEntry};
    use sentiment_map_sentiment_models::TopicScores;

    use super::*;

    fn post(ts: i64, text: &str) -> PostRecord {
        PostRecord {
            posted_at_timestamp: ts,
            text: text.to_string(),
        }
    }

    fn location(scores: Option<TopicScores>) -> LocationRecord {
        LocationRecord {
            city: "Norwich".to_string(),
            lat: 52.6309,
            lng: 1.2974,
            overall_chs: 6.2,
            overall_topic_scores_0_10: scores,
            n_posts: None,
            posts: vec![post(100, "old"), post(300, "newest"), post(200, "middle")],
            timeseries: vec![TimeseriesEntry {
                topic_scores_0_10: TopicScores {
                    jobs: Some(8.0),
                    ..TopicScores::default()
                },
                posted_at_timestamp: 300,
                text: "newest".to_string(),
            }],
        }
    }

    #[test]
    fn nothing_selected_shows_placeholder() {
        let panel = detail_panel(&SelectionState::default(), 10);
        assert_eq!(
            panel,
            DetailPanel::Placeholder {
                message: "Select a location to view details".to_string()
            }
        );
    }

    #[test]
    fn location_without_scores_shows_placeholder() {
        let mut selection = SelectionState::default();
        selection.choose_location(location(None));
        assert!(detail_panel(&selection, 10).is_placeholder());
    }

    #[test]
    fn sentiment_detail_lists_topics_and_partition() {
        let mut selection = SelectionState::default();
        selection.choose_view(ViewMode::Sentiment);
        selection.choose_location(location(Some(TopicScores::uniform(6.2))));
        selection.choose_topic(Topic::Jobs).unwrap();

        let panel = detail_panel(&selection, 10);
        let detail = panel.location().unwrap();
        assert_eq!(detail.city, "Norwich");
        assert_eq!(detail.topics.len(), 11);
        assert_eq!(
            detail.topics.iter().filter(|t| t.selected).count(),
            1,
            "exactly one topic is highlighted"
        );
        assert_eq!(detail.selected_topic, Some(Topic::Jobs));
        assert_eq!(detail.partition.as_ref().unwrap().positive.len(), 1);
        assert!(detail.recent_posts.is_empty());
        assert_eq!(detail.activity, None);
    }

    #[test]
    fn attention_detail_lists_recent_posts() {
        let mut selection = SelectionState::default();
        selection.choose_view(ViewMode::Attention);
        selection.choose_location(location(Some(TopicScores::uniform(6.2))));

        let panel = detail_panel(&selection, 2);
        let detail = panel.location().unwrap();
        assert!(detail.topics.is_empty());
        let texts: Vec<&str> = detail.recent_posts.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, ["newest", "middle"]);
        // Fixture posts are from 1970, far outside the activity window.
        assert_eq!(detail.activity, Some(0.0));
    }

    #[test]
    fn placeholder_wire_format() {
        let json = serde_json::to_value(DetailPanel::placeholder()).unwrap();
        assert_eq!(json["kind"], "placeholder");
        assert_eq!(json["message"], PLACEHOLDER_MESSAGE);
    }
}
