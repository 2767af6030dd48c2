//! Session selection state.
//!
//! [`SelectionState`] holds what the user is looking at: the active view,
//! the chosen location (a city or a region rendered as one), and the topic
//! being drilled into. It changes only through the `choose_*` transitions
//! below, each of which keeps the three pieces consistent with one another.

use sentiment_map_analytics::posts::{PostPartition, Thresholds, partition_with};
use sentiment_map_location_models::LocationRecord;
use sentiment_map_sentiment_models::Topic;

use crate::view::ViewMode;

/// A transition that is not valid in the current state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// A topic was chosen before any location.
    #[error("Select a location before choosing a topic")]
    NoLocationSelected,

    /// The active view has no topic drill-down.
    #[error("Topics are not available in the {view} view")]
    TopicNotApplicable {
        /// The active view.
        view: ViewMode,
    },
}

/// What the user currently has selected.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    view: ViewMode,
    location: Option<LocationRecord>,
    topic: Option<Topic>,
    partition: Option<PostPartition>,
    thresholds: Thresholds,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl SelectionState {
    /// Starts in [`ViewMode::SentimentClean`] with nothing selected.
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            view: ViewMode::default(),
            location: None,
            topic: None,
            partition: None,
            thresholds,
        }
    }

    /// Active view.
    #[must_use]
    pub const fn view(&self) -> ViewMode {
        self.view
    }

    /// Selected location, if any.
    #[must_use]
    pub const fn location(&self) -> Option<&LocationRecord> {
        self.location.as_ref()
    }

    /// Selected topic, if any.
    #[must_use]
    pub const fn topic(&self) -> Option<Topic> {
        self.topic
    }

    /// Contributing posts for the selected location and topic.
    #[must_use]
    pub const fn partition(&self) -> Option<&PostPartition> {
        self.partition.as_ref()
    }

    /// Switches view. Clears the topic and the location, since the new
    /// view's markers may not include the old selection.
    pub fn choose_view(&mut self, view: ViewMode) {
        log::debug!("View {} -> {view}", self.view);
        self.view = view;
        self.location = None;
        self.clear_topic();
    }

    /// Selects a location and returns to its topic overview.
    pub fn choose_location(&mut self, location: LocationRecord) {
        log::debug!("Selected location {} in {} view", location.city, self.view);
        self.location = Some(location);
        self.clear_topic();
    }

    /// Drills into `topic` for the selected location, recomputing the
    /// contributing posts.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::TopicNotApplicable`] in views without
    /// topics, or [`SelectionError::NoLocationSelected`] if no location is
    /// selected. The state is unchanged on error.
    pub fn choose_topic(&mut self, topic: Topic) -> Result<&PostPartition, SelectionError> {
        if !self.view.supports_topics() {
            return Err(SelectionError::TopicNotApplicable { view: self.view });
        }
        let location = self
            .location
            .as_ref()
            .ok_or(SelectionError::NoLocationSelected)?;

        let partition = partition_with(location, topic, self.thresholds);
        self.topic = Some(topic);
        Ok(self.partition.insert(partition))
    }

    /// Returns to the topic overview for the selected location.
    pub fn clear_topic(&mut self) {
        self.topic = None;
        self.partition = None;
    }
}
