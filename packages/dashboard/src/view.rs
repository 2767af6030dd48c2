//! Dashboard view modes.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which marker layer and detail panel the dashboard shows.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ViewMode {
    /// City markers colored by sentiment. Shown on startup.
    #[default]
    SentimentClean,
    /// City markers colored by sentiment.
    Sentiment,
    /// City markers colored by post volume.
    Attention,
    /// One marker per region, colored by mean sentiment.
    Grouped,
}

impl ViewMode {
    /// Returns all variants of this enum, in dropdown order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::SentimentClean,
            Self::Sentiment,
            Self::Attention,
            Self::Grouped,
        ]
    }

    /// Dropdown label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SentimentClean => "Sentiment (clean)",
            Self::Sentiment => "Sentiment",
            Self::Attention => "Attention",
            Self::Grouped => "Grouped by country",
        }
    }

    /// Whether per-topic drill-down is available in this view.
    #[must_use]
    pub const fn supports_topics(self) -> bool {
        matches!(self, Self::SentimentClean | Self::Sentiment | Self::Grouped)
    }
}
