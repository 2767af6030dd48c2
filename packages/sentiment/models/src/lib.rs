#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Topic taxonomy and composite sentiment score definitions.
//!
//! This crate defines the eleven fixed wellbeing topics every location is
//! scored on, the [`TopicScores`] map that carries a 0-10 score per topic,
//! and the weighted composite happiness/sentiment score (CHS) derived from
//! those topic scores.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Neutral score substituted for a missing topic score.
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Lower bound of the topic score scale.
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of the topic score scale.
pub const SCORE_MAX: f64 = 10.0;

/// One of the eleven wellbeing topics a post can be attributed to.
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
pub enum Topic {
    /// Personal safety and crime
    Safety,
    /// Housing cost and quality
    Housing,
    /// General life satisfaction
    LifeSatisfaction,
    /// Access to public and private services
    AccessToServices,
    /// Civic engagement and governance
    CivicEngagement,
    /// Schools and education
    Education,
    /// Employment
    Jobs,
    /// Community and social connections
    Community,
    /// Environment and pollution
    Environment,
    /// Income and wealth
    Income,
    /// Health
    Health,
}

impl Topic {
    /// Returns all variants of this enum, in chart order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Safety,
            Self::Housing,
            Self::LifeSatisfaction,
            Self::AccessToServices,
            Self::CivicEngagement,
            Self::Education,
            Self::Jobs,
            Self::Community,
            Self::Environment,
            Self::Income,
            Self::Health,
        ]
    }

    /// Returns the human-readable label shown on chart axes and buttons.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Safety => "Safety",
            Self::Housing => "Housing",
            Self::LifeSatisfaction => "Life satisfaction",
            Self::AccessToServices => "Access to services",
            Self::CivicEngagement => "Civic Engagement",
            Self::Education => "Education",
            Self::Jobs => "Jobs",
            Self::Community => "Community",
            Self::Environment => "Environment",
            Self::Income => "Income",
            Self::Health => "Health",
        }
    }

    /// Returns this topic's weight in the composite sentiment score.
    ///
    /// Weights across all topics sum to 1.
    #[must_use]
    pub const fn chs_weight(self) -> f64 {
        match self {
            Self::AccessToServices | Self::Education | Self::Community | Self::Environment => 0.09,
            Self::CivicEngagement | Self::Housing => 0.08,
            Self::Jobs | Self::Income | Self::Safety => 0.10,
            Self::Health => 0.12,
            Self::LifeSatisfaction => 0.06,
        }
    }
}

/// A 0-10 score per topic.
///
/// Every key is optional: source data frequently carries only a subset of
/// topics (e.g. a single post attributed to one topic). Unknown keys are
/// ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicScores {
    /// Safety score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety: Option<f64>,
    /// Housing score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub housing: Option<f64>,
    /// Life satisfaction score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life_satisfaction: Option<f64>,
    /// Access to services score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_to_services: Option<f64>,
    /// Civic engagement score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub civic_engagement: Option<f64>,
    /// Education score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<f64>,
    /// Jobs score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<f64>,
    /// Community score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community: Option<f64>,
    /// Environment score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<f64>,
    /// Income score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<f64>,
    /// Health score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<f64>,
}

impl TopicScores {
    /// Builds a score map with every topic set to `value`.
    #[must_use]
    pub fn uniform(value: f64) -> Self {
        let mut scores = Self::default();
        for topic in Topic::all() {
            scores.set(*topic, Some(value));
        }
        scores
    }

    /// Returns the raw score for `topic`, if present.
    #[must_use]
    pub const fn get(&self, topic: Topic) -> Option<f64> {
        match topic {
            Topic::Safety => self.safety,
            Topic::Housing => self.housing,
            Topic::LifeSatisfaction => self.life_satisfaction,
            Topic::AccessToServices => self.access_to_services,
            Topic::CivicEngagement => self.civic_engagement,
            Topic::Education => self.education,
            Topic::Jobs => self.jobs,
            Topic::Community => self.community,
            Topic::Environment => self.environment,
            Topic::Income => self.income,
            Topic::Health => self.health,
        }
    }

    /// Sets (or clears) the score for `topic`.
    pub fn set(&mut self, topic: Topic, value: Option<f64>) {
        let slot = match topic {
            Topic::Safety => &mut self.safety,
            Topic::Housing => &mut self.housing,
            Topic::LifeSatisfaction => &mut self.life_satisfaction,
            Topic::AccessToServices => &mut self.access_to_services,
            Topic::CivicEngagement => &mut self.civic_engagement,
            Topic::Education => &mut self.education,
            Topic::Jobs => &mut self.jobs,
            Topic::Community => &mut self.community,
            Topic::Environment => &mut self.environment,
            Topic::Income => &mut self.income,
            Topic::Health => &mut self.health,
        };
        *slot = value;
    }

    /// Returns the score for `topic`, or `default` when the score is
    /// missing, zero, or NaN.
    ///
    /// Zero counts as missing.
    #[must_use]
    pub fn score_or(&self, topic: Topic, default: f64) -> f64 {
        or_default(self.get(topic), default)
    }

    /// Iterates `(topic, score)` pairs in chart order, including missing
    /// scores as `None`.
    pub fn iter(&self) -> impl Iterator<Item = (Topic, Option<f64>)> + '_ {
        Topic::all().iter().map(|topic| (*topic, self.get(*topic)))
    }

    /// Number of topics with a score present.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.iter().filter(|(_, score)| score.is_some()).count()
    }
}

/// Substitutes `default` for a missing, zero, or NaN value.
#[must_use]
pub fn or_default(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => v,
        _ => default,
    }
}

/// Computes the composite happiness/sentiment score from 0-10 topic scores.
///
/// Weighted sum using [`Topic::chs_weight`]. Missing topics contribute 0.
#[must_use]
pub fn compute_chs(scores: &TopicScores) -> f64 {
    Topic::all()
        .iter()
        .map(|topic| topic.chs_weight() * scores.get(*topic).unwrap_or(0.0))
        .sum()
}
