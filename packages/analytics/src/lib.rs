#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory analytics over the loaded location set.
//!
//! Every function here is a pure function of its inputs: regional
//! aggregation ([`regions`]), positive/negative post attribution for a topic
//! ([`posts`]), attention and recency scores ([`attention`]), and location
//! lookup and ranking ([`ranking`]).

pub mod attention;
pub mod posts;
pub mod ranking;
pub mod regions;

use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// No location with the given name exists in the dataset.
    #[error("Unknown location: {city}")]
    UnknownLocation {
        /// The name that was looked up.
        city: String,
    },
}
