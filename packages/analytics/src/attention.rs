//! How much a location is being talked about.
//!
//! Two measures: the log of the total post count, which drives the
//! attention map layer, and a recency-decayed activity score over the last
//! hour of posts.

use chrono::{DateTime, Utc};
use sentiment_map_location_models::{LocationRecord, PostRecord};

/// Per-second exponential decay rate for activity scoring.
pub const ACTIVITY_DECAY_PER_SECOND: f64 = 0.001_919;

/// Posts older than this many seconds do not count towards activity.
pub const ACTIVITY_WINDOW_SECS: i64 = 3600;

/// Attention value for a post count: `ln(count)`, with zero posts mapped to
/// zero.
#[must_use]
pub fn attention_value(post_count: usize) -> f64 {
    if post_count == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = post_count as f64;
    count.ln()
}

/// Attention value of a single location.
#[must_use]
pub fn location_attention(location: &LocationRecord) -> f64 {
    attention_value(location.post_count())
}

/// Largest attention value across `locations`, or zero when empty.
#[must_use]
pub fn max_attention(locations: &[LocationRecord]) -> f64 {
    locations
        .iter()
        .map(location_attention)
        .fold(0.0, f64::max)
}

/// Sum of `exp(-rate * age)` over posts younger than
/// [`ACTIVITY_WINDOW_SECS`] relative to `now`.
///
/// Posts timestamped in the future count with age zero.
#[must_use]
pub fn decayed_activity(posts: &[PostRecord], now: DateTime<Utc>) -> f64 {
    let now = now.timestamp();
    posts
        .iter()
        .map(|post| now.saturating_sub(post.posted_at_timestamp).max(0))
        .filter(|age| *age < ACTIVITY_WINDOW_SECS)
        .map(|age| {
            #[allow(clippy::cast_precision_loss)]
            let age = age as f64;
            (-ACTIVITY_DECAY_PER_SECOND * age).exp()
        })
        .sum()
}

/// [`decayed_activity`] as of the current time.
#[must_use]
pub fn current_activity(posts: &[PostRecord]) -> f64 {
    decayed_activity(posts, Utc::now())
}

/// Up to `limit` posts, newest first. Posts sharing a timestamp keep their
/// source order.
#[must_use]
pub fn recent_posts(posts: &[PostRecord], limit: usize) -> Vec<PostRecord> {
    let mut sorted: Vec<&PostRecord> = posts.iter().collect();
    sorted.sort_by(|a, b| b.posted_at_timestamp.cmp(&a.posted_at_timestamp));
    sorted.into_iter().take(limit).cloned().collect()
}
