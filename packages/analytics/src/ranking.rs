//! Location lookup and ordering.

use sentiment_map_location_models::LocationRecord;

use crate::AnalyticsError;

/// Finds a location by city name (case-insensitive, surrounding whitespace
/// ignored).
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownLocation`] if no location matches.
pub fn find_location<'a>(
    locations: &'a [LocationRecord],
    city: &str,
) -> Result<&'a LocationRecord, AnalyticsError> {
    let needle = city.trim();
    locations
        .iter()
        .find(|loc| loc.city.eq_ignore_ascii_case(needle))
        .ok_or_else(|| AnalyticsError::UnknownLocation {
            city: needle.to_string(),
        })
}

/// Locations ordered by composite score, happiest first. Ties are broken
/// by city name.
#[must_use]
pub fn rank_by_chs(locations: &[LocationRecord]) -> Vec<&LocationRecord> {
    let mut ranked: Vec<&LocationRecord> = locations.iter().collect();
    ranked.sort_by(|a, b| {
        b.overall_chs
            .total_cmp(&a.overall_chs)
            .then_with(|| a.city.cmp(&b.city))
    });
    ranked
}
