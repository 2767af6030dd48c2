//! Grouping of locations into the four UK regions.
//!
//! Region membership is decided by [`REGION_RULES`], an ordered list of
//! latitude/longitude predicates evaluated first-match-wins. The bounding
//! predicates overlap at the margins (points south of 53.31 and west of
//! -5.6 satisfy both the Northern Ireland and Wales rules), so the order is
//! significant.
//! Anything no rule claims falls through to [`FALLBACK_REGION`].

use std::sync::Arc;

use sentiment_map_location_models::{LocationRecord, Region, RegionRecord, RegionScores};
use sentiment_map_sentiment_models::{NEUTRAL_SCORE, Topic, TopicScores, or_default};
use serde::{Deserialize, Serialize};

/// A one-sided threshold on a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op", content = "value")]
pub enum Bound {
    /// Strictly greater than the value.
    Above(f64),
    /// Strictly less than the value.
    Below(f64),
}

impl Bound {
    /// Whether `value` satisfies this bound.
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        match self {
            Self::Above(threshold) => value > threshold,
            Self::Below(threshold) => value < threshold,
        }
    }
}

/// Assigns a location to `region` when both coordinate bounds hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionRule {
    /// Region claimed by this rule.
    pub region: Region,
    /// Latitude bound.
    pub lat: Bound,
    /// Longitude bound.
    pub lng: Bound,
}

impl RegionRule {
    /// Whether the point `(lat, lng)` satisfies this rule.
    #[must_use]
    pub fn matches(&self, lat: f64, lng: f64) -> bool {
        self.lat.contains(lat) && self.lng.contains(lng)
    }
}

/// Region assignment rules in priority order.
pub const REGION_RULES: &[RegionRule] = &[
    RegionRule {
        region: Region::Scotland,
        lat: Bound::Above(54.4),
        lng: Bound::Above(-4.67),
    },
    RegionRule {
        region: Region::NorthernIreland,
        lat: Bound::Below(54.95),
        lng: Bound::Below(-5.6),
    },
    RegionRule {
        region: Region::Wales,
        lat: Bound::Below(53.31),
        lng: Bound::Below(-3.087),
    },
];

/// Region for points no rule matches.
pub const FALLBACK_REGION: Region = Region::England;

/// Returns the region a point belongs to.
#[must_use]
pub fn assign_region(lat: f64, lng: f64) -> Region {
    REGION_RULES
        .iter()
        .find(|rule| rule.matches(lat, lng))
        .map_or(FALLBACK_REGION, |rule| rule.region)
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    posts: usize,
    chs: f64,
    topics: [f64; 11],
}

impl Accumulator {
    fn add(&mut self, location: &LocationRecord, default: f64) {
        self.count += 1;
        self.posts += location.post_count();
        self.chs += or_default(Some(location.overall_chs), default);

        let scores = location.overall_topic_scores_0_10.as_ref();
        for (slot, topic) in self.topics.iter_mut().zip(Topic::all()) {
            *slot += scores.map_or(default, |s| s.score_or(*topic, default));
        }
    }

    fn finish(self, region: Region) -> RegionRecord {
        let mut record = RegionRecord::empty(region);
        record.location_count = self.count;
        record.post_count = self.posts;

        if self.count == 0 {
            return record;
        }

        #[allow(clippy::cast_precision_loss)]
        let n = self.count as f64;
        let mut topics = TopicScores::default();
        for (sum, topic) in self.topics.iter().zip(Topic::all()) {
            topics.set(*topic, Some(sum / n));
        }

        record.scores = Some(RegionScores {
            overall_chs: self.chs / n,
            overall_topic_scores_0_10: topics,
        });
        record
    }
}

/// Aggregates `locations` into one record per [`Region`], in
/// [`Region::all`] order, substituting the neutral score for missing
/// values.
///
/// All four regions are always returned. A region with no assigned
/// locations has `scores == None`.
#[must_use]
pub fn aggregate(locations: &[LocationRecord]) -> Vec<RegionRecord> {
    aggregate_with_default(locations, NEUTRAL_SCORE)
}

/// Like [`aggregate`] with a custom substitute for missing values.
#[must_use]
pub fn aggregate_with_default(locations: &[LocationRecord], default: f64) -> Vec<RegionRecord> {
    let mut accumulators: [Accumulator; 4] = Default::default();

    for location in locations {
        let region = assign_region(location.lat, location.lng);
        accumulators[region_index(region)].add(location, default);
    }

    let records: Vec<RegionRecord> = Region::all()
        .iter()
        .zip(accumulators)
        .map(|(region, acc)| acc.finish(*region))
        .collect();

    log::debug!(
        "Aggregated {} locations into regions: {}",
        locations.len(),
        records
            .iter()
            .map(|r| format!("{}={}", r.region, r.location_count))
            .collect::<Vec<_>>()
            .join(", ")
    );

    records
}

const fn region_index(region: Region) -> usize {
    match region {
        Region::Scotland => 0,
        Region::NorthernIreland => 1,
        Region::Wales => 2,
        Region::England => 3,
    }
}

/// Memoizes [`aggregate_with_default`] on the identity of the input list.
///
/// The location set is immutable once loaded, so a pointer-equal `Arc`
/// always aggregates to the same result.
pub struct RegionCache {
    default: f64,
    input: Option<Arc<Vec<LocationRecord>>>,
    records: Vec<RegionRecord>,
    computations: usize,
}

impl RegionCache {
    /// Creates an empty cache substituting `default` for missing values.
    #[must_use]
    pub const fn new(default: f64) -> Self {
        Self {
            default,
            input: None,
            records: Vec::new(),
            computations: 0,
        }
    }

    /// Returns the regional aggregates for `locations`, recomputing only
    /// when a different list is passed.
    pub fn get(&mut self, locations: &Arc<Vec<LocationRecord>>) -> &[RegionRecord] {
        let fresh = self
            .input
            .as_ref()
            .is_some_and(|cached| Arc::ptr_eq(cached, locations));

        if !fresh {
            self.records = aggregate_with_default(locations, self.default);
            self.input = Some(Arc::clone(locations));
            self.computations += 1;
        }

        &self.records
    }

    /// How many times the aggregation actually ran.
    #[must_use]
    pub const fn computations(&self) -> usize {
        self.computations
    }
}

impl Default for RegionCache {
    fn default() -> Self {
        Self::new(NEUTRAL_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(city: &str, lat: f64, lng: f64, scores: Option<TopicScores>) -> LocationRecord {
        LocationRecord {
            city: city.to_string(),
            lat,
            lng,
            overall_chs: 5.0,
            overall_topic_scores_0_10: scores,
            n_posts: None,
            posts: Vec::new(),
            timeseries: Vec::new(),
        }
    }

    fn region(records: &[RegionRecord], region: Region) -> &RegionRecord {
        records.iter().find(|r| r.region == region).unwrap()
    }

    #[test]
    fn assigns_major_cities() {
        assert_eq!(assign_region(55.9533, -3.1883), Region::Scotland); // Edinburgh
        assert_eq!(assign_region(54.5973, -5.9301), Region::NorthernIreland); // Belfast
        assert_eq!(assign_region(51.4816, -3.1791), Region::Wales); // Cardiff
        assert_eq!(assign_region(51.5072, -0.1276), Region::England); // London
        assert_eq!(assign_region(53.4808, -2.2426), Region::England); // Manchester
    }

    #[test]
    fn first_matching_rule_wins() {
        // Satisfies both the Northern Ireland and Wales rules.
        assert!(REGION_RULES[1].matches(53.0, -6.0));
        assert!(REGION_RULES[2].matches(53.0, -6.0));
        assert_eq!(assign_region(53.0, -6.0), Region::NorthernIreland);
    }

    #[test]
    fn point_outside_both_scotland_and_northern_ireland_rules_falls_back_to_england() {
        // (55, -5) is often quoted as a Scotland/Northern Ireland overlap,
        // but it is west of the Scotland longitude bound and north of the
        // Northern Ireland latitude bound, so neither rule claims it.
        assert!(REGION_RULES.iter().all(|rule| !rule.matches(55.0, -5.0)));
        assert_eq!(assign_region(55.0, -5.0), Region::England);
    }

    #[test]
    fn bounds_are_strict() {
        assert_eq!(assign_region(54.4, -3.0), Region::England);
        assert_eq!(assign_region(53.31, -4.0), Region::England);
    }

    #[test]
    fn computes_exact_means() {
        let mut a = TopicScores::uniform(5.0);
        a.safety = Some(4.0);
        let mut b = TopicScores::uniform(5.0);
        b.safety = Some(8.0);

        let mut glasgow = location("Glasgow", 55.8642, -4.2518, Some(a));
        glasgow.overall_chs = 4.5;
        let mut aberdeen = location("Aberdeen", 57.1497, -2.0943, Some(b));
        aberdeen.overall_chs = 6.5;

        let records = aggregate(&[glasgow, aberdeen]);
        let scotland = region(&records, Region::Scotland);
        assert_eq!(scotland.location_count, 2);

        let scores = scotland.scores.as_ref().unwrap();
        assert!((scores.overall_topic_scores_0_10.safety.unwrap() - 6.0).abs() < 1e-9);
        assert!((scores.overall_topic_scores_0_10.jobs.unwrap() - 5.0).abs() < 1e-9);
        assert!((scores.overall_chs - 5.5).abs() < 1e-9);
    }

    #[test]
    fn substitutes_neutral_score_for_missing_values() {
        let partial = TopicScores {
            housing: Some(9.0),
            jobs: Some(0.0),
            ..TopicScores::default()
        };
        let records = aggregate(&[
            location("Leeds", 53.8008, -1.5491, Some(partial)),
            location("York", 53.9600, -1.0873, None),
        ]);
        let england = region(&records, Region::England);
        let scores = &england.scores.as_ref().unwrap().overall_topic_scores_0_10;
        assert!((scores.housing.unwrap() - 7.0).abs() < 1e-9);
        assert!((scores.jobs.unwrap() - 5.0).abs() < 1e-9);
        assert!((scores.health.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_yields_no_data_everywhere() {
        let records = aggregate(&[]);
        assert_eq!(records.len(), 4);
        for record in &records {
            assert_eq!(record.location_count, 0);
            assert!(record.scores.is_none(), "{} has data", record.region);
        }
    }

    #[test]
    fn always_returns_all_regions_in_order() {
        let records = aggregate(&[location("Bristol", 51.4545, -2.5879, None)]);
        let order: Vec<Region> = records.iter().map(|r| r.region).collect();
        assert_eq!(order, Region::all());
        assert!(region(&records, Region::England).has_data());
        assert!(!region(&records, Region::Wales).has_data());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let locations = vec![
            location("Swansea", 51.6214, -3.9436, Some(TopicScores::uniform(3.0))),
            location("Derry", 54.9966, -7.3086, Some(TopicScores::uniform(7.0))),
            location("Inverness", 57.4778, -4.2247, None),
        ];
        assert_eq!(aggregate(&locations), aggregate(&locations));
    }

    #[test]
    fn cache_recomputes_only_for_new_input() {
        let first = Arc::new(vec![location("Dundee", 56.4620, -2.9707, None)]);
        let second = Arc::new(vec![location("Dundee", 56.4620, -2.9707, None)]);
        let mut cache = RegionCache::default();

        let from_first = cache.get(&first).to_vec();
        assert_eq!(cache.get(&first), from_first.as_slice());
        assert_eq!(cache.computations(), 1);

        cache.get(&second);
        assert_eq!(cache.computations(), 2);
        cache.get(&Arc::clone(&second));
        assert_eq!(cache.computations(), 2);
    }
}
