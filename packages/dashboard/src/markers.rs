//! Map marker layers.
//!
//! Each view renders as a flat list of colored circle markers. The map
//! collaborator draws them as-is and reports clicks back using the
//! marker's [`MarkerKey`].

use sentiment_map_analytics::attention::{location_attention, max_attention};
use sentiment_map_color::{ColorScale, Rgb};
use sentiment_map_location_models::{LocationRecord, Region, RegionRecord};
use serde::{Deserialize, Serialize};

use crate::view::ViewMode;

/// What a marker click selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum MarkerKey {
    /// A city from the dataset.
    City(String),
    /// An aggregated region.
    Region(Region),
}

/// One circle marker on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Click target.
    pub key: MarkerKey,
    /// `[lat, lng]`.
    pub position: [f64; 2],
    /// Fill color.
    pub color: Rgb,
    /// Diameter in pixels.
    pub size: u32,
    /// Popup label.
    pub popup_text: String,
    /// The number the color was derived from.
    pub value: f64,
}

/// Range and stops of the scale a layer was colored with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleLegend {
    /// Value mapped to the first stop.
    pub low: f64,
    /// Value mapped to the last stop.
    pub high: f64,
    /// Gradient stops, low to high.
    pub stops: Vec<Rgb>,
    /// Evenly spaced `(value, color)` samples for drawing the key.
    pub ticks: Vec<(f64, Rgb)>,
}

/// Number of samples in a layer's legend key.
pub const LEGEND_TICKS: usize = 5;

impl From<&ColorScale> for ScaleLegend {
    fn from(scale: &ColorScale) -> Self {
        Self {
            low: scale.low(),
            high: scale.high(),
            stops: scale.stops().to_vec(),
            ticks: scale.legend(LEGEND_TICKS),
        }
    }
}

/// All markers for one view plus the scale used to color them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerLayer {
    /// View the layer belongs to. `None` for the legacy layer.
    pub view: Option<ViewMode>,
    /// Markers in dataset order.
    pub markers: Vec<Marker>,
    /// Coloring scale.
    pub legend: ScaleLegend,
}

/// Marker sizing and sentiment range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// City marker diameter.
    pub city_size: u32,
    /// Region marker diameter.
    pub region_size: u32,
    /// `[low, high]` of the sentiment scale.
    pub sentiment_range: [f64; 2],
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            city_size: 12,
            region_size: 24,
            sentiment_range: [ColorScale::SENTIMENT_RANGE.0, ColorScale::SENTIMENT_RANGE.1],
        }
    }
}

impl MarkerStyle {
    fn sentiment_scale(&self) -> ColorScale {
        ColorScale::sentiment_over(self.sentiment_range[0], self.sentiment_range[1])
    }
}

fn city_marker(
    location: &LocationRecord,
    scale: &ColorScale,
    value: f64,
    size: u32,
    popup_text: String,
) -> Marker {
    Marker {
        key: MarkerKey::City(location.city.clone()),
        position: location.position(),
        color: scale.color_at(value),
        size,
        popup_text,
        value,
    }
}

/// One marker per city, colored by composite score on the sentiment scale.
#[must_use]
pub fn sentiment_markers(
    locations: &[LocationRecord],
    style: &MarkerStyle,
) -> (Vec<Marker>, ColorScale) {
    let scale = style.sentiment_scale();
    let markers = locations
        .iter()
        .map(|loc| {
            city_marker(
                loc,
                &scale,
                loc.overall_chs,
                style.city_size,
                format!("{} ({:.1})", loc.city, loc.overall_chs),
            )
        })
        .collect();
    (markers, scale)
}

/// One marker per city, colored by `ln(post count)` from white to blue.
#[must_use]
pub fn attention_markers(
    locations: &[LocationRecord],
    style: &MarkerStyle,
) -> (Vec<Marker>, ColorScale) {
    let scale = ColorScale::attention(max_attention(locations));
    let markers = locations
        .iter()
        .map(|loc| {
            let posts = loc.post_count();
            let noun = if posts == 1 { "post" } else { "posts" };
            city_marker(
                loc,
                &scale,
                location_attention(loc),
                style.city_size,
                format!("{}: {posts} {noun}", loc.city),
            )
        })
        .collect();
    (markers, scale)
}

/// One marker per region with data, colored by mean composite score.
/// Regions without data are left off the map.
#[must_use]
pub fn region_markers(
    regions: &[RegionRecord],
    style: &MarkerStyle,
) -> (Vec<Marker>, ColorScale) {
    let scale = style.sentiment_scale();
    let markers = regions
        .iter()
        .filter_map(|record| {
            let chs = record.overall_chs()?;
            let noun = if record.location_count == 1 {
                "location"
            } else {
                "locations"
            };
            Some(Marker {
                key: MarkerKey::Region(record.region),
                position: [record.lat, record.lng],
                color: scale.color_at(chs),
                size: style.region_size,
                popup_text: format!(
                    "{} ({chs:.1}, {} {noun})",
                    record.region.name(),
                    record.location_count
                ),
                value: chs,
            })
        })
        .collect();
    (markers, scale)
}

/// One marker per city on the full `[0, 10]` red-to-green scale.
#[must_use]
pub fn legacy_markers(locations: &[LocationRecord], style: &MarkerStyle) -> MarkerLayer {
    let scale = ColorScale::legacy_city();
    let markers = locations
        .iter()
        .map(|loc| {
            city_marker(
                loc,
                &scale,
                loc.overall_chs,
                style.city_size,
                loc.city.clone(),
            )
        })
        .collect();
    MarkerLayer {
        view: None,
        markers,
        legend: ScaleLegend::from(&scale),
    }
}

/// Builds the marker layer for `view`.
#[must_use]
pub fn markers_for_view(
    view: ViewMode,
    locations: &[LocationRecord],
    regions: &[RegionRecord],
    style: &MarkerStyle,
) -> MarkerLayer {
    let (markers, scale) = match view {
        ViewMode::SentimentClean | ViewMode::Sentiment => sentiment_markers(locations, style),
        ViewMode::Attention => attention_markers(locations, style),
        ViewMode::Grouped => region_markers(regions, style),
    };
    MarkerLayer {
        view: Some(view),
        markers,
        legend: ScaleLegend::from(&scale),
    }
}

#[cfg(test)]
mod tests {
    use sentiment_map_analytics::regions::aggregate;
    use sentiment_map_color::NamedColor;
    use sentiment_map_location_models::PostRecord;

    use super::*;

    fn location(city: &str, lat: f64, lng: f64, chs: f64, posts: usize) -> LocationRecord {
        LocationRecord {
            city: city.to_string(),
            lat,
            lng,
            overall_chs: chs,
            overall_topic_scores_0_10: None,
            n_posts: None,
            posts: (0..posts)
                .map(|i| PostRecord {
                    posted_at_timestamp: i64::try_from(i).unwrap(),
                    text: format!("post {i}"),
                })
                .collect(),
            timeseries: Vec::new(),
        }
    }

    fn sample() -> Vec<LocationRecord> {
        vec![
            location("Edinburgh", 55.9533, -3.1883, 6.5, 1),
            location("London", 51.5072, -0.1276, 3.0, 50),
            location("Leicester", 52.6369, -1.1398, 5.0, 0),
        ]
    }

    #[test]
    fn sentiment_markers_use_clamped_scale() {
        let layer =
            markers_for_view(ViewMode::Sentiment, &sample(), &[], &MarkerStyle::default());
        assert_eq!(layer.markers.len(), 3);
        assert_eq!(layer.markers[0].color, NamedColor::Green.rgb());
        assert_eq!(layer.markers[1].color, NamedColor::Red.rgb());
        assert_eq!(layer.markers[2].color, Rgb::new(0x80, 0x40, 0x00));
        assert_eq!(layer.markers[0].popup_text, "Edinburgh (6.5)");
        assert_eq!(layer.markers[0].key, MarkerKey::City("Edinburgh".to_string()));
        assert_eq!(layer.markers[0].position, [55.9533, -3.1883]);
        assert!((layer.legend.low - 4.0).abs() < f64::EPSILON);

        let ticks = &layer.legend.ticks;
        assert_eq!(ticks.len(), LEGEND_TICKS);
        assert_eq!(ticks[0], (4.0, NamedColor::Red.rgb()));
        assert_eq!(ticks[2], (5.0, Rgb::new(0x80, 0x40, 0x00)));
        assert_eq!(ticks[4], (6.0, NamedColor::Green.rgb()));
    }

    #[test]
    fn attention_markers_scale_to_busiest_city() {
        let layer =
            markers_for_view(ViewMode::Attention, &sample(), &[], &MarkerStyle::default());
        assert!((layer.legend.high - 50f64.ln()).abs() < 1e-12);
        assert_eq!(layer.markers[1].color, NamedColor::Blue.rgb());
        assert_eq!(layer.markers[0].color, NamedColor::White.rgb());
        assert_eq!(layer.markers[2].color, NamedColor::White.rgb());
        assert_eq!(layer.markers[0].popup_text, "Edinburgh: 1 post");
        assert_eq!(layer.markers[1].popup_text, "London: 50 posts");
    }

    #[test]
    fn attention_with_no_posts_is_all_white() {
        let locations = vec![location("Ely", 52.3990, 0.2624, 5.0, 0)];
        let layer =
            markers_for_view(ViewMode::Attention, &locations, &[], &MarkerStyle::default());
        assert_eq!(layer.markers[0].color, NamedColor::White.rgb());
    }

    #[test]
    fn grouped_view_skips_regions_without_data() {
        let locations = sample();
        let regions = aggregate(&locations);
        let layer = markers_for_view(
            ViewMode::Grouped,
            &locations,
            &regions,
            &MarkerStyle::default(),
        );

        let keys: Vec<&MarkerKey> = layer.markers.iter().map(|m| &m.key).collect();
        assert_eq!(
            keys,
            [
                &MarkerKey::Region(Region::Scotland),
                &MarkerKey::Region(Region::England)
            ]
        );
        assert_eq!(layer.markers[0].size, 24);
        assert!((layer.markers[1].value - 4.0).abs() < 1e-9);
        assert_eq!(layer.markers[1].popup_text, "England (4.0, 2 locations)");
    }

    #[test]
    fn grouped_view_of_empty_dataset_has_no_markers() {
        let layer = markers_for_view(
            ViewMode::Grouped,
            &[],
            &aggregate(&[]),
            &MarkerStyle::default(),
        );
        assert!(layer.markers.is_empty());
    }

    #[test]
    fn legacy_layer_spans_zero_to_ten() {
        let layer = legacy_markers(&sample(), &MarkerStyle::default());
        assert!(layer.view.is_none());
        assert_eq!(layer.markers[2].color, Rgb::new(0x80, 0x40, 0x00));
        assert_eq!(layer.markers[0].popup_text, "Edinburgh");
    }

    #[test]
    fn marker_key_wire_format() {
        let json = serde_json::to_string(&MarkerKey::Region(Region::NorthernIreland)).unwrap();
        assert_eq!(json, r#"{"kind":"region","id":"northern_ireland"}"#);
    }
}
