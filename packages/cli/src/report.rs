//! Plain-text rendering of dashboard models for the terminal.

use std::fmt::Write as _;

use sentiment_map_analytics::{posts::PostPartition, regions::assign_region};
use sentiment_map_dashboard::{chart::ChartSeries, detail::DetailPanel, markers::MarkerLayer};
use sentiment_map_location_models::{LocationRecord, PostRecord, RegionRecord};

const BAR_WIDTH: f64 = 30.0;
const EXCERPT_CHARS: usize = 100;

/// `  1. City             6.3  England, 12 posts`
#[must_use]
pub fn ranking(locations: &[&LocationRecord]) -> String {
    let mut out = String::new();
    for (i, loc) in locations.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<24} {:>4.1}  {}, {} posts",
            i + 1,
            loc.city,
            loc.overall_chs,
            assign_region(loc.lat, loc.lng).name(),
            loc.post_count()
        );
    }
    out
}

#[must_use]
pub fn regions(records: &[RegionRecord]) -> String {
    let mut out = String::new();
    for record in records {
        match record.overall_chs() {
            Some(chs) => {
                let _ = writeln!(
                    out,
                    "{:<18} {chs:>4.1}  {} locations, {} posts",
                    record.region.name(),
                    record.location_count,
                    record.post_count
                );
            }
            None => {
                let _ = writeln!(out, "{:<18}  n/a  no data", record.region.name());
            }
        }
    }
    out
}

/// Horizontal bar chart, one line per topic.
#[must_use]
pub fn chart(series: &ChartSeries) -> String {
    let span = series.axis_max - series.axis_min;
    let mut out = format!("{}\n", series.title);
    for bar in &series.bars {
        let fraction = if span > 0.0 {
            ((bar.value - series.axis_min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let filled = (fraction * BAR_WIDTH).round() as usize;
        let _ = writeln!(
            out,
            "  {:<20} {:<30} {:.1}",
            bar.label,
            "#".repeat(filled),
            bar.value
        );
    }
    out
}

fn excerpt(post: &PostRecord) -> String {
    let text = post.text.trim().replace('\n', " ");
    if text.chars().count() <= EXCERPT_CHARS {
        return text;
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{cut}...")
}

fn post_list(out: &mut String, heading: &str, posts: &[PostRecord]) {
    let _ = writeln!(out, "{heading} ({})", posts.len());
    if posts.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for post in posts {
        let when = post
            .posted_at()
            .map_or_else(String::new, |t| t.format("%Y-%m-%d %H:%M").to_string());
        let _ = writeln!(out, "  [{when}] {}", excerpt(post));
    }
}

#[must_use]
pub fn partition(partition: &PostPartition) -> String {
    let mut out = format!("{} / {}\n", partition.city, partition.topic.label());
    post_list(&mut out, "Positive", &partition.positive);
    post_list(&mut out, "Negative", &partition.negative);
    out
}

#[must_use]
pub fn detail(panel: &DetailPanel) -> String {
    let detail = match panel {
        DetailPanel::Placeholder { message } => return format!("{message}\n"),
        DetailPanel::Location(detail) => detail,
    };

    let mut out = format!(
        "{} ({} view)\nComposite score: {:.1}\n\n",
        detail.city,
        detail.view.label(),
        detail.overall_chs
    );
    out.push_str(&chart(&detail.chart));

    if let Some(posts) = &detail.partition {
        out.push('\n');
        out.push_str(&partition(posts));
    }
    if let Some(activity) = detail.activity {
        let _ = writeln!(out, "\nActivity (last hour): {activity:.2}");
    }
    if !detail.recent_posts.is_empty() {
        out.push('\n');
        post_list(&mut out, "Recent posts", &detail.recent_posts);
    }
    out
}

/// One line per marker: popup text and color.
#[must_use]
pub fn markers(layer: &MarkerLayer) -> String {
    let mut out = String::new();
    for marker in &layer.markers {
        let _ = writeln!(out, "{:<40} {}", marker.popup_text, marker.color);
    }
    out
}
