//! Interactive dashboard browser.
//!
//! Drives one [`Dashboard`] session from the terminal: pick a view, pick a
//! city or region, drill into a topic, and print the detail panel after
//! every step.

use dialoguer::Select;
use sentiment_map_dashboard::{Dashboard, view::ViewMode};
use sentiment_map_location_models::RegionRecord;
use sentiment_map_sentiment_models::Topic;

use crate::report;

enum Action {
    ChangeView,
    ChooseCity,
    ChooseRegion,
    ChooseTopic,
    ClearTopic,
    ShowMarkers,
    Quit,
}

impl Action {
    const fn label(&self) -> &'static str {
        match self {
            Self::ChangeView => "Change view",
            Self::ChooseCity => "Select a city",
            Self::ChooseRegion => "Select a region",
            Self::ChooseTopic => "Select a topic",
            Self::ClearTopic => "Back to topic overview",
            Self::ShowMarkers => "List map markers",
            Self::Quit => "Quit",
        }
    }
}

/// Actions that make sense in the dashboard's current state.
fn available_actions(dashboard: &Dashboard) -> Vec<Action> {
    let selection = dashboard.selection();
    let view = selection.view();

    let mut actions = vec![Action::ChangeView];
    if view == ViewMode::Grouped {
        actions.push(Action::ChooseRegion);
    } else {
        actions.push(Action::ChooseCity);
    }
    if selection.location().is_some() && view.supports_topics() {
        actions.push(Action::ChooseTopic);
    }
    if selection.topic().is_some() {
        actions.push(Action::ClearTopic);
    }
    actions.push(Action::ShowMarkers);
    actions.push(Action::Quit);
    actions
}

/// Runs the browser until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails (e.g. the terminal is not
/// interactive).
pub fn run(dashboard: &mut Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    println!("Sentiment Map");
    println!();

    loop {
        println!("{}", report::detail(&dashboard.detail()));

        let actions = available_actions(dashboard);
        let labels: Vec<&str> = actions.iter().map(Action::label).collect();
        let idx = Select::new()
            .with_prompt(format!(
                "[{}] What would you like to do?",
                dashboard.selection().view().label()
            ))
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[idx] {
            Action::ChangeView => choose_view(dashboard)?,
            Action::ChooseCity => choose_city(dashboard)?,
            Action::ChooseRegion => choose_region(dashboard)?,
            Action::ChooseTopic => choose_topic(dashboard)?,
            Action::ClearTopic => dashboard.clear_topic(),
            Action::ShowMarkers => {
                let view = dashboard.selection().view();
                println!("{}", report::markers(&dashboard.markers(view)));
            }
            Action::Quit => return Ok(()),
        }
    }
}

fn choose_view(dashboard: &mut Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = ViewMode::all().iter().map(|v| v.label()).collect();
    let current = ViewMode::all()
        .iter()
        .position(|&v| v == dashboard.selection().view())
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("View")
        .items(&labels)
        .default(current)
        .interact()?;

    dashboard.choose_view(ViewMode::all()[idx]);
    Ok(())
}

fn choose_city(dashboard: &mut Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let cities: Vec<String> = dashboard
        .ranked()
        .iter()
        .map(|loc| format!("{} ({:.1})", loc.city, loc.overall_chs))
        .collect();
    if cities.is_empty() {
        println!("The dataset has no locations.");
        return Ok(());
    }

    let idx = Select::new()
        .with_prompt("City")
        .items(&cities)
        .default(0)
        .interact()?;

    let city = dashboard.ranked()[idx].city.clone();
    dashboard.choose_city(&city)?;
    Ok(())
}

fn choose_region(dashboard: &mut Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let regions: Vec<RegionRecord> = dashboard
        .regions()
        .iter()
        .filter(|record| record.has_data())
        .cloned()
        .collect();
    if regions.is_empty() {
        println!("No region has any locations.");
        return Ok(());
    }

    let labels: Vec<String> = regions
        .iter()
        .map(|record| {
            format!(
                "{} ({:.1}, {} locations)",
                record.region.name(),
                record.overall_chs().unwrap_or_default(),
                record.location_count
            )
        })
        .collect();
    let idx = Select::new()
        .with_prompt("Region")
        .items(&labels)
        .default(0)
        .interact()?;

    dashboard.choose_region(regions[idx].region)?;
    Ok(())
}

fn choose_topic(dashboard: &mut Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Topic::all().iter().map(|t| t.label()).collect();
    let idx = Select::new()
        .with_prompt("Topic")
        .items(&labels)
        .default(0)
        .interact()?;

    let partition = dashboard.choose_topic(Topic::all()[idx])?;
    log::debug!(
        "{} positive, {} negative posts",
        partition.positive.len(),
        partition.negative.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sentiment_map_dataset::config::DashboardConfig;
    use sentiment_map_location_models::LocationRecord;
    use sentiment_map_sentiment_models::TopicScores;

    use super::*;

    fn dashboard() -> Dashboard {
        let locations = vec![LocationRecord {
            city: "Exeter".to_string(),
            lat: 50.7184,
            lng: -3.5339,
            overall_chs: 6.1,
            overall_topic_scores_0_10: Some(TopicScores::uniform(6.1)),
            n_posts: None,
            posts: Vec::new(),
            timeseries: Vec::new(),
        }];
        Dashboard::new(Arc::new(locations), DashboardConfig::default())
    }

    fn labels(dashboard: &Dashboard) -> Vec<&'static str> {
        available_actions(dashboard).iter().map(Action::label).collect()
    }

    #[test]
    fn topics_offered_only_after_a_location() {
        let mut dashboard = dashboard();
        assert!(!labels(&dashboard).contains(&"Select a topic"));

        dashboard.choose_city("Exeter").unwrap();
        assert!(labels(&dashboard).contains(&"Select a topic"));

        dashboard.choose_topic(Topic::Income).unwrap();
        assert!(labels(&dashboard).contains(&"Back to topic overview"));
    }

    #[test]
    fn grouped_view_offers_regions_instead_of_cities() {
        let mut dashboard = dashboard();
        dashboard.choose_view(ViewMode::Grouped);
        let labels = labels(&dashboard);
        assert!(labels.contains(&"Select a region"));
        assert!(!labels.contains(&"Select a city"));
    }

    #[test]
    fn attention_view_hides_topics() {
        let mut dashboard = dashboard();
        dashboard.choose_view(ViewMode::Attention);
        dashboard.choose_city("Exeter").unwrap();
        assert!(!labels(&dashboard).contains(&"Select a topic"));
    }
}
