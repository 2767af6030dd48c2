#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the sentiment map.
//!
//! One-shot subcommands print rankings, region aggregates, charts, and
//! contributing posts from the loaded dataset. `browse` walks the same
//! selection flow as the web dashboard, and `serve` starts the API server.
//! With no subcommand, a menu asks which of these to run.

mod browse;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::Select;
use sentiment_map_dashboard::{Dashboard, view::ViewMode};
use sentiment_map_dataset::{DatasetError, config::DashboardConfig, load_dataset};
use sentiment_map_sentiment_models::Topic;

#[derive(Parser)]
#[command(name = "sentiment_map", about = "Sentiment map dashboard tools")]
struct Cli {
    /// Dataset to load (overrides `SENTIMENT_MAP_DATA` and the config file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Configuration file (overrides `SENTIMENT_MAP_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Subcommand)]
enum Commands {
    /// Rank locations by composite score
    Rank {
        /// Only show the top N
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the per-region averages
    Regions,
    /// Print the marker layer for a view
    Markers {
        /// `sentiment_clean`, `sentiment`, `attention` or `grouped`
        #[arg(long, default_value = "sentiment_clean")]
        view: ViewMode,
        /// Use the single-layer `[0, 10]` city scale instead
        #[arg(long)]
        legacy: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show a location's topic chart
    Chart {
        /// City name
        city: String,
    },
    /// Show the posts pulling a topic up or down for a location
    Posts {
        /// City name
        #[arg(long)]
        city: String,
        /// Topic key, e.g. `access_to_services`
        #[arg(long)]
        topic: Topic,
    },
    /// Browse the dashboard interactively
    Browse,
    /// Start the API server
    Serve,
}

impl Commands {
    const MENU: &[Self] = &[
        Self::Browse,
        Self::Rank { limit: None },
        Self::Regions,
        Self::Serve,
    ];

    const fn menu_label(&self) -> &'static str {
        match self {
            Self::Browse => "Browse the dashboard",
            Self::Rank { .. } => "Rank locations",
            Self::Regions => "Show region averages",
            Self::Markers { .. } => "List map markers",
            Self::Chart { .. } => "Show a topic chart",
            Self::Posts { .. } => "Show contributing posts",
            Self::Serve => "Start server",
        }
    }
}

fn load_config(cli: &Cli) -> Result<DashboardConfig, DatasetError> {
    match &cli.config {
        Some(path) => DashboardConfig::load(path),
        None => DashboardConfig::from_env(),
    }
}

fn data_path(cli: &Cli, config: &DashboardConfig) -> PathBuf {
    cli.data
        .clone()
        .unwrap_or_else(|| config.resolve_data_path())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let mut cli = Cli::parse();

    let command = if let Some(command) = cli.command.take() {
        command
    } else {
        let labels: Vec<&str> = Commands::MENU.iter().map(Commands::menu_label).collect();
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;
        Commands::MENU[idx].clone()
    };

    let config = load_config(&cli)?;
    let path = data_path(&cli, &config);
    let mut dashboard = Dashboard::new(load_dataset(&path).await?, config);

    match command {
        Commands::Rank { limit } => {
            let ranked = dashboard.ranked();
            let shown = limit.map_or(ranked.len(), |n| n.min(ranked.len()));
            print!("{}", report::ranking(&ranked[..shown]));
        }
        Commands::Regions => print!("{}", report::regions(dashboard.regions())),
        Commands::Markers { view, legacy, json } => {
            let layer = if legacy {
                dashboard.legacy_markers()
            } else {
                dashboard.markers(view)
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&layer)?);
            } else {
                print!("{}", report::markers(&layer));
            }
        }
        Commands::Chart { city } => match dashboard.chart(&city)? {
            Some(chart) => print!("{}", report::chart(&chart)),
            None => println!("{city} has no topic scores"),
        },
        Commands::Posts { city, topic } => {
            print!("{}", report::partition(&dashboard.posts(&city, topic)?));
        }
        Commands::Browse => browse::run(&mut dashboard)?,
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new()
                    .block_on(sentiment_map_server::serve_dashboard(dashboard))
            })
            .await??;
        }
    }

    Ok(())
}
