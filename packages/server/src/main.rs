#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sentiment map API server binary.

use clap::Parser;

#[derive(Parser)]
#[command(name = "sentiment_map_server", about = "Sentiment map API server")]
struct Cli {
    /// Prompt for the bind address, port, and dataset instead of reading
    /// them from the environment
    #[arg(long)]
    interactive: bool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    if cli.interactive {
        sentiment_map_server::interactive::run().await
    } else {
        sentiment_map_server::run_server().await
    }
}
