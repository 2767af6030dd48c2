#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the sentiment map dashboard.
//!
//! Serves the JSON API over a single shared [`Dashboard`] and the built
//! frontend from `app/dist`. The dataset is loaded once at startup; all
//! requests share one selection, so this is a single-user server.

mod handlers;
pub mod interactive;

use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use sentiment_map_dashboard::Dashboard;
use sentiment_map_dataset::{DatasetCell, config::DashboardConfig};

/// Default bind address when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port when `PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
pub struct AppState {
    /// The dataset and the session's selection.
    pub dashboard: Mutex<Dashboard>,
}

impl AppState {
    #[must_use]
    pub const fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Mutex::new(dashboard),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/topics", web::get().to(handlers::topics))
            .route("/locations", web::get().to(handlers::locations))
            .route("/locations/{city}/chart", web::get().to(handlers::chart))
            .route("/locations/{city}/posts", web::get().to(handlers::posts))
            .route("/regions", web::get().to(handlers::regions))
            .route("/markers", web::get().to(handlers::markers))
            .route("/markers/legacy", web::get().to(handlers::legacy_markers))
            .route("/selection", web::get().to(handlers::selection))
            .route("/selection/view", web::post().to(handlers::choose_view))
            .route("/selection/location", web::post().to(handlers::choose_location))
            .route("/selection/topic", web::post().to(handlers::choose_topic)),
    );
}

/// Starts the sentiment map API server.
///
/// Loads the configuration (`SENTIMENT_MAP_CONFIG`) and resolves the
/// dataset path (`SENTIMENT_MAP_DATA`), then delegates to [`serve`]. The
/// caller initializes logging and provides the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration cannot be
/// loaded or [`serve`] fails.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let config = DashboardConfig::from_env().map_err(std::io::Error::other)?;
    let data_path = config.resolve_data_path();
    serve(config, data_path).await
}

/// Loads the dataset at `data_path` and serves it on `BIND_ADDR`:`PORT`.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the dataset cannot be loaded, or
/// if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn serve(config: DashboardConfig, data_path: PathBuf) -> std::io::Result<()> {
    let dataset = DatasetCell::new(data_path);
    let locations = dataset.get().await.map_err(std::io::Error::other)?;

    serve_dashboard(Dashboard::new(locations, config)).await
}

/// Serves an already loaded dashboard on `BIND_ADDR`:`PORT`.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn serve_dashboard(dashboard: Dashboard) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(dashboard));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test};
    use sentiment_map_location_models::{LocationRecord, PostRecord, TimeseriesEntry};
    use sentiment_map_sentiment_models::TopicScores;
    use serde_json::{Value, json};

    use super::*;

    fn location(city: &str, lat: f64, lng: f64, chs: f64) -> LocationRecord {
        LocationRecord {
            city: city.to_string(),
            lat,
            lng,
            overall_chs: chs,
            overall_topic_scores_0_10: Some(TopicScores::uniform(chs)),
            n_posts: None,
            posts: vec![PostRecord {
                posted_at_timestamp: 1_700_000_000,
                text: format!("{city} today"),
            }],
            timeseries: vec![TimeseriesEntry {
                topic_scores_0_10: TopicScores {
                    housing: Some(2.5),
                    ..TopicScores::default()
                },
                posted_at_timestamp: 1_700_000_000,
                text: "rent doubled".to_string(),
            }],
        }
    }

    fn state() -> web::Data<AppState> {
        let locations = vec![
            location("Dundee", 56.4620, -2.9707, 5.8),
            location("Brighton", 50.8225, -0.1372, 6.3),
        ];
        web::Data::new(AppState::new(Dashboard::new(
            Arc::new(locations),
            DashboardConfig::default(),
        )))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn lists_ranked_locations() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/locations").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body[0]["city"], "Brighton");
        assert_eq!(body[0]["rank"], 1);
        assert_eq!(body[0]["region"], "england");
        assert_eq!(body[1]["region"], "scotland");
    }

    #[actix_web::test]
    async fn regions_include_empty_ones() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/regions").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.as_array().map(Vec::len), Some(4));
        assert_eq!(body[1]["region"], "northern_ireland");
        assert!(body[1]["scores"].is_null());
    }

    #[actix_web::test]
    async fn unknown_view_is_a_bad_request() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/markers?view=heatmap")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn posts_for_unknown_city_is_not_found() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/locations/Atlantis/posts?topic=housing")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/locations/Dundee/posts?topic=housing")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["negative"][0]["text"], "rent doubled");
    }

    #[actix_web::test]
    async fn topic_before_location_conflicts() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::post()
            .uri("/api/selection/topic")
            .set_json(json!({ "topic": "housing" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn selection_flow() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/selection/view")
            .set_json(json!({ "view": "sentiment" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["view"], "sentiment");
        assert_eq!(body["detail"]["kind"], "placeholder");

        let req = test::TestRequest::post()
            .uri("/api/selection/location")
            .set_json(json!({ "city": "dundee" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["detail"]["kind"], "location");
        assert_eq!(body["detail"]["city"], "Dundee");

        let req = test::TestRequest::post()
            .uri("/api/selection/topic")
            .set_json(json!({ "topic": "housing" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["detail"]["selectedTopic"], "housing");
        assert_eq!(body["detail"]["partition"]["negative"][0]["text"], "rent doubled");

        let req = test::TestRequest::post()
            .uri("/api/selection/view")
            .set_json(json!({ "view": "attention" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["detail"]["kind"], "placeholder");
    }

    #[actix_web::test]
    async fn empty_region_is_not_found() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::post()
            .uri("/api/selection/location")
            .set_json(json!({ "region": "Wales" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/selection/location")
            .set_json(json!({ "region": "Narnia" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
