//! HTTP handler functions for the sentiment map API.

use std::sync::MutexGuard;

use actix_web::{HttpResponse, web};
use sentiment_map_analytics::{AnalyticsError, regions::assign_region};
use sentiment_map_dashboard::{Dashboard, DashboardError, view::ViewMode};
use sentiment_map_location_models::Region;
use sentiment_map_sentiment_models::Topic;
use sentiment_map_server_models::{
    ApiHealth, ApiLocationSummary, ApiTopic, ChooseLocationRequest, ChooseTopicRequest,
    ChooseViewRequest, MarkersQuery, PostsQuery,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let location_count = match lock(&state) {
        Ok(dashboard) => dashboard.locations().len(),
        Err(response) => return response,
    };
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        location_count,
    })
}

/// `GET /api/topics`
///
/// Lists the topics in chart order with their composite score weights.
pub async fn topics() -> HttpResponse {
    let topics: Vec<ApiTopic> = Topic::all().iter().copied().map(ApiTopic::from).collect();
    HttpResponse::Ok().json(topics)
}

/// `GET /api/locations`
///
/// Lists every location, happiest first.
pub async fn locations(state: web::Data<AppState>) -> HttpResponse {
    let dashboard = match lock(&state) {
        Ok(dashboard) => dashboard,
        Err(response) => return response,
    };
    let ranked: Vec<ApiLocationSummary> = dashboard
        .ranked()
        .into_iter()
        .enumerate()
        .map(|(i, loc)| ApiLocationSummary::new(i + 1, assign_region(loc.lat, loc.lng), loc))
        .collect();
    HttpResponse::Ok().json(ranked)
}

/// `GET /api/regions`
///
/// All four region aggregates, including those without data.
pub async fn regions(state: web::Data<AppState>) -> HttpResponse {
    let mut dashboard = match lock(&state) {
        Ok(dashboard) => dashboard,
        Err(response) => return response,
    };
    HttpResponse::Ok().json(dashboard.regions())
}

/// `GET /api/markers?view=<view>`
///
/// Marker layer for `view`, or for the session's active view if omitted.
pub async fn markers(
    state: web::Data<AppState>,
    params: web::Query<MarkersQuery>,
) -> HttpResponse {
    let requested = match params.view.as_deref().map(parse_view).transpose() {
        Ok(view) => view,
        Err(response) => return response,
    };
    let mut dashboard = match lock(&state) {
        Ok(dashboard) => dashboard,
        Err(response) => return response,
    };
    let view = requested.unwrap_or_else(|| dashboard.selection().view());
    HttpResponse::Ok().json(dashboard.markers(view))
}

/// `GET /api/markers/legacy`
pub async fn legacy_markers(state: web::Data<AppState>) -> HttpResponse {
    match lock(&state) {
        Ok(dashboard) => HttpResponse::Ok().json(dashboard.legacy_markers()),
        Err(response) => response,
    }
}

/// `GET /api/locations/{city}/chart`
pub async fn chart(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let city = path.into_inner();
    let dashboard = match lock(&state) {
        Ok(dashboard) => dashboard,
        Err(response) => return response,
    };
    match dashboard.chart(&city) {
        Ok(Some(chart)) => HttpResponse::Ok().json(chart),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("No topic scores for {city}")
        })),
        Err(e) => dashboard_error(&e),
    }
}

/// `GET /api/locations/{city}/posts?topic=<topic>`
///
/// Positive and negative contributing posts for one topic.
pub async fn posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<PostsQuery>,
) -> HttpResponse {
    let topic = match parse_topic(&params.topic) {
        Ok(topic) => topic,
        Err(response) => return response,
    };
    let dashboard = match lock(&state) {
        Ok(dashboard) => dashboard,
        Err(response) => return response,
    };
    match dashboard.posts(&path, topic) {
        Ok(partition) => HttpResponse::Ok().json(partition),
        Err(e) => dashboard_error(&e),
    }
}

/// `GET /api/selection`
///
/// The session's view, markers, and detail panel.
pub async fn selection(state: web::Data<AppState>) -> HttpResponse {
    match lock(&state) {
        Ok(mut dashboard) => HttpResponse::Ok().json(dashboard.snapshot()),
        Err(response) => response,
    }
}

/// `POST /api/selection/view`
pub async fn choose_view(
    state: web::Data<AppState>,
    body: web::Json<ChooseViewRequest>,
) -> HttpResponse {
    let view = match parse_view(&body.view) {
        Ok(view) => view,
        Err(response) => return response,
    };
    match lock(&state) {
        Ok(mut dashboard) => {
            dashboard.choose_view(view);
            HttpResponse::Ok().json(dashboard.snapshot())
        }
        Err(response) => response,
    }
}

/// `POST /api/selection/location`
///
/// Selects a city or a region. Exactly one must be given.
pub async fn choose_location(
    state: web::Data<AppState>,
    body: web::Json<ChooseLocationRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut dashboard = match lock(&state) {
        Ok(dashboard) => dashboard,
        Err(response) => return response,
    };

    let result = match (body.city, body.region) {
        (Some(city), None) => dashboard.choose_city(&city),
        (None, Some(name)) => {
            let Some(region) = Region::from_name(&name) else {
                return bad_request(format!("Unknown region: {name}"));
            };
            dashboard.choose_region(region)
        }
        _ => return bad_request("Expected exactly one of city or region"),
    };

    match result {
        Ok(()) => HttpResponse::Ok().json(dashboard.snapshot()),
        Err(e) => dashboard_error(&e),
    }
}

/// `POST /api/selection/topic`
///
/// Drills into a topic for the selected location, or clears the topic if
/// none is given.
pub async fn choose_topic(
    state: web::Data<AppState>,
    body: web::Json<ChooseTopicRequest>,
) -> HttpResponse {
    let topic = match body.topic.as_deref().map(parse_topic).transpose() {
        Ok(topic) => topic,
        Err(response) => return response,
    };
    let mut dashboard = match lock(&state) {
        Ok(dashboard) => dashboard,
        Err(response) => return response,
    };

    if let Some(topic) = topic {
        if let Err(e) = dashboard.choose_topic(topic) {
            return dashboard_error(&e);
        }
    } else {
        dashboard.clear_topic();
    }

    HttpResponse::Ok().json(dashboard.snapshot())
}

fn lock(state: &AppState) -> Result<MutexGuard<'_, Dashboard>, HttpResponse> {
    state.dashboard.lock().map_err(|e| {
        log::error!("Dashboard state is poisoned: {e}");
        HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Dashboard state is unavailable"
        }))
    })
}

fn parse_view(name: &str) -> Result<ViewMode, HttpResponse> {
    name.parse()
        .map_err(|_| bad_request(format!("Unknown view: {name}")))
}

fn parse_topic(name: &str) -> Result<Topic, HttpResponse> {
    name.parse()
        .map_err(|_| bad_request(format!("Unknown topic: {name}")))
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    let message = message.into();
    log::debug!("Bad request: {message}");
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

/// Unknown cities and empty regions are 404; invalid transitions are 409.
fn dashboard_error(e: &DashboardError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        DashboardError::Analytics(AnalyticsError::UnknownLocation { .. })
        | DashboardError::RegionWithoutData { .. } => HttpResponse::NotFound().json(body),
        DashboardError::Selection(_) => {
            log::debug!("Rejected selection transition: {e}");
            HttpResponse::Conflict().json(body)
        }
    }
}
