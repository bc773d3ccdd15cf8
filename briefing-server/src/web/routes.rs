//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::domain::{DecodedMetar, DecodedTaf, Icao, Position, Station};
use crate::weather::{WeatherError, WeatherReport};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// Static assets are served from the configured static directory.
pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/stations", get(list_stations))
        .route("/api/stations/search", get(search_stations))
        .route("/api/stations/nearby", get(nearby_stations))
        .route("/api/metar", get(get_metar))
        .route("/api/taf", get(get_taf))
        .route("/api/weather", get(get_weather))
        .route("/briefing", get(briefing))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Dashboard page with search box and nearby shortcuts.
async fn index_page(State(state): State<AppState>) -> Result<Response, AppError> {
    let config = &state.config;
    let nearby = state
        .briefings
        .nearby_summaries(config.reference, DEFAULT_NEARBY_LIMIT)
        .await;

    let template = IndexTemplate {
        default_station: config.default_station.to_string(),
        debounce_ms: config.debounce.delay.as_millis() as u64,
        min_query_len: config.debounce.min_query_len,
        nearby: nearby.iter().map(StationView::from_summary).collect(),
    };

    Ok(render(&template)?.into_response())
}

/// All known stations.
async fn list_stations(State(state): State<AppState>) -> Json<Vec<Station>> {
    Json(state.directory.list())
}

/// Search stations by code, name, or city.
async fn search_stations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<StationSearchRequest>,
) -> Result<Response, AppError> {
    let min_len = state.config.debounce.min_query_len;
    let stations = match state.config.debounce.accept(&req.q) {
        Some(needle) => state.directory.search(needle),
        None => Vec::new(),
    };

    if accepts_html(&headers) {
        let empty_message = if req.q.trim().chars().count() < min_len {
            format!("Type at least {min_len} characters")
        } else {
            format!("No stations match \"{}\"", req.q.trim())
        };
        let template = StationListTemplate {
            stations: stations.iter().map(StationView::from_station).collect(),
            seq: req.seq,
            empty_message,
        };
        Ok(render(&template)?.into_response())
    } else {
        Ok(Json(StationSearchResponse {
            seq: req.seq,
            stations,
        })
        .into_response())
    }
}

/// Stations nearest a point, with their current flight category.
async fn nearby_stations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<NearbyRequest>,
) -> Result<Response, AppError> {
    let from = reference_position(&req, state.config.reference)?;
    let stations = state
        .briefings
        .nearby_summaries(from, req.effective_limit())
        .await;

    if accepts_html(&headers) {
        let template = StationListTemplate {
            stations: stations.iter().map(StationView::from_summary).collect(),
            seq: None,
            empty_message: "No stations nearby".to_string(),
        };
        Ok(render(&template)?.into_response())
    } else {
        Ok(Json(NearbyResponse { stations }).into_response())
    }
}

/// Current METAR; unknown stations get a synthetic observation.
async fn get_metar(
    State(state): State<AppState>,
    Query(req): Query<IcaoQuery>,
) -> Result<Json<DecodedMetar>, AppError> {
    let icao = parse_icao(&req.icao)?;
    Ok(Json(state.source.metar(&icao).await?))
}

/// Current TAF, or `null` when none is issued.
async fn get_taf(
    State(state): State<AppState>,
    Query(req): Query<IcaoQuery>,
) -> Result<Json<Option<DecodedTaf>>, AppError> {
    let icao = parse_icao(&req.icao)?;
    Ok(Json(state.source.taf(&icao).await?))
}

/// METAR and TAF fetched together.
async fn get_weather(
    State(state): State<AppState>,
    Query(req): Query<IcaoQuery>,
) -> Result<Json<WeatherReport>, AppError> {
    let icao = parse_icao(&req.icao)?;
    Ok(Json(state.source.weather(&icao).await?))
}

/// Full briefing for one station.
async fn briefing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<IcaoQuery>,
) -> Result<Response, AppError> {
    let icao = parse_icao(&req.icao)?;
    let html = accepts_html(&headers);

    let outcome = match state.briefings.briefing(&icao).await {
        Ok(outcome) => outcome,
        Err(e) if html => {
            error!(%icao, error = %e, "briefing failed");
            let template = ErrorTemplate {
                title: format!("Weather for {icao} is unavailable"),
                message: e.to_string(),
                retry_icao: Some(icao.to_string()),
            };
            return Ok((StatusCode::BAD_GATEWAY, render(&template)?).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    if html {
        let template = BriefingTemplate {
            briefing: BriefingView::new(&outcome),
        };
        Ok(render(&template)?.into_response())
    } else {
        Ok(Json(outcome).into_response())
    }
}

async fn not_found() -> AppError {
    AppError::NotFound {
        message: "Not found".to_string(),
    }
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn parse_icao(raw: &str) -> Result<Icao, AppError> {
    Icao::parse_normalized(raw).map_err(|_| AppError::BadRequest {
        message: format!("Invalid ICAO code: {raw}"),
    })
}

fn reference_position(req: &NearbyRequest, default: Position) -> Result<Position, AppError> {
    let (latitude, longitude) = match (req.lat, req.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        (None, None) => return Ok(default),
        _ => {
            return Err(AppError::BadRequest {
                message: "Position needs both lat and lon".to_string(),
            });
        }
    };

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::BadRequest {
            message: format!("Invalid position: {latitude}, {longitude}"),
        });
    }
    Ok(Position::new(latitude, longitude))
}

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {e}"),
    })?;
    Ok(Html(html))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// The weather backend failed; the client may retry.
    Upstream { message: String },
    Internal { message: String },
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::InvalidConfig(_) => AppError::Internal {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
