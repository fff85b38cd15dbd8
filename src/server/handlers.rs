use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::finder::PlaceFinder;
use crate::maps::{SearchMode, SearchRequest};
use crate::report::Report;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── /api/search ─────────────────────────────────────────────────

/// Query string (GET) or JSON body (POST).
#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    pub area: Option<String>,
    pub keyword: Option<String>,
    pub mode: Option<String>,
    /// Place type; "any" or empty searches every type.
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub top: Option<usize>,
}

struct ParsedSearch {
    area: String,
    request: SearchRequest,
    top_n: usize,
}

fn parse_params(params: SearchParams) -> Result<ParsedSearch, ApiError> {
    let area = params.area.as_deref().unwrap_or("").trim().to_string();
    if area.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'area' parameter"));
    }

    let mode = match params.mode.as_deref().filter(|m| !m.trim().is_empty()) {
        Some(m) => m.parse::<SearchMode>().map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?,
        None => SearchMode::default(),
    };

    let place_type = match params.place_type {
        Some(t) if t.trim().is_empty() || t.trim().eq_ignore_ascii_case("any") => None,
        Some(t) => Some(t.trim().to_string()),
        None => SearchRequest::default().place_type,
    };

    let top_n = params.top.unwrap_or_else(|| mode.default_top_n());
    if top_n == 0 {
        return Err(api_error(StatusCode::BAD_REQUEST, "'top' must be at least 1"));
    }

    Ok(ParsedSearch {
        area,
        request: SearchRequest {
            mode,
            keyword: params.keyword.filter(|k| !k.trim().is_empty()),
            place_type,
        },
        top_n,
    })
}

async fn run_search(state: Arc<AppState>, method: &str, params: SearchParams) -> Result<Json<Report>, ApiError> {
    let start = Instant::now();
    let parsed = parse_params(params)?;

    // The pipeline is blocking (ureq + page delay sleeps).
    let area = parsed.area.clone();
    let report = tokio::task::spawn_blocking(move || {
        let config = state.client.config();
        let findings = PlaceFinder::new(&state.client, config).find(&parsed.area, &parsed.request);
        Report::build(&findings, parsed.top_n, config)
    })
    .await
    .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Search task failed: {}", e)))?;

    tracing::info!(
        "[{}] {} /api/search area={} -> {} place(s) ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        method,
        area,
        report.total_count,
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(report))
}

pub async fn search_get(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Report>, ApiError> {
    run_search(state, "GET", params).await
}

pub async fn search_post(
    State(state): State<Arc<AppState>>,
    Json(params): Json<SearchParams>,
) -> Result<Json<Report>, ApiError> {
    run_search(state, "POST", params).await
}
