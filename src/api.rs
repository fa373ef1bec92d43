// Care Finder - REST API
// Read-only JSON endpoints over the same controller and renderer the TUI uses

use crate::notify::TracingNotifier;
use crate::provider::{canonical_specialty, ProviderRecord, SPECIALTY_OPTIONS};
use crate::records::{recent_visits, test_results, TestResult, VisitRecord};
use crate::render::{compose_view, ResultView};
use crate::search::SearchController;
use crate::support::SupportRequest;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state. The catalog is immutable; each request builds
/// its own controller over it.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Vec<ProviderRecord>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn error(message: String) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    search: String,
    #[serde(default)]
    specialty: String,
    #[serde(default)]
    distance: String,
}

#[derive(Serialize)]
struct SpecialtyOption {
    value: &'static str,
    label: &'static str,
}

fn run_search(state: &AppState, params: &SearchParams) -> ResultView {
    let mut controller = SearchController::new(state.catalog.as_ref().clone());
    controller.set_search_term(&params.search);
    controller.set_specialty_filter(&params.specialty);
    controller.set_distance_filter(&params.distance);
    controller.submit_search();
    compose_view(&controller)
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/providers?search=&specialty=&distance= - Filtered result view
async fn search_providers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    Json(ApiResponse::ok(run_search(&state, &params)))
}

/// GET /api/specialties - Specialty filter vocabulary
async fn list_specialties() -> impl IntoResponse {
    let options: Vec<SpecialtyOption> = SPECIALTY_OPTIONS
        .iter()
        .map(|&(value, label)| SpecialtyOption { value, label })
        .collect();

    Json(ApiResponse::ok(options))
}

/// GET /api/specialties/:specialty/providers - Providers for one specialty
async fn specialty_providers(
    State(state): State<AppState>,
    Path(specialty): Path<String>,
) -> impl IntoResponse {
    // Path has already percent-decoded "primary%20care"
    match canonical_specialty(&specialty) {
        Some(value) if !value.is_empty() => {
            let params = SearchParams {
                specialty: value.to_string(),
                ..SearchParams::default()
            };
            (StatusCode::OK, Json(ApiResponse::ok(run_search(&state, &params)))).into_response()
        }
        _ => {
            tracing::debug!(specialty = %specialty, "Unknown specialty requested");
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(format!("Unknown specialty: {}", specialty))),
            )
                .into_response()
        }
    }
}

/// GET /api/records/visits
async fn get_visits() -> impl IntoResponse {
    Json(ApiResponse::<Vec<VisitRecord>>::ok(recent_visits()))
}

/// GET /api/records/test-results
async fn get_test_results() -> impl IntoResponse {
    Json(ApiResponse::<Vec<TestResult>>::ok(test_results()))
}

/// POST /api/support - Validate a support request and issue a ticket
async fn submit_support(Json(request): Json<SupportRequest>) -> impl IntoResponse {
    let mut notifier = TracingNotifier;

    match request.submit(&mut notifier, || {}) {
        Ok(ticket) => (StatusCode::CREATED, Json(ApiResponse::ok(ticket))).into_response(),
        Err(err) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(err.to_string())),
        )
            .into_response(),
    }
}

pub fn build_router(catalog: Vec<ProviderRecord>) -> Router {
    let state = AppState {
        catalog: Arc::new(catalog),
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/providers", get(search_providers))
        .route("/specialties", get(list_specialties))
        .route("/specialties/:specialty/providers", get(specialty_providers))
        .route("/records/visits", get(get_visits))
        .route("/records/test-results", get(get_test_results))
        .route("/support", post(submit_support))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================
