use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use server_api::{
    create_grade_submission, create_wish, list_grade_submissions, list_wishes, ApiContext,
    INVALID_GRADE_MESSAGE, INVALID_WISH_MESSAGE,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        grades_route, wishes_route, CreateGradeSubmissionRequest, CreateWishRequest,
        GradeSubmission, Wish,
    },
};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = AppState {
        api: ApiContext::new(Storage::new()),
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr = settings.bind_addr()?;
    info!(%addr, max_body_bytes = settings.max_body_bytes, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped; in-memory submissions discarded");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(wishes_route(), get(http_list_wishes).post(http_create_wish))
        .route(
            grades_route(),
            get(http_list_grades).post(http_create_grades),
        )
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn not_found() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(ErrorCode::NotFound, "route not found")),
    )
}

async fn http_create_wish(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateWishRequest>, JsonRejection>,
) -> Result<Json<Wish>, (StatusCode, Json<ApiError>)> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(%rejection, "rejected wish payload");
        validation_failure(INVALID_WISH_MESSAGE)
    })?;
    let wish = create_wish(&state.api, req).await.map_err(error_response)?;
    Ok(Json(wish))
}

async fn http_create_grades(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateGradeSubmissionRequest>, JsonRejection>,
) -> Result<Json<GradeSubmission>, (StatusCode, Json<ApiError>)> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(%rejection, "rejected grade payload");
        validation_failure(INVALID_GRADE_MESSAGE)
    })?;
    let submission = create_grade_submission(&state.api, req)
        .await
        .map_err(error_response)?;
    Ok(Json(submission))
}

async fn http_list_wishes(State(state): State<Arc<AppState>>) -> Json<Vec<Wish>> {
    Json(list_wishes(&state.api).await)
}

async fn http_list_grades(State(state): State<Arc<AppState>>) -> Json<Vec<GradeSubmission>> {
    Json(list_grade_submissions(&state.api).await)
}

fn validation_failure(message: &str) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::validation(message)),
    )
}

fn error_response(error: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
    };
    (status, Json(error))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
