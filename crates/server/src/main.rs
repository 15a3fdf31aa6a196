// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{
        FromRef, Path, Query, State as AxumState,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use fieldops_api::{
    ApiError, AssignManagerRequest, AssignResponse, AssignmentHistoryResponse, AssignmentInfo,
    AssignmentStatsResponse, AvailableStaffQuery, AvailableStaffResponse, BatchAssignRequest,
    BatchAssignResponse, ComplaintInfo, ManagerResponse, ManualAssignRequest, ReassignRequest,
    StatusTransitionRequest, StatusTransitionResponse, WorkloadResponse, assign_area_manager,
    auto_assign, auto_assign_many, get_area_manager, get_assignment_history,
    get_assignment_stats, get_staff_workload, list_available_staff, manual_assign, reassign,
    transition_complaint_status,
};
use fieldops_persistence::Persistence;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::live::{LiveEventBroadcaster, live_events_handler};
use crate::session::RequestActor;

/// `FieldOps` assignment server: HTTP API for complaint routing and workload.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer. One engine operation holds the lock at a time.
    persistence: Arc<Mutex<Persistence>>,
    /// Notification fan-out to live clients.
    live: Arc<LiveEventBroadcaster>,
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.live)
    }
}

/// Response envelope used by every endpoint.
#[derive(Debug, Clone, Serialize)]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    const fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    const fn with_message(message: String, data: T) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

/// Builds a `success: false` envelope response.
pub fn envelope_error(status: StatusCode, message: String) -> Response {
    let body: Json<ApiEnvelope<()>> = Json(ApiEnvelope {
        success: false,
        message: Some(message),
        data: None,
    });
    (status, body).into_response()
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    const fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        envelope_error(self.status, self.message)
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::NoTechnicianAvailable { .. }
            | ApiError::DomainRuleViolation { .. }
            | ApiError::ConcurrentModification { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error while handling request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Unwraps an extractor result, answering rejections inside the envelope.
fn accept<T, E: std::error::Error>(extracted: Result<T, E>) -> Result<T, HttpError> {
    extracted.map_err(|rejection| HttpError::bad_request(rejection.to_string()))
}

type HttpResult<T> = Result<Json<ApiEnvelope<T>>, HttpError>;

/// Handler for POST `/assignment/complaints/{id}/assign`.
async fn handle_auto_assign(
    AxumState(state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    RequestActor(actor): RequestActor,
) -> HttpResult<AssignmentInfo> {
    let Path(complaint_id) = accept(path)?;
    let mut persistence = state.persistence.lock().await;
    let AssignResponse {
        assignment,
        message,
    } = auto_assign(&mut persistence, state.live.as_ref(), complaint_id, &actor)?;
    Ok(Json(ApiEnvelope::with_message(message, assignment)))
}

/// Handler for POST `/assignment/complaints/auto-assign`.
async fn handle_auto_assign_many(
    AxumState(state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    payload: Result<Json<BatchAssignRequest>, JsonRejection>,
) -> HttpResult<BatchAssignResponse> {
    let Json(request) = accept(payload)?;
    let mut persistence = state.persistence.lock().await;
    let response: BatchAssignResponse =
        auto_assign_many(&mut persistence, state.live.as_ref(), &request, &actor)?;

    info!(
        total = response.total,
        successful = response.successful,
        failed = response.failed,
        actor = %actor.id,
        "Batch auto-assignment finished"
    );

    let message: String = format!(
        "{} of {} complaints assigned",
        response.successful, response.total
    );
    Ok(Json(ApiEnvelope::with_message(message, response)))
}

/// Handler for POST `/assignment/complaints/{id}/manual-assign`.
async fn handle_manual_assign(
    AxumState(state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    RequestActor(actor): RequestActor,
    payload: Result<Json<ManualAssignRequest>, JsonRejection>,
) -> HttpResult<AssignmentInfo> {
    let Path(complaint_id) = accept(path)?;
    let Json(request) = accept(payload)?;
    let mut persistence = state.persistence.lock().await;
    let AssignResponse {
        assignment,
        message,
    } = manual_assign(
        &mut persistence,
        state.live.as_ref(),
        complaint_id,
        &request,
        &actor,
    )?;
    Ok(Json(ApiEnvelope::with_message(message, assignment)))
}

/// Handler for PUT `/assignment/complaints/{id}/reassign`.
async fn handle_reassign(
    AxumState(state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    RequestActor(actor): RequestActor,
    payload: Result<Json<ReassignRequest>, JsonRejection>,
) -> HttpResult<AssignmentInfo> {
    let Path(complaint_id) = accept(path)?;
    let Json(request) = accept(payload)?;
    let mut persistence = state.persistence.lock().await;
    let AssignResponse {
        assignment,
        message,
    } = reassign(
        &mut persistence,
        state.live.as_ref(),
        complaint_id,
        &request,
        &actor,
    )?;
    Ok(Json(ApiEnvelope::with_message(message, assignment)))
}

/// Handler for GET `/assignment/complaints/{id}/history`.
async fn handle_assignment_history(
    AxumState(state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    RequestActor(actor): RequestActor,
) -> HttpResult<AssignmentHistoryResponse> {
    let Path(complaint_id) = accept(path)?;
    let mut persistence = state.persistence.lock().await;
    let response = get_assignment_history(&mut persistence, complaint_id, &actor)?;
    Ok(Json(ApiEnvelope::ok(response)))
}

/// Handler for PUT `/assignment/complaints/{id}/status`.
async fn handle_transition_status(
    AxumState(state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    RequestActor(actor): RequestActor,
    payload: Result<Json<StatusTransitionRequest>, JsonRejection>,
) -> HttpResult<ComplaintInfo> {
    let Path(complaint_id) = accept(path)?;
    let Json(request) = accept(payload)?;
    let mut persistence = state.persistence.lock().await;
    let StatusTransitionResponse { complaint, message } = transition_complaint_status(
        &mut persistence,
        state.live.as_ref(),
        complaint_id,
        &request,
        &actor,
    )?;
    Ok(Json(ApiEnvelope::with_message(message, complaint)))
}

/// Handler for GET `/assignment/stats`.
async fn handle_stats(
    AxumState(state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
) -> HttpResult<AssignmentStatsResponse> {
    let mut persistence = state.persistence.lock().await;
    let response = get_assignment_stats(&mut persistence, &actor)?;
    Ok(Json(ApiEnvelope::ok(response)))
}

/// Handler for GET `/assignment/staff/available?officeId=`.
async fn handle_available_staff(
    AxumState(state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    query: Result<Query<AvailableStaffQuery>, QueryRejection>,
) -> HttpResult<AvailableStaffResponse> {
    let Query(query) = accept(query)?;
    let mut persistence = state.persistence.lock().await;
    let response = list_available_staff(&mut persistence, &query, &actor)?;
    Ok(Json(ApiEnvelope::ok(response)))
}

/// Handler for GET `/assignment/staff/{id}/workload`.
async fn handle_staff_workload(
    AxumState(state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    RequestActor(actor): RequestActor,
) -> HttpResult<WorkloadResponse> {
    let Path(staff_id) = accept(path)?;
    let mut persistence = state.persistence.lock().await;
    let response = get_staff_workload(&mut persistence, staff_id, &actor)?;
    Ok(Json(ApiEnvelope::ok(response)))
}

/// Handler for GET `/assignment/areas/{id}/manager`.
async fn handle_get_manager(
    AxumState(state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    RequestActor(actor): RequestActor,
) -> HttpResult<ManagerResponse> {
    let Path(area_id) = accept(path)?;
    let mut persistence = state.persistence.lock().await;
    let response = get_area_manager(&mut persistence, area_id, &actor)?;
    Ok(Json(ApiEnvelope::ok(response)))
}

/// Handler for PUT `/assignment/areas/{id}/manager`.
async fn handle_assign_manager(
    AxumState(state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    RequestActor(actor): RequestActor,
    payload: Result<Json<AssignManagerRequest>, JsonRejection>,
) -> HttpResult<ManagerResponse> {
    let Path(area_id) = accept(path)?;
    let Json(request) = accept(payload)?;
    let mut persistence = state.persistence.lock().await;
    let response = assign_area_manager(&mut persistence, area_id, &request, &actor)?;
    Ok(Json(ApiEnvelope::ok(response)))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/assignment/complaints/auto-assign",
            post(handle_auto_assign_many),
        )
        .route(
            "/assignment/complaints/{id}/assign",
            post(handle_auto_assign),
        )
        .route(
            "/assignment/complaints/{id}/manual-assign",
            post(handle_manual_assign),
        )
        .route("/assignment/complaints/{id}/reassign", put(handle_reassign))
        .route(
            "/assignment/complaints/{id}/history",
            get(handle_assignment_history),
        )
        .route(
            "/assignment/complaints/{id}/status",
            put(handle_transition_status),
        )
        .route("/assignment/stats", get(handle_stats))
        .route("/assignment/staff/available", get(handle_available_staff))
        .route(
            "/assignment/staff/{id}/workload",
            get(handle_staff_workload),
        )
        .route(
            "/assignment/areas/{id}/manager",
            get(handle_get_manager).put(handle_assign_manager),
        )
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing FieldOps assignment server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        live: Arc::new(LiveEventBroadcaster::new()),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
