// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use fieldops_domain::{AreaId, Priority, TechnicianId};
use fieldops_persistence::Persistence;
use serde_json::Value;
use std::sync::Arc;
use time::macros::datetime;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::live::LiveEventBroadcaster;
use crate::{AppState, build_router};

pub const SUPERVISOR: (&str, &str) = ("sup-7", "supervisor");
pub const ADMIN: (&str, &str) = ("admin-1", "admin");
pub const TECHNICIAN: (&str, &str) = ("tech-4", "technician");

/// Helper to create test app state with in-memory persistence.
pub fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        live: Arc::new(LiveEventBroadcaster::new()),
    }
}

/// Creates an office with `staff` active technicians.
pub async fn seed_office(
    state: &AppState,
    code: &str,
    staff: usize,
) -> (AreaId, Vec<TechnicianId>) {
    let mut persistence = state.persistence.lock().await;
    let area: AreaId = persistence
        .create_area(code, &format!("{code} office"))
        .unwrap()
        .id;
    let technicians: Vec<TechnicianId> = (0..staff)
        .map(|n| {
            persistence
                .create_technician(area, &format!("{code}-tech-{n}"), true)
                .unwrap()
                .id
        })
        .collect();
    (area, technicians)
}

/// Raises an unassigned complaint and returns its id.
pub async fn raise_complaint(state: &AppState, area: AreaId) -> i64 {
    state
        .persistence
        .lock()
        .await
        .create_complaint(area, Priority::Medium, datetime!(2026-05-11 07:45 UTC))
        .unwrap()
        .id
        .value()
}

/// Sends one request and returns the status with the decoded envelope.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    actor: Option<(&str, &str)>,
    body: Option<&Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((id, role)) = actor {
        builder = builder.header("x-actor-id", id).header("x-actor-role", role);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let envelope: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, envelope)
}

pub fn app_for(state: &AppState) -> Router {
    build_router(state.clone())
}
