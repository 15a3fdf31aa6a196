// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor extraction for the server boundary.
//!
//! Identity is established upstream; requests arrive carrying the
//! operator's id and role in headers. This module turns those headers
//! into an `AuthenticatedActor` or rejects the request with 401.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use fieldops_api::{AuthenticatedActor, authenticate_stub};
use tracing::{debug, warn};

use crate::{AppState, envelope_error};

/// Header carrying the operator id.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Header carrying the operator role (`admin`, `supervisor` or `technician`).
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Extractor for the acting operator.
///
/// ```ignore
/// async fn my_handler(
///     RequestActor(actor): RequestActor,
/// ) -> Result<Json<ApiEnvelope<Response>>, HttpError> {
///     // actor: AuthenticatedActor
/// }
/// ```
pub struct RequestActor(pub AuthenticatedActor);

impl FromRequestParts<AppState> for RequestActor {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor_id: &str = header_value(parts, ACTOR_ID_HEADER)?;
        let role: &str = header_value(parts, ACTOR_ROLE_HEADER)?;

        let actor: AuthenticatedActor = authenticate_stub(actor_id, role).map_err(|e| {
            warn!(error = %e, "Actor authentication failed");
            SessionError::InvalidActor(e.to_string())
        })?;

        debug!(actor_id = %actor.id, role = %actor.role, "Actor authenticated");
        Ok(Self(actor))
    }
}

fn header_value<'a>(parts: &'a Parts, name: &'static str) -> Result<&'a str, SessionError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| {
            debug!(header = name, "Missing actor header");
            SessionError::MissingHeader(name)
        })?
        .to_str()
        .map_err(|_| {
            warn!(header = name, "Invalid actor header encoding");
            SessionError::InvalidHeader(name)
        })
}

/// Actor extraction errors, all answered with 401.
#[derive(Debug)]
pub enum SessionError {
    /// A required header is missing.
    MissingHeader(&'static str),
    /// A header is not valid visible ASCII.
    InvalidHeader(&'static str),
    /// The id or role was rejected.
    InvalidActor(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingHeader(name) => format!("Missing {name} header"),
            Self::InvalidHeader(name) => format!("Invalid {name} header encoding"),
            Self::InvalidActor(reason) => reason,
        };
        envelope_error(StatusCode::UNAUTHORIZED, message)
    }
}
