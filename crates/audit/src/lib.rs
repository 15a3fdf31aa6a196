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
    clippy::all
)]

use fieldops_domain::{ComplaintId, TechnicianId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Identifier recorded for assignments made by the engine itself.
pub const SYSTEM_ACTOR_ID: &str = "system";

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change:
/// an operator acting through the API, or the engine itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin", "supervisor", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// The actor recorded for automatic assignments.
    #[must_use]
    pub fn system() -> Self {
        Self {
            id: String::from(SYSTEM_ACTOR_ID),
            actor_type: String::from("system"),
        }
    }
}

/// One technician's custody of one complaint.
///
/// Records are append-only. The only permitted mutation is setting
/// `ended_at` exactly once, when the complaint is handed to someone else.
/// A record with `ended_at == None` is the complaint's open record; at most
/// one exists per complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    /// Storage identifier, `None` until persisted.
    pub record_id: Option<i64>,
    /// The complaint being handed over.
    pub complaint_id: ComplaintId,
    /// The technician taking custody.
    pub technician_id: TechnicianId,
    /// Identifier of the actor who made the assignment, or `"system"`.
    pub assigned_by: String,
    /// Free-text audit reason.
    pub reason: String,
    /// When custody started.
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    /// When custody ended.
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
}

impl AssignmentRecord {
    /// Creates an open record attributed to `actor`.
    #[must_use]
    pub fn open(
        complaint_id: ComplaintId,
        technician_id: TechnicianId,
        actor: &Actor,
        reason: String,
        started_at: OffsetDateTime,
    ) -> Self {
        Self {
            record_id: None,
            complaint_id,
            technician_id,
            assigned_by: actor.id.clone(),
            reason,
            started_at,
            ended_at: None,
        }
    }

    /// Returns whether this record still represents current custody.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Returns whether the engine created this record without an operator.
    #[must_use]
    pub fn is_automatic(&self) -> bool {
        self.assigned_by == SYSTEM_ACTOR_ID
    }
}
