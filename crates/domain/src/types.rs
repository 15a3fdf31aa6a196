// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a persisted numeric identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the underlying numeric identifier.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id! {
    /// Canonical identifier of a field-service complaint.
    ComplaintId
}

entity_id! {
    /// Canonical identifier of a technician (staff member).
    ///
    /// The derived `Ord` is the identity order used as the final
    /// assignment tie-breaker.
    TechnicianId
}

entity_id! {
    /// Canonical identifier of a service area (office).
    AreaId
}

/// Lifecycle status of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    /// Created by intake, waiting for a technician.
    Unassigned,
    /// A technician has been assigned but has not started work.
    Assigned,
    /// The assigned technician is working on the complaint.
    InProgress,
    /// Work is paused.
    OnHold,
    /// The fault has been fixed.
    Resolved,
    /// The complaint is closed and archived.
    Closed,
}

impl ComplaintStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Unassigned,
        Self::Assigned,
        Self::InProgress,
        Self::OnHold,
        Self::Resolved,
        Self::Closed,
    ];

    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::OnHold => "on_hold",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Returns whether a complaint in this status may receive a first assignment.
    #[must_use]
    pub const fn accepts_assignment(&self) -> bool {
        matches!(self, Self::Unassigned)
    }

    /// Returns whether a complaint in this status counts toward its
    /// technician's workload and may be reassigned.
    #[must_use]
    pub const fn holds_active_assignment(&self) -> bool {
        matches!(self, Self::Assigned | Self::InProgress)
    }

    /// Returns whether the complaint's field work is finished.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

impl FromStr for ComplaintStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unassigned" => Ok(Self::Unassigned),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "on_hold" => Ok(Self::OnHold),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Urgency of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Every priority, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Converts this priority to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(DomainError::InvalidPriority(s.to_string())),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field-service complaint as seen by the assignment engine.
///
/// `version` increases by one on every committed write and is the
/// compare-and-swap token for optimistic concurrency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complaint {
    /// The canonical identifier.
    pub id: ComplaintId,
    /// The area the complaint was raised in.
    pub area_id: AreaId,
    /// The currently assigned technician, if any.
    pub assigned_technician_id: Option<TechnicianId>,
    /// The lifecycle status.
    pub status: ComplaintStatus,
    /// The urgency.
    pub priority: Priority,
    /// When intake created the complaint.
    pub created_at: OffsetDateTime,
    /// When the complaint reached `resolved`.
    pub resolved_at: Option<OffsetDateTime>,
    /// Optimistic concurrency token.
    pub version: i64,
}

impl Complaint {
    /// Creates a freshly raised, unassigned complaint.
    #[must_use]
    pub const fn new_unassigned(
        id: ComplaintId,
        area_id: AreaId,
        priority: Priority,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            area_id,
            assigned_technician_id: None,
            status: ComplaintStatus::Unassigned,
            priority,
            created_at,
            resolved_at: None,
            version: 0,
        }
    }

    /// Checks the technician/status invariant.
    ///
    /// A technician is present exactly when the complaint has left
    /// `unassigned`, except for complaints closed without ever being assigned.
    #[must_use]
    pub const fn is_assignment_consistent(&self) -> bool {
        match (self.status, self.assigned_technician_id) {
            (ComplaintStatus::Unassigned, technician) => technician.is_none(),
            (ComplaintStatus::Closed, _) => true,
            (_, technician) => technician.is_some(),
        }
    }

    /// Resolution time in seconds, when both timestamps are known.
    #[must_use]
    pub fn resolution_seconds(&self) -> Option<i64> {
        self.resolved_at
            .map(|resolved_at| (resolved_at - self.created_at).whole_seconds())
    }
}

/// A technician who can receive complaint assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    /// The canonical identifier.
    pub id: TechnicianId,
    /// The area the technician works in.
    pub area_id: AreaId,
    /// Display name.
    pub name: String,
    /// Inactive technicians are never auto-assigned.
    pub active: bool,
}

impl Technician {
    /// Creates a technician record.
    #[must_use]
    pub const fn new(id: TechnicianId, area_id: AreaId, name: String, active: bool) -> Self {
        Self {
            id,
            area_id,
            name,
            active,
        }
    }
}

/// A service area with at most one manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// The canonical identifier.
    pub id: AreaId,
    /// Short area code (e.g., "NORTH").
    pub code: String,
    /// Display name.
    pub name: String,
    /// The managing technician, if one has been appointed.
    pub manager_id: Option<TechnicianId>,
}

impl Area {
    /// Creates an area record.
    #[must_use]
    pub const fn new(
        id: AreaId,
        code: String,
        name: String,
        manager_id: Option<TechnicianId>,
    ) -> Self {
        Self {
            id,
            code,
            name,
            manager_id,
        }
    }
}
