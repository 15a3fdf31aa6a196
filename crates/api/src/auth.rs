// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use fieldops::{AreaOverride, AssignmentAuthority};
use fieldops_audit::Actor;
use std::str::FromStr;

use crate::capabilities::compute_capabilities;
use crate::error::AuthError;
use crate::request_response::{AssignmentCapabilities, Capability};

/// Actor roles for authorization.
///
/// Roles apply to back-office operators, not to the technicians that
/// complaints are assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: every operation, including assignment across areas and
    /// area manager changes.
    Admin,
    /// Supervisor role: assignment and reassignment within a complaint's
    /// own area, plus status changes.
    Supervisor,
    /// Technician role: read-only access plus status changes on complaints.
    Technician,
}

impl Role {
    /// Returns the role name used in audit records and headers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Technician => "technician",
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "supervisor" => Ok(Self::Supervisor),
            "technician" => Ok(Self::Technician),
            other => Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown role '{other}'"),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this actor into the audit actor recorded on assignments.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), String::from(self.role.as_str()))
    }

    /// Builds the authority passed to manual assignment and reassignment.
    ///
    /// The area override is granted only when the actor's capabilities
    /// allow assignment outside the complaint's area.
    #[must_use]
    pub fn authority(&self) -> AssignmentAuthority {
        let capabilities: AssignmentCapabilities = compute_capabilities(self);
        AssignmentAuthority::new(
            self.to_audit_actor(),
            AreaOverride::from_bool(capabilities.can_override_area.is_allowed()),
        )
    }
}

/// Stub authentication.
///
/// Trusts the identity and role the caller presents. Real authentication
/// happens in front of this service.
///
/// # Errors
///
/// Returns an error if the actor id is empty or the role is unknown.
pub fn authenticate_stub(actor_id: &str, role: &str) -> Result<AuthenticatedActor, AuthError> {
    let actor_id: &str = actor_id.trim();
    if actor_id.is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    if actor_id == fieldops_audit::SYSTEM_ACTOR_ID {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("The system actor cannot authenticate"),
        });
    }
    Ok(AuthenticatedActor::new(actor_id.to_string(), role.parse()?))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may run automatic or manual assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is a technician.
    pub fn authorize_assign(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(
            compute_capabilities(actor).can_assign,
            "assign_complaint",
            "Admin or Supervisor",
        )
    }

    /// Checks if an actor may reassign a complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is a technician.
    pub fn authorize_reassign(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(
            compute_capabilities(actor).can_reassign,
            "reassign_complaint",
            "Admin or Supervisor",
        )
    }

    /// Checks if an actor may change a complaint's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor lacks the capability.
    pub fn authorize_transition_status(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(
            compute_capabilities(actor).can_transition_status,
            "transition_status",
            "Admin, Supervisor or Technician",
        )
    }

    /// Checks if an actor may appoint area managers.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin.
    pub fn authorize_manage_areas(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(
            compute_capabilities(actor).can_manage_areas,
            "assign_area_manager",
            "Admin",
        )
    }

    fn require(
        capability: Capability,
        action: &str,
        required_role: &str,
    ) -> Result<(), AuthError> {
        if capability.is_allowed() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: required_role.to_string(),
            })
        }
    }
}
