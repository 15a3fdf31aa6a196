// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fieldops::CoreError;
use fieldops_domain::DomainError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor does not have permission.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The complaint's area has nobody to assign to.
    #[error("{message}")]
    NoTechnicianAvailable {
        /// A human-readable description.
        message: String,
    },
    /// An assignment rule was violated by the current state.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Concurrent writers kept winning.
    #[error("{message}")]
    ConcurrentModification {
        /// A human-readable description.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::EmptyReason => ApiError::InvalidInput {
            field: String::from("reason"),
            message,
        },
        DomainError::InvalidStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message,
        },
        DomainError::InvalidPriority(_) => ApiError::InvalidInput {
            field: String::from("priority"),
            message,
        },
        DomainError::ComplaintNotUnassigned { .. } => violation("complaint_not_unassigned", message),
        DomainError::ComplaintNotReassignable { .. } => {
            violation("complaint_not_reassignable", message)
        }
        DomainError::AlreadyAssignedToTechnician { .. } => {
            violation("already_assigned_to_technician", message)
        }
        DomainError::TechnicianOutsideArea { .. } => violation("technician_outside_area", message),
        DomainError::TechnicianInactive(_) => violation("technician_inactive", message),
        DomainError::ManagerOutsideArea { .. } => violation("manager_outside_area", message),
        DomainError::InvalidStatusTransition { .. } => {
            violation("invalid_status_transition", message)
        }
        DomainError::MissingActiveAssignment(_) => violation("missing_active_assignment", message),
    }
}

fn violation(rule: &str, message: String) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: rule.to_string(),
        message,
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    let message: String = err.to_string();
    match err {
        CoreError::NotFound { entity, .. } => ApiError::ResourceNotFound {
            resource_type: entity.to_string(),
            message,
        },
        CoreError::NoTechnicianAvailable(_) => ApiError::NoTechnicianAvailable { message },
        CoreError::InvalidState(domain_err) => translate_domain_error(domain_err),
        CoreError::ConcurrentModification { .. } => ApiError::ConcurrentModification { message },
        CoreError::Validation { field, message } => ApiError::InvalidInput {
            field: field.to_string(),
            message,
        },
        CoreError::Storage(msg) => ApiError::Internal { message: msg },
    }
}
