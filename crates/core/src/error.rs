// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_domain::{AreaId, ComplaintId, DomainError};
use thiserror::Error;

/// Errors returned by assignment engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of entity (e.g., "Complaint").
        entity: &'static str,
        /// The identifier that was looked up.
        id: i64,
    },
    /// The complaint's area has no active technician.
    #[error("No active technician available in area {0}")]
    NoTechnicianAvailable(AreaId),
    /// The operation conflicts with the stored state.
    #[error("{0}")]
    InvalidState(DomainError),
    /// Every compare-and-swap attempt lost to a concurrent writer.
    #[error("Complaint {complaint_id} was modified concurrently ({attempts} attempts)")]
    ConcurrentModification {
        /// The contended complaint.
        complaint_id: ComplaintId,
        /// How many commits were attempted.
        attempts: u32,
    },
    /// Malformed input.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },
    /// The backing store failed.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl CoreError {
    /// Returns the taxonomy tag for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NoTechnicianAvailable(_) => ErrorKind::NoTechnicianAvailable,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::ConcurrentModification { .. } => ErrorKind::ConcurrentModification,
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::Storage(_) => ErrorKind::StorageFailure,
        }
    }

    pub(crate) const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub(crate) fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        let field: &'static str = match &err {
            DomainError::EmptyReason => "reason",
            DomainError::InvalidStatus(_) => "status",
            DomainError::InvalidPriority(_) => "priority",
            _ => return Self::InvalidState(err),
        };
        Self::Validation {
            field,
            message: err.to_string(),
        }
    }
}

/// The error taxonomy reported to callers and in batch results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    NoTechnicianAvailable,
    InvalidState,
    ConcurrentModification,
    ValidationError,
    StorageFailure,
}

impl ErrorKind {
    /// The tag string used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::NoTechnicianAvailable => "NoTechnicianAvailable",
            Self::InvalidState => "InvalidState",
            Self::ConcurrentModification => "ConcurrentModification",
            Self::ValidationError => "ValidationError",
            Self::StorageFailure => "StorageFailure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
