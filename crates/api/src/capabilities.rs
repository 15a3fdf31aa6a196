// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation.
//!
//! Roles are resolved to capabilities once, and every authorization check
//! and the cross-area override read from the result instead of comparing
//! role names.

use crate::auth::{AuthenticatedActor, Role};
use crate::request_response::{AssignmentCapabilities, Capability};

/// Computes the assignment capabilities of an authenticated actor.
#[must_use]
pub const fn compute_capabilities(actor: &AuthenticatedActor) -> AssignmentCapabilities {
    match actor.role {
        Role::Admin => AssignmentCapabilities {
            can_assign: Capability::Allowed,
            can_reassign: Capability::Allowed,
            can_override_area: Capability::Allowed,
            can_transition_status: Capability::Allowed,
            can_manage_areas: Capability::Allowed,
        },
        Role::Supervisor => AssignmentCapabilities {
            can_assign: Capability::Allowed,
            can_reassign: Capability::Allowed,
            can_override_area: Capability::Denied,
            can_transition_status: Capability::Allowed,
            can_manage_areas: Capability::Denied,
        },
        Role::Technician => AssignmentCapabilities {
            can_assign: Capability::Denied,
            can_reassign: Capability::Denied,
            can_override_area: Capability::Denied,
            can_transition_status: Capability::Allowed,
            can_manage_areas: Capability::Denied,
        },
    }
}
