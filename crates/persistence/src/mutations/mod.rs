// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! `assignments` holds the guarded commits used by the engine; `intake`
//! holds the plain inserts used for seeding areas, staff and complaints.

pub mod assignments;
pub mod intake;
