// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries. Every function takes the connection explicitly and
//! returns domain values.

pub mod areas;
pub mod assignments;
pub mod complaints;
pub mod technicians;
