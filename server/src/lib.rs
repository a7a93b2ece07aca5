/*
 * Created on Mon Jul 27 2026
 *
 * This file is a part of Skytable
 * Skytable (formerly known as TerrabaseDB or Skybase) is a free and open-source
 * NoSQL database written by Sayan Nandan ("the Author") with the
 * vision to provide flexibility in data modelling without compromising
 * on performance, queryability or scalability.
 *
 * Copyright (c) 2026, Sayan Nandan <ohsayan@outlook.com>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! `graphd` — the identifier-remapping and bounded-memory set engine behind
//! a graph database's replica merge path.
//!
//! Two independent cores live here:
//! - [`grmap`]: a hierarchical range map that rewrites 48-bit database
//!   identifiers when merging serial streams from replicas.
//! - [`hullset`]: a bounded-memory, lossy ordered-integer set used to track
//!   which serials within a stream have already been applied.
//!
//! Both are single-threaded, allocator- and logger-parametric, and carry no
//! process-global state (see `DESIGN.md`).

pub mod alloc;
pub mod config;
pub mod dateline;
pub mod error;
pub mod grmap;
pub mod guid;
pub mod hullset;
pub mod logger;

pub use dateline::Dateline;
pub use error::Error;
pub use grmap::Grmap;
pub use guid::{Dbid, Guid};
pub use hullset::HullSet;
