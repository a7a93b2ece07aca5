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

//! The slot record and the fixed geometry of the slot tables.
//!
//! Either a bit-packed `(34+15+15)` layout or plain fields satisfies the
//! externally observable behavior; this crate takes plain fields
//! (documented in DESIGN.md).

/// Reserved index meaning "no link".
pub const NULL: u16 = u16::MAX;

/// Slots per table. The top bits of an index select the table, the low 9
/// bits the offset within it.
pub const TABLE_LEN: usize = 512;
pub const TABLE_SHIFT: u32 = 9;

/// Hard ceiling: 64 tables of 512 slots.
pub const MAX_TABLES: usize = 64;
pub const MAX_SLOTS: usize = MAX_TABLES * TABLE_LEN;

/// One slot: an occupied run `[span_start, skip_start)`, plus its position
/// in the value-order chain and its bin chain. Free (unallocated-but-owned)
/// slots reuse `span_start` to thread the free list.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    pub span_start: u64,
    pub skip_start: u64,
    pub prev_slot: u16,
    pub next_slot: u16,
    pub skip_prev: u16,
    pub skip_next: u16,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            span_start: 0,
            skip_start: 0,
            prev_slot: NULL,
            next_slot: NULL,
            skip_prev: NULL,
            skip_next: NULL,
        }
    }
}

