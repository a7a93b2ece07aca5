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

//! One cursor shape serves both the set's own internal iterator and the
//! external, caller-owned iterators — the only difference is who holds the
//! `Cursor` value. Every method here takes the set by shared reference and
//! never mutates it.

use super::slot::NULL;
use crate::alloc::Allocator;

use super::HullSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub(super) slot: u16,
    pub(super) offset: u64,
}

impl Cursor {
    /// A cursor positioned at the low sentinel, as if freshly reset.
    pub fn start() -> Self {
        Self { slot: 0, offset: 0 }
    }

    /// Yields the next element in ascending order, or `None` past the end.
    pub fn next<A: Allocator>(&mut self, set: &HullSet<A>) -> Option<u64> {
        loop {
            if self.slot == NULL {
                return None;
            }
            let s = set.slot(self.slot);
            if set.is_high_sentinel(self.slot) {
                return None;
            }
            let v = s.span_start + self.offset;
            if v < s.skip_start {
                self.offset += 1;
                return Some(v);
            }
            self.slot = s.next_slot;
            self.offset = 0;
        }
    }

    /// Yields the next maximal occupied run `[lo, hi)`, or `None` past the end.
    pub fn next_range<A: Allocator>(&mut self, set: &HullSet<A>) -> Option<(u64, u64)> {
        loop {
            if self.slot == NULL || set.is_high_sentinel(self.slot) {
                return None;
            }
            let s = set.slot(self.slot);
            let lo = s.span_start + self.offset;
            if lo < s.skip_start {
                let hi = s.skip_start;
                self.slot = s.next_slot;
                self.offset = 0;
                return Some((lo, hi));
            }
            self.slot = s.next_slot;
            self.offset = 0;
        }
    }

    /// Positions on the slot containing or immediately preceding `v`.
    /// Returns `true` (`InSet`) iff `v` falls inside that slot's run.
    pub fn seek_to<A: Allocator>(&mut self, set: &HullSet<A>, v: u64) -> bool {
        let s = set.locate(v);
        self.slot = s;
        self.offset = v - set.slot(s).span_start;
        v < set.slot(s).skip_start
    }

    /// Advances to `v` or the next element `>= v`. `*v` is updated in place
    /// when it had to be advanced; `changed` reports whether that happened.
    pub fn find<A: Allocator>(&mut self, set: &HullSet<A>, v: &mut u64, changed: &mut bool) -> bool {
        *changed = false;
        if self.seek_to(set, *v) {
            return true;
        }
        let s = set.slot(self.slot);
        let next = s.next_slot;
        if next == NULL || set.is_high_sentinel(next) {
            self.slot = NULL;
            return false;
        }
        self.slot = next;
        self.offset = 0;
        *v = set.slot(next).span_start;
        *changed = true;
        true
    }
}
