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

//! HullSet — a bounded-memory, lossy ordered set of 34-bit integers.
//!
//! It never grows past a configured slot budget: once that budget is
//! spent, inserting a value that would need a fresh slot instead widens an
//! existing run to cover it, so membership queries may return false
//! positives for values that were never added but never false negatives
//! for values that were (the "hull" property).

mod bins;
mod cursor;
mod slot;

#[cfg(test)]
mod tests;

pub use cursor::Cursor;
use bins::{bin_index, BIN_COUNT};
use slot::{Slot, MAX_SLOTS, MAX_TABLES, NULL, TABLE_LEN, TABLE_SHIFT};

use crate::{
    alloc::{Allocator, Global, Layout},
    error::Error,
    logger::Logger,
};
use core::ptr::NonNull;

/// `2^34`, the span domain: every `span_start`/`skip_start` (sentinels
/// included) falls in `[0, MAX_VALUE]`.
pub const MAX_VALUE: u64 = 1 << 34;

/// Exclusive upper bound on values a caller may `add` (`v` must fall in
/// `[0, 2^34 - 1)`). Kept strictly below [`MAX_VALUE`] so `v + 1` can never
/// reach the high sentinel's `span_start`, which would otherwise require
/// merging the permanent sentinel away.
pub const MAX_ADDABLE: u64 = MAX_VALUE - 1;

/// Low sentinel: permanently at index 0.
const SENTINEL_LOW: u16 = 0;
/// High sentinel: permanently at index 1.
const SENTINEL_HIGH: u16 = 1;

fn slot_table_layout() -> Layout {
    Layout::new::<[Slot; TABLE_LEN]>()
}

pub struct HullSet<A: Allocator = Global> {
    alloc: A,
    tables: Vec<NonNull<[Slot; TABLE_LEN]>>,
    bins: [u16; BIN_COUNT],
    free_head: u16,
    /// high-water count of slots ever handed out (sentinels included)
    slot_n: u16,
    slot_max: u16,
    last_used: u16,
    cursor: Cursor,
    logger: Box<dyn Logger>,
}

impl HullSet<Global> {
    /// Convenience constructor using the process allocator and an
    /// [`crate::logger::EnvLogger`]-compatible handle.
    pub fn create_default(logger: impl Logger + 'static, n: usize) -> Result<Self, Error> {
        Self::create(Global, logger, n)
    }
}

impl<A: Allocator> HullSet<A> {
    /// `n` is clamped into `[3, 32768]`. Two sentinel slots are
    /// pre-allocated; construction fails only if the first table cannot be
    /// allocated.
    pub fn create(alloc: A, logger: impl Logger + 'static, n: usize) -> Result<Self, Error> {
        let slot_max = n.clamp(3, MAX_SLOTS) as u16;
        let mut set = Self {
            alloc,
            tables: Vec::new(),
            bins: [NULL; BIN_COUNT],
            free_head: NULL,
            slot_n: 0,
            slot_max,
            last_used: SENTINEL_LOW,
            cursor: Cursor::start(),
            logger: Box::new(logger),
        };
        set.grow_table()?;
        set.slot_n = 2;
        *set.slot_mut(SENTINEL_LOW) = Slot {
            span_start: 0,
            skip_start: 0,
            prev_slot: NULL,
            next_slot: SENTINEL_HIGH,
            skip_prev: NULL,
            skip_next: NULL,
        };
        *set.slot_mut(SENTINEL_HIGH) = Slot {
            span_start: MAX_VALUE,
            skip_start: MAX_VALUE,
            prev_slot: SENTINEL_LOW,
            next_slot: NULL,
            skip_prev: NULL,
            skip_next: NULL,
        };
        Ok(set)
    }

    /// Releases all owned tables. Equivalent to dropping the set; exists
    /// for explicit lifecycle parity with the construction API.
    pub fn destroy(self) {}

    #[inline]
    pub(crate) fn is_high_sentinel(&self, idx: u16) -> bool {
        idx == SENTINEL_HIGH
    }

    #[inline]
    fn is_sentinel(idx: u16) -> bool {
        idx == SENTINEL_LOW || idx == SENTINEL_HIGH
    }

    #[inline]
    pub(crate) fn slot(&self, idx: u16) -> &Slot {
        let t = (idx as usize) >> TABLE_SHIFT;
        let o = (idx as usize) & (TABLE_LEN - 1);
        unsafe { &(*self.tables[t].as_ptr())[o] }
    }

    #[inline]
    fn slot_mut(&mut self, idx: u16) -> &mut Slot {
        let t = (idx as usize) >> TABLE_SHIFT;
        let o = (idx as usize) & (TABLE_LEN - 1);
        unsafe { &mut (*self.tables[t].as_ptr())[o] }
    }

    fn grow_table(&mut self) -> Result<(), Error> {
        if self.tables.len() >= MAX_TABLES {
            return Err(Error::OutOfMemory);
        }
        let layout = slot_table_layout();
        let raw = self.alloc.allocate(layout).map_err(|_| Error::OutOfMemory)?;
        let ptr = raw.cast::<[Slot; TABLE_LEN]>();
        unsafe {
            ptr.as_ptr().write([Slot::default(); TABLE_LEN]);
        }
        self.tables.push(ptr);
        Ok(())
    }

    /// Allocates a slot for a gap of the given `distance` width. `distance`
    /// is the width of the gap the caller would otherwise have to widen if
    /// no slot can be had; only strictly smaller gaps may be sacrificed to
    /// satisfy a request, which keeps the sacrifice from ever being worse
    /// than the degrade the caller would do itself.
    fn slot_alloc(&mut self, distance: u64) -> Option<u16> {
        if self.free_head != NULL {
            let idx = self.free_head;
            self.free_head = self.slot(idx).span_start as u16;
            return Some(idx);
        }
        if (self.slot_n as usize) < (self.slot_max as usize) {
            let needed_table = (self.slot_n as usize) >> TABLE_SHIFT;
            if needed_table >= self.tables.len() && self.grow_table().is_err() {
                // fall through to bin sacrifice below
            } else {
                let idx = self.slot_n;
                self.slot_n += 1;
                return Some(idx);
            }
        }
        let ceiling = bin_index(distance);
        if ceiling == 0 {
            return None;
        }
        for b in 0..ceiling {
            let mut cand = self.bins[b];
            while cand != NULL {
                if self.sacrificeable(cand) {
                    return Some(self.sacrifice(cand));
                }
                cand = self.slot(cand).skip_next;
            }
        }
        None
    }

    /// A slot can only be dropped by folding its run into a live neighbor.
    /// The high sentinel's `span_start` is permanently pinned at
    /// `MAX_VALUE` (§3.2), so a slot whose successor is the high sentinel
    /// can only be folded backward into its predecessor — and if that
    /// predecessor is itself the low sentinel, this is the only real slot
    /// left and can't be dropped at all.
    fn sacrificeable(&self, idx: u16) -> bool {
        let s = self.slot(idx);
        !(s.next_slot == SENTINEL_HIGH && Self::is_sentinel(s.prev_slot))
    }

    /// Drops `victim` (found via [`Self::sacrificeable`]), folding its run
    /// into a live neighbor and returning its index for immediate reuse.
    /// Normally that neighbor is the successor, whose `span_start` shifts
    /// left to swallow the removed slot's run; when the successor is the
    /// high sentinel, `victim` is folded into its predecessor instead, so
    /// the sentinel's pinned fields are never touched.
    fn sacrifice(&mut self, victim: u16) -> u16 {
        self.unchain_bin(victim);
        let (prev, next, span, skip) = {
            let s = self.slot(victim);
            (s.prev_slot, s.next_slot, s.span_start, s.skip_start)
        };
        if next == SENTINEL_HIGH {
            debug_assert!(
                !Self::is_sentinel(prev),
                "sacrifice() called on an unsacrificeable slot"
            );
            self.slot_mut(prev).skip_start = skip;
            self.slot_mut(prev).next_slot = next;
            self.slot_mut(next).prev_slot = prev;
            self.rebin(prev);
        } else {
            self.slot_mut(next).span_start = span;
            self.slot_mut(prev).next_slot = next;
            self.slot_mut(next).prev_slot = prev;
            if !Self::is_sentinel(prev) {
                self.rebin(prev);
            }
        }
        victim
    }

    fn push_free(&mut self, idx: u16) {
        self.slot_mut(idx).span_start = self.free_head as u64;
        self.free_head = idx;
    }

    fn unchain_bin(&mut self, idx: u16) {
        let (sp, sn) = {
            let s = self.slot(idx);
            (s.skip_prev, s.skip_next)
        };
        if sp == NULL {
            for b in self.bins.iter_mut() {
                if *b == idx {
                    *b = sn;
                    break;
                }
            }
        } else {
            self.slot_mut(sp).skip_next = sn;
        }
        if sn != NULL {
            self.slot_mut(sn).skip_prev = sp;
        }
        let s = self.slot_mut(idx);
        s.skip_prev = NULL;
        s.skip_next = NULL;
    }

    fn chain_bin(&mut self, idx: u16, bin: usize) {
        let head = self.bins[bin];
        {
            let s = self.slot_mut(idx);
            s.skip_next = head;
            s.skip_prev = NULL;
        }
        if head != NULL {
            self.slot_mut(head).skip_prev = idx;
        }
        self.bins[bin] = idx;
    }

    /// Re-files `idx` (which must be a non-sentinel, live slot) into the
    /// bin matching its current gap to its successor.
    fn rebin(&mut self, idx: u16) {
        self.unchain_bin(idx);
        let next = self.slot(idx).next_slot;
        let width = self.slot(next).span_start - self.slot(idx).skip_start;
        let bin = bin_index(width);
        self.chain_bin(idx, bin);
    }

    fn rebin_if_real(&mut self, idx: u16) {
        if !Self::is_sentinel(idx) {
            self.rebin(idx);
        }
    }

    /// Locates the slot whose run contains `v`, or the nearest slot at or
    /// below `v` if none does. The heuristic walks forward from whichever
    /// of `last_used`/slot 0 is not already past `v`.
    pub(crate) fn locate(&self, v: u64) -> u16 {
        let mut cur = if self.slot(self.last_used).span_start <= v {
            self.last_used
        } else {
            SENTINEL_LOW
        };
        loop {
            let next = self.slot(cur).next_slot;
            if next == NULL || self.slot(next).span_start > v {
                return cur;
            }
            cur = next;
        }
    }

    /// `v ∈ [0, 2^34 - 1)`. Idempotent: re-adding an already-covered value
    /// is a no-op. May widen unrelated gaps (the hull property).
    ///
    /// `s` (located below) is never the high sentinel (its `span_start` is
    /// `MAX_VALUE`, strictly above every addable `v`), but it may be the low
    /// sentinel — whose `span_start`/`skip_start` must stay pinned at `0`.
    /// So "extend `s`'s run" is only available when `s` is real; when `s`
    /// is the sentinel, a value flush against it always takes the
    /// allocate-or-degrade path below instead of widening the sentinel.
    pub fn add(&mut self, v: u64) {
        debug_assert!(v < MAX_ADDABLE, "add() out of domain: v must be < 2^34 - 1");
        let s = self.locate(v);
        let skip_start = self.slot(s).skip_start;

        if v < skip_start {
            self.last_used = s;
            return;
        }

        let next = self.slot(s).next_slot;
        let next_span = self.slot(next).span_start;
        let s_is_real = !Self::is_sentinel(s);
        let next_is_real = !Self::is_sentinel(next);

        if v == skip_start && s_is_real {
            if v + 1 == next_span {
                self.merge_into(s, next);
            } else {
                self.slot_mut(s).skip_start = v + 1;
                self.rebin_if_real(s);
            }
            self.last_used = s;
            return;
        }

        if v + 1 == next_span && next_is_real {
            self.slot_mut(next).span_start = v;
            self.rebin_if_real(s);
            self.last_used = next;
            return;
        }

        let left_gap = v - skip_start;
        let right_gap = next_span - (v + 1);
        let distance = left_gap.min(right_gap);
        match self.slot_alloc(distance) {
            Some(idx) => {
                *self.slot_mut(idx) = Slot {
                    span_start: v,
                    skip_start: v + 1,
                    prev_slot: s,
                    next_slot: next,
                    skip_prev: NULL,
                    skip_next: NULL,
                };
                self.slot_mut(s).next_slot = idx;
                self.slot_mut(next).prev_slot = idx;
                self.rebin_if_real(s);
                self.rebin_if_real(idx);
                self.last_used = idx;
            }
            None => {
                // both sides may be sentinels only while `slot_max` is
                // exhausted with zero real slots in between, which cannot
                // happen: `slot_max` is clamped >= 3, so room for at least
                // one real slot always exists before degrade is reachable.
                if s_is_real && (!next_is_real || left_gap <= right_gap) {
                    self.slot_mut(s).skip_start = v + 1;
                } else {
                    debug_assert!(next_is_real, "cannot degrade into a sentinel");
                    self.slot_mut(next).span_start = v;
                }
                self.rebin_if_real(s);
                self.last_used = s;
            }
        }
    }

    /// Collapses `next`'s run into `s`, freeing `next`.
    fn merge_into(&mut self, s: u16, next: u16) {
        debug_assert!(!Self::is_sentinel(next), "cannot free a sentinel slot");
        let (next_skip, next_next) = {
            let n = self.slot(next);
            (n.skip_start, n.next_slot)
        };
        if !Self::is_sentinel(next) {
            self.unchain_bin(next);
        }
        self.slot_mut(s).skip_start = next_skip;
        self.slot_mut(s).next_slot = next_next;
        self.slot_mut(next_next).prev_slot = s;
        self.push_free(next);
        self.rebin_if_real(s);
    }

    /// Equivalent to `for v in lo..hi { self.add(v) }`.
    pub fn add_range(&mut self, lo: u64, hi: u64) {
        for v in lo..hi {
            self.add(v);
        }
    }

    /// Adds every range reported by `src`'s iteration to `self`.
    pub fn add_hullset<B: Allocator>(&mut self, src: &HullSet<B>) {
        let mut cur = Cursor::start();
        while let Some((lo, hi)) = cur.next_range(src) {
            self.add_range(lo, hi);
        }
    }

    pub fn seek_to(&mut self, v: u64) -> bool {
        self.cursor.seek_to(self, v)
    }

    pub fn find(&mut self, v: &mut u64, changed: &mut bool) -> bool {
        // split borrow: Cursor::find only needs `&HullSet`, but the cursor
        // itself lives on `self`
        let mut c = self.cursor;
        let r = c.find(self, v, changed);
        self.cursor = c;
        r
    }

    pub fn next(&mut self) -> Option<u64> {
        let mut c = self.cursor;
        let r = c.next(self);
        self.cursor = c;
        r
    }

    pub fn next_range(&mut self) -> Option<(u64, u64)> {
        let mut c = self.cursor;
        let r = c.next_range(self);
        self.cursor = c;
        r
    }

    pub fn reset(&mut self) {
        self.cursor = Cursor::start();
    }

    /// Sum of `(skip_start - span_start)` over every non-sentinel slot.
    pub fn count(&self) -> u64 {
        let mut total = 0u64;
        let mut cur = self.slot(SENTINEL_LOW).next_slot;
        while cur != NULL && !self.is_high_sentinel(cur) {
            let s = self.slot(cur);
            total += s.skip_start - s.span_start;
            cur = s.next_slot;
        }
        total
    }

    pub fn is_singleton(&self) -> bool {
        self.count() <= 1
    }

    /// Number of slots ever handed out (sentinels included); never exceeds
    /// the configured maximum.
    pub fn slot_count(&self) -> usize {
        self.slot_n as usize
    }

    /// Best-effort, abbreviated text form: comma-separated `lo-hi` runs,
    /// truncated with a trailing `...` if it would exceed `max_len`.
    pub fn to_text(&self, max_len: usize) -> String {
        let mut out = String::new();
        let mut cur = Cursor::start();
        let mut first = true;
        while let Some((lo, hi)) = cur.next_range(self) {
            if !first {
                out.push(',');
            }
            first = false;
            use core::fmt::Write;
            write!(out, "{lo:x}-{hi:x}").unwrap();
            if out.len() > max_len {
                out.truncate(max_len);
                out.push_str("...");
                break;
            }
        }
        out
    }
}

impl<A: Allocator> Drop for HullSet<A> {
    fn drop(&mut self) {
        let layout = slot_table_layout();
        for t in self.tables.drain(..) {
            unsafe {
                self.alloc.deallocate(t.cast(), layout);
            }
        }
    }
}
