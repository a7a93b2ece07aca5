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

use super::{
    overlap,
    range::Range,
    table::{Table, TableSlot},
};
use crate::{
    error::Error,
    guid::Dbid,
};

/// Every [`Table`] for one source DBID.
#[derive(Debug, Clone)]
pub struct DbidSlot {
    pub dbid: Dbid,
    pub tables: Vec<TableSlot>,
}

impl DbidSlot {
    pub fn new(dbid: Dbid) -> Self {
        Self {
            dbid,
            tables: Vec::new(),
        }
    }

    pub fn map(&self, serial: u64) -> Option<Range> {
        if self.tables.is_empty() {
            return None;
        }
        let pos = self.tables.partition_point(|t| t.low <= serial);
        let ti = pos.saturating_sub(1);
        self.tables[ti].table.search(serial).ok().map(|i| self.tables[ti].table.ranges[i])
    }

    pub fn ranges(&self) -> impl Iterator<Item = &Range> {
        self.tables.iter().flat_map(|ts| ts.table.ranges.iter())
    }

    /// `add_range` phases 2+3 for this one DBID: scan for conflicting
    /// overlaps (no mutation on failure), then fill whatever gaps remain.
    pub fn add_range(
        &mut self,
        lo: u64,
        hi: u64,
        dest_dbid: Dbid,
        offset: i64,
        table_size: usize,
    ) -> Result<(), Error> {
        let gaps = overlap::scan_for_gaps(self, lo, hi, dest_dbid, offset)?;
        for (glo, ghi) in gaps {
            self.insert_gap(glo, ghi, dest_dbid, offset, table_size);
        }
        Ok(())
    }

    /// Inserts a range known not to overlap anything, merging with
    /// adjacent ranges where possible.
    fn insert_gap(&mut self, lo: u64, hi: u64, dest_dbid: Dbid, offset: i64, table_size: usize) {
        if self.tables.is_empty() {
            self.tables.push(TableSlot {
                low: lo,
                table: Table {
                    ranges: vec![Range::new(lo, hi, dest_dbid, offset)],
                },
            });
            return;
        }

        let pos = self.tables.partition_point(|t| t.low <= lo);
        if pos == 0 {
            // the gap lies entirely before the first table
            let first = &self.tables[0].table;
            if !first.is_empty() && first.ranges[0].low == hi {
                let mergeable = first.ranges[0].dest_dbid == dest_dbid
                    && first.ranges[0].offset == offset
                    && first.ranges[0].low == hi;
                if mergeable {
                    self.tables[0].table.ranges[0].low = lo;
                    self.tables[0].refresh_low();
                    return;
                }
            }
            if self.tables[0].table.len() < table_size {
                self.tables[0].table.ranges.insert(0, Range::new(lo, hi, dest_dbid, offset));
                self.tables[0].refresh_low();
                self.repack(0, 0);
            } else if self.tables[0].table.len() <= 1 {
                // `table_size == 1`: a 1-element table is already full and
                // splitting it can't make room (both halves can't be
                // non-empty), so open a fresh table before it instead.
                self.insert_solo_table(0, lo, hi, dest_dbid, offset);
                self.repack(0, 0);
            } else {
                self.split_table(0);
                self.insert_gap(lo, hi, dest_dbid, offset, table_size);
            }
            return;
        }

        let ti = pos - 1;
        let idx = match self.tables[ti].table.search(lo) {
            Ok(_) => unreachable!("insert_gap called on a range already covered"),
            Err(idx) => idx,
        };

        let pred = if idx > 0 {
            Some((ti, idx - 1))
        } else if ti > 0 {
            let prev_len = self.tables[ti - 1].table.len();
            if prev_len > 0 {
                Some((ti - 1, prev_len - 1))
            } else {
                None
            }
        } else {
            None
        };
        let succ = if idx < self.tables[ti].table.len() {
            Some((ti, idx))
        } else if ti + 1 < self.tables.len() && !self.tables[ti + 1].table.is_empty() {
            Some((ti + 1, 0))
        } else {
            None
        };

        if let Some((pt, pi)) = pred {
            let p = self.tables[pt].table.ranges[pi];
            if p.high == lo && p.dest_dbid == dest_dbid && p.offset == offset {
                self.tables[pt].table.ranges[pi].high = hi;
                self.repack(pt, pi);
                return;
            }
        }
        if let Some((st, si)) = succ {
            let s = self.tables[st].table.ranges[si];
            if s.low == hi && s.dest_dbid == dest_dbid && s.offset == offset {
                self.tables[st].table.ranges[si].low = lo;
                if si == 0 {
                    self.tables[st].refresh_low();
                }
                self.repack(st, si);
                return;
            }
        }

        if self.tables[ti].table.len() < table_size {
            self.tables[ti].table.ranges.insert(idx, Range::new(lo, hi, dest_dbid, offset));
            if idx == 0 {
                self.tables[ti].refresh_low();
            }
            self.repack(ti, idx);
        } else if self.tables[ti].table.len() <= 1 {
            // same degenerate `table_size == 1` case as above: `idx` is
            // either 0 (new range sorts before the lone existing one) or 1
            // (sorts after it), so the fresh table goes on the matching side.
            let at = if idx == 0 { ti } else { ti + 1 };
            self.insert_solo_table(at, lo, hi, dest_dbid, offset);
            self.repack(at, 0);
        } else {
            self.split_table(ti);
            self.insert_gap(lo, hi, dest_dbid, offset, table_size);
        }
    }

    /// Inserts a brand-new single-range table at table-array index `at`.
    /// Used only when the neighboring table is already at capacity with
    /// exactly one range (`table_size == 1`), where splitting that table
    /// cannot create room.
    fn insert_solo_table(&mut self, at: usize, lo: u64, hi: u64, dest_dbid: Dbid, offset: i64) {
        self.tables.insert(
            at,
            TableSlot {
                low: lo,
                table: Table {
                    ranges: vec![Range::new(lo, hi, dest_dbid, offset)],
                },
            },
        );
    }

    /// Allocates a new table right after `ti`, moving the upper half of
    /// `ti`'s ranges into it.
    fn split_table(&mut self, ti: usize) {
        let mid = self.tables[ti].table.ranges.len() / 2;
        let upper = self.tables[ti].table.ranges.split_off(mid);
        let new_low = upper.first().map(|r| r.low).unwrap_or(u64::MAX);
        self.tables.insert(
            ti + 1,
            TableSlot {
                low: new_low,
                table: Table { ranges: upper },
            },
        );
    }

    /// An explicit loop rather than tail recursion; each pass strictly
    /// reduces the number of ranges or terminates, so it always halts.
    fn repack(&mut self, mut ti: usize, mut i: usize) {
        loop {
            self.tables[ti].refresh_low();

            while i + 1 < self.tables[ti].table.len() {
                let (mergeable, new_high) = {
                    let ranges = &self.tables[ti].table.ranges;
                    (ranges[i].mergeable_with(&ranges[i + 1]), ranges[i + 1].high)
                };
                if !mergeable {
                    break;
                }
                self.tables[ti].table.ranges[i].high = new_high;
                self.tables[ti].table.ranges.remove(i + 1);
            }
            while i > 0 {
                let ranges = &self.tables[ti].table.ranges;
                if !ranges[i - 1].mergeable_with(&ranges[i]) {
                    break;
                }
                let new_high = ranges[i].high;
                self.tables[ti].table.ranges[i - 1].high = new_high;
                self.tables[ti].table.ranges.remove(i);
                i -= 1;
            }
            self.tables[ti].refresh_low();

            let mut changed = false;

            if i == 0 && ti > 0 {
                let mergeable = {
                    let prev = self.tables[ti - 1].table.ranges.last();
                    let this = self.tables[ti].table.ranges.first();
                    matches!((prev, this), (Some(p), Some(c)) if p.mergeable_with(c))
                };
                if mergeable {
                    let new_high = self.tables[ti].table.ranges[0].high;
                    let plen = self.tables[ti - 1].table.len();
                    self.tables[ti - 1].table.ranges[plen - 1].high = new_high;
                    self.tables[ti].table.ranges.remove(0);
                    if self.tables[ti].table.is_empty() {
                        self.tables.remove(ti);
                    } else {
                        self.tables[ti].refresh_low();
                    }
                    ti -= 1;
                    i = self.tables[ti].table.len() - 1;
                    changed = true;
                }
            }

            if !changed
                && i + 1 == self.tables[ti].table.len()
                && ti + 1 < self.tables.len()
                && !self.tables[ti + 1].table.is_empty()
            {
                let mergeable = {
                    let this = self.tables[ti].table.ranges.last();
                    let next = self.tables[ti + 1].table.ranges.first();
                    matches!((this, next), (Some(p), Some(c)) if p.mergeable_with(c))
                };
                if mergeable {
                    let new_high = self.tables[ti + 1].table.ranges[0].high;
                    let llen = self.tables[ti].table.len();
                    self.tables[ti].table.ranges[llen - 1].high = new_high;
                    self.tables[ti + 1].table.ranges.remove(0);
                    if self.tables[ti + 1].table.is_empty() {
                        self.tables.remove(ti + 1);
                    } else {
                        self.tables[ti + 1].refresh_low();
                    }
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }
    }

    /// Debug-only structural invariant check.
    pub fn check_invariant(&self) {
        let mut last_high: Option<u64> = None;
        for ts in &self.tables {
            debug_assert_eq!(ts.low, ts.table.low(), "stale table low cache");
            let mut prev: Option<&Range> = None;
            for r in &ts.table.ranges {
                debug_assert!(r.low < r.high, "range.low < range.high");
                if let Some(p) = prev {
                    debug_assert!(p.high <= r.low, "ranges out of order or overlapping");
                    debug_assert!(!p.mergeable_with(r), "adjacent mergeable ranges not fused");
                }
                if let Some(lh) = last_high {
                    debug_assert!(lh <= r.low, "tables out of order");
                }
                prev = Some(r);
            }
            if let Some(p) = prev {
                last_high = Some(p.high);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dbid(n: u64) -> Dbid {
        Dbid::new(n)
    }

    #[test]
    fn empty_slot_then_single_insert() {
        let mut s = DbidSlot::new(dbid(1));
        s.add_range(0, 0x10, dbid(2), 0x100, 1024).unwrap();
        assert_eq!(s.map(5), Some(Range::new(0, 0x10, dbid(2), 0x100)));
        s.check_invariant();
    }

    #[test]
    fn adjacent_ranges_merge() {
        let mut s = DbidSlot::new(dbid(1));
        s.add_range(0, 0x10, dbid(2), 0x100, 1024).unwrap();
        s.add_range(0x10, 0x20, dbid(2), 0x100, 1024).unwrap();
        let all: Vec<_> = s.ranges().copied().collect();
        assert_eq!(all, vec![Range::new(0, 0x20, dbid(2), 0x100)]);
        s.check_invariant();
    }

    #[test]
    fn incompatible_overlap_is_rejected_atomically() {
        let mut s = DbidSlot::new(dbid(1));
        s.add_range(0, 0x10, dbid(2), 0x100, 1024).unwrap();
        let before: Vec<_> = s.ranges().copied().collect();
        let err = s.add_range(5, 6, dbid(3), 0, 1024).unwrap_err();
        assert_eq!(err, Error::RangeOverlap);
        let after: Vec<_> = s.ranges().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn idempotent_add() {
        let mut s = DbidSlot::new(dbid(1));
        s.add_range(0, 0x10, dbid(2), 0x100, 1024).unwrap();
        s.add_range(0, 0x10, dbid(2), 0x100, 1024).unwrap();
        assert_eq!(s.ranges().count(), 1);
    }

    #[test]
    fn table_splits_once_capacity_exceeded() {
        let mut s = DbidSlot::new(dbid(1));
        // every insert uses a distinct, non-mergeable offset so nothing fuses
        for k in 0..40u64 {
            s.add_range(k * 10, k * 10 + 5, dbid(2), k as i64 + 1, 8)
                .unwrap();
        }
        assert!(s.tables.len() > 1);
        s.check_invariant();
        for k in 0..40u64 {
            assert_eq!(
                s.map(k * 10 + 1),
                Some(Range::new(k * 10, k * 10 + 5, dbid(2), k as i64 + 1))
            );
        }
    }

    #[test]
    fn gap_fill_out_of_order() {
        let mut s = DbidSlot::new(dbid(1));
        s.add_range(100, 110, dbid(9), 0, 1024).unwrap();
        s.add_range(0, 10, dbid(9), 0, 1024).unwrap();
        s.add_range(10, 100, dbid(9), 0, 1024).unwrap();
        let all: Vec<_> = s.ranges().copied().collect();
        assert_eq!(all, vec![Range::new(0, 110, dbid(9), 0)]);
    }

    /// `table_size == 1` means every table is already full the moment it
    /// holds a range, so a second, non-adjacent range must open a sibling
    /// table rather than recurse back into the same full one.
    #[test]
    fn table_size_one_does_not_recurse_forever() {
        let mut s = DbidSlot::new(dbid(1));
        s.add_range(0, 1, dbid(9), 0, 1).unwrap();
        s.add_range(10, 11, dbid(9), 0, 1).unwrap();
        let all: Vec<_> = s.ranges().copied().collect();
        assert_eq!(
            all,
            vec![Range::new(0, 1, dbid(9), 0), Range::new(10, 11, dbid(9), 0)]
        );
        s.check_invariant();
    }
}
