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

//! `table_next_overlap`/`range_next_overlap`: the same binary search that
//! powers `map()`, generalized to walk a `[lo, hi)` cursor across table and
//! range boundaries, reporting maximal covered/uncovered sub-intervals.
//! This is the engine `add_range`'s overlap scan runs on.

use super::{dbid_slot::DbidSlot, range::Range};

/// One maximal sub-interval of the walked `[lo, hi)`, together with whether
/// it was already mapped.
pub(crate) struct Overlap {
    pub lo: u64,
    pub hi: u64,
    pub found: Option<Range>,
}

/// Binary-searches the table array (by cached `low`) for the table that
/// would contain `v`, i.e. the last table whose `low <= v`, defaulting to
/// table 0 if `v` precedes every table.
fn table_index_at(slot: &DbidSlot, v: u64) -> Option<usize> {
    if slot.tables.is_empty() {
        return None;
    }
    let pos = slot.tables.partition_point(|t| t.low <= v);
    Some(pos.saturating_sub(1))
}

/// Returns the next maximal sub-interval starting at `cur` (which must be
/// `< hi`), binary searching within the relevant table(s).
pub(crate) fn next_overlap(slot: &DbidSlot, cur: u64, hi: u64) -> Overlap {
    debug_assert!(cur < hi);
    let Some(mut ti) = table_index_at(slot, cur) else {
        return Overlap {
            lo: cur,
            hi,
            found: None,
        };
    };
    // `table_index_at` may have picked a table that lies entirely before
    // `cur` (when `cur` precedes every table); advance until we find one
    // that could plausibly contain or follow `cur`.
    while ti < slot.tables.len() && slot.tables[ti].table.high() <= cur {
        ti += 1;
    }
    if ti >= slot.tables.len() {
        return Overlap {
            lo: cur,
            hi,
            found: None,
        };
    }
    let table = &slot.tables[ti].table;
    if table.low() >= hi {
        return Overlap {
            lo: cur,
            hi,
            found: None,
        };
    }
    match table.search(cur) {
        Ok(idx) => {
            let r = table.ranges[idx];
            Overlap {
                lo: cur,
                hi: r.high.min(hi),
                found: Some(r),
            }
        }
        Err(idx) => {
            let next_low = if idx < table.ranges.len() {
                table.ranges[idx].low
            } else {
                slot.tables
                    .get(ti + 1)
                    .map(|t| t.table.low())
                    .unwrap_or(u64::MAX)
            };
            Overlap {
                lo: cur,
                hi: next_low.min(hi),
                found: None,
            }
        }
    }
}

/// Walks the whole `[lo, hi)` request against `slot`, returning the gap
/// sub-intervals that must be filled, or `Err` the instant an overlapping
/// range maps somewhere incompatible. No mutation happens here — this is
/// phase 2 of `add_range`, run entirely before any mutation.
pub(crate) fn scan_for_gaps(
    slot: &DbidSlot,
    lo: u64,
    hi: u64,
    dest_dbid: crate::guid::Dbid,
    offset: i64,
) -> Result<Vec<(u64, u64)>, crate::error::Error> {
    let mut gaps = Vec::new();
    let mut cur = lo;
    while cur < hi {
        let ov = next_overlap(slot, cur, hi);
        match ov.found {
            Some(r) => {
                if r.dest_dbid != dest_dbid || r.offset != offset {
                    return Err(crate::error::Error::RangeOverlap);
                }
            }
            None => gaps.push((ov.lo, ov.hi)),
        }
        cur = ov.hi;
    }
    Ok(gaps)
}
