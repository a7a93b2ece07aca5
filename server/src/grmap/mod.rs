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

//! GRMAP — a hierarchical, compressed, queryable mapping from ranges of
//! 48-bit database identifiers to destination ranges, used to rewrite
//! identifiers when merging/replaying streams from replica databases.

mod dbid_slot;
mod overlap;
mod range;
mod table;
pub mod text;

#[cfg(test)]
mod tests;

pub use range::Range;

use crate::{
    dateline::Dateline,
    error::Error,
    guid::{Dbid, Guid},
    logger::Logger,
};
use dbid_slot::DbidSlot;

pub const DEFAULT_TABLE_SIZE: usize = 1024;

/// An unordered collection of [`DbidSlot`]s plus the configured
/// `table_size`. Typical population is 1-3 slots, so the outer lookup is a
/// linear scan, since the expected population is tiny.
pub struct Grmap {
    slots: Vec<DbidSlot>,
    table_size: usize,
    logger: Box<dyn Logger>,
}

impl Grmap {
    /// Starts empty, with `table_size` defaulted to
    /// [`DEFAULT_TABLE_SIZE`]. The allocator parameter is accepted for
    /// lifecycle parity with [`HullSet::create`]; this crate's `Vec`-backed
    /// tables use the process allocator directly (see DESIGN.md), while the
    /// `Allocator` abstraction is exercised for real by `HullSet`'s manual
    /// slot tables. The logger is held for the lifetime of the map and used
    /// for the diagnostics below.
    pub fn init(_alloc: &impl crate::alloc::Allocator, logger: impl Logger + 'static) -> Self {
        Self {
            slots: Vec::new(),
            table_size: DEFAULT_TABLE_SIZE,
            logger: Box::new(logger),
        }
    }

    /// Releases all owned memory. Safe to call on an already-empty map;
    /// `Drop` does the real work, this exists for explicit lifecycle parity.
    pub fn finish(self) {}

    /// Succeeds only while the map is empty and `n >= 1`.
    pub fn set_table_size(&mut self, n: usize) -> Result<(), Error> {
        if n == 0 {
            return Err(Error::Invalid);
        }
        if self.slots.iter().any(|s| !s.tables.is_empty()) {
            return Err(Error::InUse);
        }
        self.table_size = n;
        Ok(())
    }

    pub fn table_size(&self) -> usize {
        self.table_size
    }

    fn find_slot(&self, dbid: Dbid) -> Option<&DbidSlot> {
        self.slots.iter().find(|s| s.dbid == dbid)
    }

    fn find_slot_mut(&mut self, dbid: Dbid) -> Option<&mut DbidSlot> {
        self.slots.iter_mut().find(|s| s.dbid == dbid)
    }

    /// Translates `src` using the range containing its serial under its
    /// DBID.
    pub fn map(&self, src: Guid) -> Result<Guid, Error> {
        let slot = self.find_slot(src.dbid()).ok_or(Error::NoMapping)?;
        let r = slot.map(src.serial()).ok_or(Error::NoMapping)?;
        Ok(Guid::new(r.dest_dbid, r.dest_serial_for(src.serial())))
    }

    /// Adds the mapping of `n` consecutive source ids starting at `src` to
    /// `n` consecutive destination ids starting at `dst`.
    pub fn add_range(&mut self, src: Guid, dst: Guid, n: u64) -> Result<(), Error> {
        if n == 0 {
            return Err(Error::Invalid);
        }
        let lo = src.serial();
        let hi = lo.checked_add(n).ok_or(Error::Invalid)?;
        let offset = dst.serial() as i64 - lo as i64;
        let dest_dbid = dst.dbid();
        let src_dbid = src.dbid();

        if self.find_slot(src_dbid).is_none() {
            self.slots.push(DbidSlot::new(src_dbid));
        }
        let table_size = self.table_size;
        let slot = self.find_slot_mut(src_dbid).expect("just inserted");
        let result = slot.add_range(lo, hi, dest_dbid, offset, table_size);
        if let Err(e) = result {
            self.logger
                .warn(&format!("add_range rejected for dbid {:x}: {e}", src_dbid.get()));
        }
        result
    }

    /// Walks every range in dbid-insertion-order, table-order, range-order.
    pub fn iterate_all(&self) -> impl Iterator<Item = (Guid, Guid, u64)> + '_ {
        self.slots.iter().flat_map(|slot| {
            let dbid = slot.dbid;
            slot.ranges().map(move |r| {
                let n = r.high - r.low;
                (
                    Guid::new(dbid, r.low),
                    Guid::new(r.dest_dbid, r.dest_serial_for(r.low)),
                    n,
                )
            })
        })
    }

    /// Walks only the source DBID of `src`.
    pub fn iterate_dbid(&self, src: Guid) -> impl Iterator<Item = (Guid, Guid, u64)> + '_ {
        let dbid = src.dbid();
        self.find_slot(dbid).into_iter().flat_map(move |slot| {
            slot.ranges().map(move |r| {
                let n = r.high - r.low;
                (
                    Guid::new(dbid, r.low),
                    Guid::new(r.dest_dbid, r.dest_serial_for(r.low)),
                    n,
                )
            })
        })
    }

    /// Per known source DBID, the first serial number not covered.
    pub fn dateline(&self) -> Dateline {
        let mut d = Dateline::new();
        for slot in &self.slots {
            let mut frontier = 0u64;
            if let Some(first) = slot.ranges().next() {
                if first.low == 0 {
                    frontier = first.high;
                }
            }
            d.set(slot.dbid, frontier);
        }
        d
    }

    /// Compares two maps by structural walk after iteration.
    pub fn equal(&self, other: &Grmap) -> bool {
        self.iterate_all().eq(other.iterate_all())
    }

    /// Assertion-only invariant walk; has no effect on correct builds.
    pub fn invariant(&self) {
        for slot in &self.slots {
            slot.check_invariant();
        }
    }
}

impl Default for Grmap {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            table_size: DEFAULT_TABLE_SIZE,
            logger: Box::new(crate::logger::NullLogger),
        }
    }
}
