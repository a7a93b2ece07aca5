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

use crate::guid::Dbid;

/// `[low, high)` of source serials mapping to `(dest_dbid, serial + offset)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub low: u64,
    pub high: u64,
    pub dest_dbid: Dbid,
    pub offset: i64,
}

impl Range {
    pub fn new(low: u64, high: u64, dest_dbid: Dbid, offset: i64) -> Self {
        debug_assert!(low < high, "range invariant: low < high");
        Self {
            low,
            high,
            dest_dbid,
            offset,
        }
    }

    #[inline]
    pub fn contains(&self, v: u64) -> bool {
        self.low <= v && v < self.high
    }

    /// Two ranges are mergeable iff they share a destination and offset and
    /// the first's `high` equals the second's `low`.
    #[inline]
    pub fn mergeable_with(&self, other: &Range) -> bool {
        self.dest_dbid == other.dest_dbid && self.offset == other.offset && self.high == other.low
    }

    #[inline]
    pub fn dest_serial_for(&self, src_serial: u64) -> u64 {
        debug_assert!(self.contains(src_serial));
        (src_serial as i64 + self.offset) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mergeable_requires_adjacency_and_same_mapping() {
        let a = Range::new(0, 10, Dbid::new(1), 5);
        let b = Range::new(10, 20, Dbid::new(1), 5);
        assert!(a.mergeable_with(&b));
        let c = Range::new(11, 20, Dbid::new(1), 5);
        assert!(!a.mergeable_with(&c));
        let d = Range::new(10, 20, Dbid::new(2), 5);
        assert!(!a.mergeable_with(&d));
        let e = Range::new(10, 20, Dbid::new(1), 6);
        assert!(!a.mergeable_with(&e));
    }
}
