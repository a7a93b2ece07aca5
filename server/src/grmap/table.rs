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

use super::range::Range;

/// A bounded, sorted array of [`Range`]s, capped at the map's configured
/// `table_size`.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub ranges: Vec<Range>,
}

impl Table {
    pub fn low(&self) -> u64 {
        self.ranges.first().map(|r| r.low).unwrap_or(u64::MAX)
    }

    pub fn high(&self) -> u64 {
        self.ranges.last().map(|r| r.high).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// `Ok(i)` if `v` falls inside `ranges[i]`; `Err(i)` with `i` the index
    /// `v` would be inserted at (ordered by `low`) otherwise.
    pub fn search(&self, v: u64) -> Result<usize, usize> {
        self.ranges.binary_search_by(|r| {
            if v < r.low {
                core::cmp::Ordering::Greater
            } else if v >= r.high {
                core::cmp::Ordering::Less
            } else {
                core::cmp::Ordering::Equal
            }
        })
    }
}

/// Pairs a [`Table`] with a cached copy of its first range's `low`, per
/// This lets `DbidSlot` binary search over tables without dereferencing
/// each one.
#[derive(Debug, Clone, Default)]
pub struct TableSlot {
    pub low: u64,
    pub table: Table,
}

impl TableSlot {
    pub fn refresh_low(&mut self) {
        if let Some(r) = self.table.ranges.first() {
            self.low = r.low;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guid::Dbid;

    #[test]
    fn search_finds_containing_range_or_insertion_point() {
        let t = Table {
            ranges: vec![
                Range::new(0, 10, Dbid::new(1), 0),
                Range::new(20, 30, Dbid::new(1), 0),
            ],
        };
        assert_eq!(t.search(5), Ok(0));
        assert_eq!(t.search(25), Ok(1));
        assert_eq!(t.search(15), Err(1));
        assert_eq!(t.search(100), Err(2));
    }
}
