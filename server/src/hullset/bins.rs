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

//! Skip bins: 35 linked-list heads over non-sentinel slots, indexed by the
//! floor log2 of their gap width to the next slot in value order. Chaining
//! itself lives on `HullSet` (it needs mutable slot access); this module is
//! just the bin-index geometry shared by `slot_alloc` and `rebin`.

/// Gap widths run up to `2^34`, so bin indices run `0..=34`.
pub const BIN_COUNT: usize = 35;

/// `floor(log2(width))`, clamped into the bin range; width 0 (a just-closed
/// gap, transient mid-mutation) maps to bin 0.
#[inline]
pub fn bin_index(width: u64) -> usize {
    if width == 0 {
        0
    } else {
        (63 - width.leading_zeros()) as usize
    }
    .min(BIN_COUNT - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_index_matches_log2_floor() {
        assert_eq!(bin_index(1), 0);
        assert_eq!(bin_index(2), 1);
        assert_eq!(bin_index(3), 1);
        assert_eq!(bin_index(4), 2);
        assert_eq!(bin_index(1 << 33), 33);
        assert_eq!(bin_index(1 << 34), 34);
    }
}
