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

//! Scenario and property tests over the literal values and quantified
//! invariants this module's algorithms must satisfy.

use super::Grmap;
use crate::{alloc::Global, error::Error, guid::{Dbid, Guid}, logger::NullLogger};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn empty() -> Grmap {
    Grmap::init(&Global, NullLogger)
}

#[test]
fn empty_map_has_no_mappings() {
    let m = empty();
    assert_eq!(m.to_text(), "grmap {\n}\n");
    assert_eq!(
        m.map(Guid::new(Dbid::new(0x1234), 0)).unwrap_err(),
        Error::NoMapping
    );
}

#[test]
fn single_add_then_map() {
    let mut m = empty();
    m.add_range(
        Guid::new(Dbid::new(0x1), 0x0),
        Guid::new(Dbid::new(0x2), 0x100),
        0x10,
    )
    .unwrap();
    let mapped = m.map(Guid::new(Dbid::new(0x1), 0x5)).unwrap();
    assert_eq!(mapped, Guid::new(Dbid::new(0x2), 0x105));
}

#[test]
fn adjacent_add_merges_into_one_range() {
    let mut m = empty();
    m.add_range(
        Guid::new(Dbid::new(0x1), 0x0),
        Guid::new(Dbid::new(0x2), 0x100),
        0x10,
    )
    .unwrap();
    m.add_range(
        Guid::new(Dbid::new(0x1), 0x10),
        Guid::new(Dbid::new(0x2), 0x110),
        0x10,
    )
    .unwrap();
    let ranges: Vec<_> = m.iterate_all().collect();
    assert_eq!(ranges.len(), 1);
    let (src, dst, n) = ranges[0];
    assert_eq!(src, Guid::new(Dbid::new(0x1), 0x0));
    assert_eq!(dst, Guid::new(Dbid::new(0x2), 0x100));
    assert_eq!(n, 0x20);
}

#[test]
fn incompatible_overlap_rejected_and_unchanged() {
    let mut m = empty();
    m.add_range(
        Guid::new(Dbid::new(0x1), 0x0),
        Guid::new(Dbid::new(0x2), 0x100),
        0x10,
    )
    .unwrap();
    m.add_range(
        Guid::new(Dbid::new(0x1), 0x10),
        Guid::new(Dbid::new(0x2), 0x110),
        0x10,
    )
    .unwrap();
    let before = m.to_text();
    let err = m
        .add_range(
            Guid::new(Dbid::new(0x1), 0x5),
            Guid::new(Dbid::new(0x3), 0x0),
            1,
        )
        .unwrap_err();
    assert_eq!(err, Error::RangeOverlap);
    assert_eq!(m.to_text(), before);
}

#[test]
fn property_map_after_add() {
    let mut m = empty();
    m.add_range(Guid::new(Dbid::new(1), 1000), Guid::new(Dbid::new(2), 5000), 50)
        .unwrap();
    for k in 0..50u64 {
        let got = m.map(Guid::new(Dbid::new(1), 1000 + k)).unwrap();
        assert_eq!(got, Guid::new(Dbid::new(2), 5000 + k));
    }
}

#[test]
fn property_idempotent() {
    let mut a = empty();
    a.add_range(Guid::new(Dbid::new(1), 0), Guid::new(Dbid::new(2), 0), 30)
        .unwrap();
    let mut b = a.to_text();
    a.add_range(Guid::new(Dbid::new(1), 0), Guid::new(Dbid::new(2), 0), 30)
        .unwrap();
    let c = a.to_text();
    assert_eq!(core::mem::take(&mut b), c);
}

#[test]
fn property_split_preserves_invariant() {
    let mut m = empty();
    m.set_table_size(4).unwrap();
    for k in 0..64u64 {
        m.add_range(
            Guid::new(Dbid::new(1), k * 100),
            Guid::new(Dbid::new(2), k * 100 + (k as u64)),
            5,
        )
        .unwrap();
    }
    m.invariant();
    assert!(m.table_size() == 4);
}

#[test]
fn property_round_trip_random() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut m = empty();
    let mut cursor = 0u64;
    for _ in 0..40 {
        let gap: u64 = rng.gen_range(0..5);
        let n: u64 = rng.gen_range(1..20);
        cursor += gap;
        let dst = cursor + 0x1000;
        m.add_range(Guid::new(Dbid::new(1), cursor), Guid::new(Dbid::new(2), dst), n)
            .unwrap();
        cursor += n;
    }
    let text = m.to_text();
    let back = Grmap::from_text(&text).unwrap();
    assert!(m.equal(&back));
    assert_eq!(back.to_text(), text);
}

#[test]
fn dateline_reports_first_uncovered_serial() {
    let mut m = empty();
    m.add_range(Guid::new(Dbid::new(1), 0), Guid::new(Dbid::new(2), 0), 10)
        .unwrap();
    let dl = m.dateline();
    assert_eq!(dl.get(Dbid::new(1)), Some(10));
    assert_eq!(dl.resume_point(Dbid::new(1)), 10);
    assert_eq!(dl.resume_point(Dbid::new(99)), 0);
}
