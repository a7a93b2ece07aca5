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

use super::*;
use crate::{alloc::Global, logger::NullLogger};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

fn new_set(max: usize) -> HullSet<Global> {
    HullSet::create(Global, NullLogger, max).unwrap()
}

fn collect_all(set: &mut HullSet<Global>) -> Vec<u64> {
    set.reset();
    let mut out = Vec::new();
    while let Some(v) = set.next() {
        out.push(v);
    }
    out
}

#[test]
fn empty_set_iterates_to_nothing() {
    let mut s = new_set(16);
    assert!(collect_all(&mut s).is_empty());
    assert_eq!(s.count(), 0);
    assert!(s.is_singleton());
}

#[test]
fn single_add_is_found() {
    let mut s = new_set(16);
    s.add(42);
    let all = collect_all(&mut s);
    assert_eq!(all, vec![42]);
    assert_eq!(s.count(), 1);
    assert!(s.is_singleton());
}

#[test]
fn adjacent_adds_merge_into_one_run() {
    let mut s = new_set(16);
    for v in [5, 6, 7, 8] {
        s.add(v);
    }
    let mut cur = Cursor::start();
    assert_eq!(cur.next_range(&s), Some((5, 9)));
    assert_eq!(cur.next_range(&s), None);
}

#[test]
fn idempotent_add() {
    let mut s = new_set(16);
    s.add(100);
    s.add(100);
    s.add(100);
    assert_eq!(s.count(), 1);
    assert_eq!(collect_all(&mut s), vec![100]);
}

#[test]
fn bounded_slots_still_cover_all_inserted() {
    let mut s = new_set(4);
    for v in [1, 3, 5, 7, 9] {
        s.add(v);
    }
    let all = collect_all(&mut s);
    let mut it = all.iter();
    for want in [1u64, 3, 5, 7, 9] {
        assert!(it.any(|&x| x == want), "missing inserted value {want}");
    }
    assert!(all.windows(2).all(|w| w[0] < w[1]));
    assert!(s.count() >= 5);
    assert!(s.slot_count() <= 4);
}

#[test]
fn dense_range_has_one_run() {
    let mut s = new_set(64);
    s.add_range(0, 1000);
    let all = collect_all(&mut s);
    assert_eq!(all, (0..1000).collect::<Vec<_>>());
    let mut cur = Cursor::start();
    assert_eq!(cur.next_range(&s), Some((0, 1000)));
    assert_eq!(cur.next_range(&s), None);
}

#[test]
fn property_preservation_and_ordering() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut s = new_set(4096);
    let mut inserted: Vec<u64> = (0..500).map(|_| rng.gen_range(0..1_000_000)).collect();
    for &v in &inserted {
        s.add(v);
    }
    let all = collect_all(&mut s);
    inserted.sort_unstable();
    inserted.dedup();
    let mut it = all.iter();
    for want in &inserted {
        assert!(it.any(|x| x == want), "missing inserted value {want}");
    }
    assert!(all.windows(2).all(|w| w[0] < w[1]), "not strictly ascending");
}

#[test]
fn property_count_consistency() {
    let mut s = new_set(512);
    s.add_range(10, 50);
    s.add(100);
    s.add(101);
    let counted = collect_all(&mut s).len() as u64;
    assert_eq!(s.count(), counted);
}

#[test]
fn property_bounded_memory_under_pressure() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut s = new_set(8);
    let mut values: Vec<u64> = (0..2000).step_by(3).collect();
    values.shuffle(&mut rng);
    for v in values {
        s.add(v);
    }
    assert!(s.slot_count() <= 8);
}

#[test]
fn seek_and_find_report_membership() {
    let mut s = new_set(32);
    s.add_range(10, 20);
    assert!(s.seek_to(15));
    assert!(!s.seek_to(25));

    let mut v = 25;
    let mut changed = false;
    // nothing beyond 20 until end; seeking past the set reaches `End`
    let found = s.find(&mut v, &mut changed);
    assert!(!found);
}

#[test]
fn to_text_lists_runs() {
    let mut s = new_set(32);
    s.add_range(0, 3);
    s.add_range(10, 12);
    let text = s.to_text(4096);
    assert_eq!(text, "0-3,a-c");
}

/// A slot right before the high sentinel must never be sacrificed by
/// shifting the sentinel's own `span_start` — that would permanently break
/// the "slot 1 is pinned at 2^34" invariant and corrupt every later gap
/// computation against it.
#[test]
fn sacrifice_never_moves_the_high_sentinel() {
    let mut s = new_set(3);
    s.add(MAX_ADDABLE - 1);
    s.add(100);
    let sentinel = s.slot(SENTINEL_HIGH);
    assert_eq!(sentinel.span_start, MAX_VALUE);
    assert_eq!(sentinel.skip_start, MAX_VALUE);
    // both inserted values must still be reachable, however the hull
    // degraded to make room for the second one.
    s.reset();
    let mut v = 0;
    let mut changed = false;
    assert!(s.find(&mut v, &mut changed));
    assert!(v <= 100);
    assert!(s.seek_to(100));
}
