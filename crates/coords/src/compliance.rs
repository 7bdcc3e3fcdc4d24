//! CoordSet contract test helpers.
//!
//! Reused across every set type's test module to check the invariants the
//! trait promises: rewind reproducibility, exact count matches a walk,
//! membership agrees with enumeration, randomization preserves the multiset.

use crate::coord::Coord;
use crate::random::RandomSource;
use crate::set::CoordSet;
use std::collections::HashSet;
use std::ops::ControlFlow;

/// Largest neighbourhood scanned for non-members.
const SCAN_VOLUME: i64 = 20_000;

fn sorted(mut v: Vec<Coord>) -> Vec<Coord> {
    v.sort();
    v
}

/// Assert that a full traversal yields exactly `expected` in some order.
pub fn assert_same_multiset(set: &mut dyn CoordSet, expected: &[Coord]) {
    let got = set.get_coords(None).expect("finite set");
    assert_eq!(
        sorted(got),
        sorted(expected.to_vec()),
        "enumeration differs from expected multiset"
    );
}

/// Assert the full finite-set contract on `set`.
pub fn assert_finite_contract(set: &mut dyn CoordSet, rng: &RandomSource) {
    assert!(!set.potentially_unbounded(), "contract helper needs a finite set");
    set.reset(true);

    let first = set.get_coords(None).expect("finite set");
    let second = set.get_coords(None).expect("finite set");
    assert_eq!(first, second, "rewind must reproduce the same sequence");

    let mut walked = 0usize;
    let _ = set.walk(&mut |_| {
        walked += 1;
        ControlFlow::Continue(())
    });
    assert_eq!(walked, first.len(), "walk visits every coordinate");
    assert_eq!(
        set.count(true).expect("finite set"),
        walked,
        "exact count matches a full walk"
    );
    assert!(
        set.count(false).expect("finite set") >= walked,
        "cheap count is an upper bound"
    );

    for c in &first {
        assert!(set.includes(*c), "yielded {c} but includes() is false");
    }
    assert_rejects_non_members(set, &first);

    set.randomize(rng, true).expect("finite set randomizes");
    assert_same_multiset(set, &first);
    assert_same_multiset(set, &first);

    set.reset(true);
    assert_eq!(
        set.get_coords(None).expect("finite set"),
        first,
        "reset drops the randomized ordering"
    );
}

/// Every cell of the box around `members`, grown by one, that was not
/// yielded must report `includes() == false`.
pub fn assert_rejects_non_members(set: &dyn CoordSet, members: &[Coord]) {
    let Some(&first) = members.first() else {
        return;
    };
    let (mut lo, mut hi) = (first, first);
    for c in members {
        lo = Coord::new(lo.x.min(c.x), lo.y.min(c.y), lo.z.min(c.z));
        hi = Coord::new(hi.x.max(c.x), hi.y.max(c.y), hi.z.max(c.z));
    }
    let span = |a: i32, b: i32| b as i64 - a as i64 + 3;
    if span(lo.x, hi.x) * span(lo.y, hi.y) * span(lo.z, hi.z) > SCAN_VOLUME {
        return;
    }
    let yielded: HashSet<Coord> = members.iter().copied().collect();
    for z in lo.z - 1..=hi.z + 1 {
        for y in lo.y - 1..=hi.y + 1 {
            for x in lo.x - 1..=hi.x + 1 {
                let c = Coord::new(x, y, z);
                if !yielded.contains(&c) {
                    assert!(!set.includes(c), "never yielded {c} but includes() is true");
                }
            }
        }
    }
}

/// Assert that a walk can be aborted after `n` coordinates.
pub fn assert_walk_aborts(set: &mut dyn CoordSet, n: usize) {
    let mut seen = 0usize;
    let flow = set.walk(&mut |_| {
        seen += 1;
        if seen == n {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    assert!(flow.is_break());
    assert_eq!(seen, n);
}
