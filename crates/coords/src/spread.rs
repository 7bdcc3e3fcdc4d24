//! Breadth-first flood fill as a coordinate set.

use crate::coord::Coord;
use crate::error::CoordError;
use crate::random::RandomSource;
use crate::set::{CoordSet, UNBOUNDED};
use crate::sphere::neighbours;
use std::collections::{HashSet, VecDeque};
use tracing::trace;

/// Verdict of a flood-fill test on one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spread {
    /// A target: yield it and keep expanding through it.
    Accept,
    /// Passable but not a target: expand through it without yielding.
    Continue,
    /// A wall: neither yield nor expand.
    Block,
}

/// Cells reachable from an origin by octahedral steps, in BFS order.
///
/// Each dequeued cell is first checked against the optional `domain`
/// (cells outside it are dropped untested), then classified by the test
/// function. The set is always potentially unbounded: callers bound the
/// search with a domain, a blocking test, or a limit.
pub struct SpreadCoords<'a> {
    origin: Coord,
    domain: Option<&'a dyn CoordSet>,
    test: Box<dyn FnMut(Coord) -> Spread + 'a>,
    frontier: VecDeque<Coord>,
    seen: HashSet<Coord>,
    accepted: HashSet<Coord>,
}

impl<'a> SpreadCoords<'a> {
    pub fn new(origin: Coord, test: impl FnMut(Coord) -> Spread + 'a) -> Self {
        let mut spread = Self {
            origin,
            domain: None,
            test: Box::new(test),
            frontier: VecDeque::new(),
            seen: HashSet::new(),
            accepted: HashSet::new(),
        };
        spread.rewind();
        spread
    }

    /// Restrict the fill to cells the `domain` includes.
    pub fn with_domain(mut self, domain: &'a dyn CoordSet) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Number of distinct cells discovered so far, tested or queued.
    pub fn explored(&self) -> usize {
        self.seen.len()
    }

    fn expand(&mut self, from: Coord) {
        for n in neighbours(from) {
            if self.seen.insert(n) {
                self.frontier.push_back(n);
            }
        }
    }
}

impl CoordSet for SpreadCoords<'_> {
    fn rewind(&mut self) {
        self.frontier.clear();
        self.seen.clear();
        self.accepted.clear();
        self.frontier.push_back(self.origin);
        self.seen.insert(self.origin);
    }

    fn next_coord(&mut self) -> Option<Coord> {
        while let Some(c) = self.frontier.pop_front() {
            if self.domain.is_some_and(|d| !d.includes(c)) {
                continue;
            }
            match (self.test)(c) {
                Spread::Accept => {
                    self.expand(c);
                    self.accepted.insert(c);
                    return Some(c);
                }
                Spread::Continue => self.expand(c),
                Spread::Block => {}
            }
        }
        trace!(
            origin = %self.origin,
            explored = self.seen.len(),
            accepted = self.accepted.len(),
            "flood exhausted"
        );
        None
    }

    fn randomize(&mut self, _rng: &RandomSource, _rewind: bool) -> Result<(), CoordError> {
        Err(CoordError::Unbounded { op: "randomize" })
    }

    fn potentially_unbounded(&self) -> bool {
        true
    }

    fn count(&mut self, exact: bool) -> Result<usize, CoordError> {
        if exact {
            Err(CoordError::Unbounded { op: "count" })
        } else {
            Ok(UNBOUNDED)
        }
    }

    /// True for cells yielded since the last rewind.
    fn includes(&self, c: Coord) -> bool {
        self.accepted.contains(&c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BoundingBox;
    use std::cell::Cell;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[test]
    fn blocked_origin_yields_nothing() {
        let calls = Cell::new(0);
        let mut spread = SpreadCoords::new(Coord::ZERO, |_| {
            calls.set(calls.get() + 1);
            Spread::Block
        });
        assert_eq!(spread.next_coord(), None);
        assert_eq!(calls.get(), 1);
        assert_eq!(spread.explored(), 1);
    }

    #[test]
    fn domain_bounds_the_fill() {
        let room = BoundingBox::from_origin_size(0, 0, 0, 3, 3, 1).coords();
        let mut spread = SpreadCoords::new(Coord::new(1, 1, 0), |_| Spread::Accept).with_domain(&room);
        let got = spread.get_coords(Some(100)).unwrap();
        assert_eq!(got.len(), 9);
        assert_eq!(got[0], Coord::new(1, 1, 0));
        assert!(got.iter().all(|c| room.includes(*c)));
    }

    #[test]
    fn filtered_domain_bounds_the_fill() {
        let column = BoundingBox::from_origin_size(0, 0, 0, 4, 4, 1)
            .coords()
            .filter(|c| c.x == 0);
        let mut spread = SpreadCoords::new(Coord::ZERO, |_| Spread::Accept).with_domain(&column);
        let got = spread.get_coords(Some(100)).unwrap();
        assert_eq!(got.len(), 4);
        assert!(got.iter().all(|c| c.x == 0));
    }

    #[test]
    fn exhaustion_is_traced() {
        #[derive(Clone, Default)]
        struct Sink(Arc<Mutex<Vec<u8>>>);
        impl io::Write for Sink {
            fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(bytes);
                Ok(bytes.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let sink = Sink::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let mut spread = SpreadCoords::new(Coord::ZERO, |_| Spread::Block);
            assert_eq!(spread.next_coord(), None);
        });
        let logs = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("flood exhausted"), "logs: {logs}");
        assert!(logs.contains("explored=1"), "logs: {logs}");
    }

    #[test]
    fn continue_passes_through_without_yielding() {
        // Only cells with x == 2 are targets; the corridor x < 2 is passable.
        let corridor = BoundingBox::from_origin_size(0, 0, 0, 3, 1, 1).coords();
        let mut spread = SpreadCoords::new(Coord::ZERO, |c| {
            if c.x == 2 { Spread::Accept } else { Spread::Continue }
        })
        .with_domain(&corridor);
        assert_eq!(spread.get_coords(Some(10)).unwrap(), vec![Coord::new(2, 0, 0)]);
    }

    #[test]
    fn walls_stop_expansion() {
        // A wall at x == 1 separates the origin from the rest of the row.
        let row = BoundingBox::from_origin_size(0, 0, 0, 5, 1, 1).coords();
        let mut spread = SpreadCoords::new(Coord::ZERO, |c| {
            if c.x == 1 { Spread::Block } else { Spread::Accept }
        })
        .with_domain(&row);
        assert_eq!(spread.get_coords(Some(10)).unwrap(), vec![Coord::ZERO]);
        assert!(spread.includes(Coord::ZERO));
        assert!(!spread.includes(Coord::new(3, 0, 0)));
    }

    #[test]
    fn bfs_order_is_by_steps() {
        let mut spread = SpreadCoords::new(Coord::ZERO, |_| Spread::Accept);
        let got = spread.get_coords(Some(11)).unwrap();
        assert_eq!(got[0], Coord::ZERO);
        assert!(got[1..].iter().all(|c| Coord::ZERO.distance_to(*c) == 1));
    }

    #[test]
    fn unbounded_misuse_is_rejected() {
        let mut spread = SpreadCoords::new(Coord::ZERO, |_| Spread::Accept);
        assert!(spread.potentially_unbounded());
        assert!(spread.randomize(&RandomSource::from_seed(0), true).is_err());
        assert!(spread.count(true).is_err());
        assert!(spread.get_coords(None).is_err());
    }
}
