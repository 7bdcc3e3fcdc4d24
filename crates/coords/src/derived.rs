//! Lazy wrappers that derive a new set from an existing one.

use crate::coord::Coord;
use crate::error::CoordError;
use crate::random::RandomSource;
use crate::set::CoordSet;
use std::collections::HashSet;

/// Coordinates of `inner` that satisfy a predicate.
///
/// The predicate must be pure: it is asked again by `includes`.
pub struct FilteredCoords<S, F> {
    inner: S,
    pred: F,
}

impl<S, F> FilteredCoords<S, F>
where
    S: CoordSet,
    F: Fn(Coord) -> bool,
{
    pub fn new(inner: S, pred: F) -> Self {
        Self { inner, pred }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, F> CoordSet for FilteredCoords<S, F>
where
    S: CoordSet,
    F: Fn(Coord) -> bool,
{
    fn rewind(&mut self) {
        self.inner.rewind();
    }

    fn next_coord(&mut self) -> Option<Coord> {
        loop {
            let c = self.inner.next_coord()?;
            if (self.pred)(c) {
                return Some(c);
            }
        }
    }

    fn reset(&mut self, rewind: bool) {
        self.inner.reset(rewind);
    }

    fn randomize(&mut self, rng: &RandomSource, rewind: bool) -> Result<(), CoordError> {
        self.inner.randomize(rng, rewind)
    }

    fn potentially_unbounded(&self) -> bool {
        self.inner.potentially_unbounded()
    }

    fn count(&mut self, exact: bool) -> Result<usize, CoordError> {
        if !exact {
            return self.inner.count(false);
        }
        if self.potentially_unbounded() {
            return Err(CoordError::Unbounded { op: "count" });
        }
        self.rewind();
        let mut n = 0;
        while self.next_coord().is_some() {
            n += 1;
        }
        self.rewind();
        Ok(n)
    }

    fn includes(&self, c: Coord) -> bool {
        self.inner.includes(c) && (self.pred)(c)
    }
}

/// At most `limit` coordinates of `inner`.
///
/// The first `limit` coordinates of `inner`, in its order at construction,
/// form a window that is pulled once and then owned: membership, counting
/// and randomization all answer from it, so capping an unbounded set gives
/// an ordinary finite set. Only an unbounded `inner` with no real cap
/// (`limit == usize::MAX`) stays a pass-through.
pub struct LimitedCoords<S> {
    inner: S,
    limit: usize,
    window: Vec<Coord>,
    members: HashSet<Coord>,
    order: Option<Vec<usize>>,
    pos: usize,
}

impl<S: CoordSet> LimitedCoords<S> {
    pub fn new(mut inner: S, limit: usize) -> Self {
        inner.rewind();
        let mut window = Vec::new();
        if !(inner.potentially_unbounded() && limit == usize::MAX) {
            while window.len() < limit {
                match inner.next_coord() {
                    Some(c) => window.push(c),
                    None => break,
                }
            }
        }
        let members = window.iter().copied().collect();
        Self {
            inner,
            limit,
            window,
            members,
            order: None,
            pos: 0,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn passes_through(&self) -> bool {
        self.inner.potentially_unbounded() && self.limit == usize::MAX
    }
}

impl<S: CoordSet> CoordSet for LimitedCoords<S> {
    fn rewind(&mut self) {
        if self.passes_through() {
            self.inner.rewind();
        }
        self.pos = 0;
    }

    fn next_coord(&mut self) -> Option<Coord> {
        if self.passes_through() {
            return self.inner.next_coord();
        }
        let idx = match &self.order {
            Some(order) => *order.get(self.pos)?,
            None => self.pos,
        };
        let c = self.window.get(idx).copied()?;
        self.pos += 1;
        Some(c)
    }

    fn reset(&mut self, rewind: bool) {
        self.order = None;
        if rewind {
            self.rewind();
        }
    }

    fn randomize(&mut self, rng: &RandomSource, rewind: bool) -> Result<(), CoordError> {
        if self.passes_through() {
            return Err(CoordError::Unbounded { op: "randomize" });
        }
        let mut order: Vec<usize> = (0..self.window.len()).collect();
        rng.shuffle(&mut order);
        self.order = Some(order);
        if rewind {
            self.rewind();
        }
        Ok(())
    }

    fn potentially_unbounded(&self) -> bool {
        self.passes_through()
    }

    fn count(&mut self, exact: bool) -> Result<usize, CoordError> {
        if self.passes_through() {
            return self.inner.count(exact);
        }
        Ok(self.window.len())
    }

    fn includes(&self, c: Coord) -> bool {
        if self.passes_through() {
            return self.inner.includes(c);
        }
        self.members.contains(&c)
    }
}

/// `inner` with every coordinate passed through a mapping.
///
/// The mapping is not assumed invertible, so `includes` answers for the
/// coordinates produced since the last rewind.
pub struct MappedCoords<S, F> {
    inner: S,
    f: F,
    produced: HashSet<Coord>,
}

impl<S, F> MappedCoords<S, F>
where
    S: CoordSet,
    F: FnMut(Coord) -> Coord,
{
    pub fn new(inner: S, f: F) -> Self {
        Self {
            inner,
            f,
            produced: HashSet::new(),
        }
    }
}

impl<S, F> CoordSet for MappedCoords<S, F>
where
    S: CoordSet,
    F: FnMut(Coord) -> Coord,
{
    fn rewind(&mut self) {
        self.inner.rewind();
        self.produced.clear();
    }

    fn next_coord(&mut self) -> Option<Coord> {
        let c = (self.f)(self.inner.next_coord()?);
        self.produced.insert(c);
        Some(c)
    }

    fn reset(&mut self, rewind: bool) {
        self.inner.reset(rewind);
        if rewind {
            self.produced.clear();
        }
    }

    fn randomize(&mut self, rng: &RandomSource, rewind: bool) -> Result<(), CoordError> {
        self.inner.randomize(rng, rewind)?;
        if rewind {
            self.produced.clear();
        }
        Ok(())
    }

    fn potentially_unbounded(&self) -> bool {
        self.inner.potentially_unbounded()
    }

    fn count(&mut self, exact: bool) -> Result<usize, CoordError> {
        self.inner.count(exact)
    }

    fn includes(&self, c: Coord) -> bool {
        self.produced.contains(&c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ArrayCoordSet;
    use crate::compliance;
    use crate::line::Line;

    fn row(n: i32) -> ArrayCoordSet {
        (0..n).map(|x| Coord::new(x, 0, 0)).collect()
    }

    #[test]
    fn filter_keeps_matching() {
        let mut evens = row(10).filter(|c| c.x % 2 == 0);
        assert_eq!(evens.count(true).unwrap(), 5);
        assert_eq!(evens.count(false).unwrap(), 10);
        compliance::assert_finite_contract(&mut evens, &RandomSource::from_seed(1));
    }

    #[test]
    fn limit_caps_enumeration() {
        let mut first3 = row(10).limit(3);
        assert_eq!(
            first3.get_coords(None).unwrap(),
            vec![Coord::new(0, 0, 0), Coord::new(1, 0, 0), Coord::new(2, 0, 0)]
        );
        assert_eq!(first3.count(false).unwrap(), 3);
        assert!(first3.includes(Coord::new(2, 0, 0)));
        assert!(!first3.includes(Coord::new(3, 0, 0)));
        compliance::assert_finite_contract(&mut first3, &RandomSource::from_seed(4));
    }

    #[test]
    fn filter_membership_applies_the_predicate() {
        let low = row(10).filter(|c| c.x < 2);
        assert!(low.includes(Coord::new(1, 0, 0)));
        assert!(!low.includes(Coord::new(3, 0, 0)));
        assert!(!low.includes(Coord::new(1, 5, 0)));
    }

    #[test]
    fn limit_makes_unbounded_line_enumerable() {
        let line = Line::new(Coord::ZERO, Coord::new(1, 0, 0), None, None);
        let mut capped = line.limit(5);
        assert!(!capped.potentially_unbounded());
        assert_eq!(capped.count(true).unwrap(), 5);
        let xs: Vec<i32> = capped.get_coords(None).unwrap().iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![0, 1, -1, 2, -2]);
        assert!(!capped.includes(Coord::new(3, 0, 0)));

        capped.randomize(&RandomSource::from_seed(0), true).unwrap();
        compliance::assert_same_multiset(
            &mut capped,
            &[-2, -1, 0, 1, 2].map(|x| Coord::new(x, 0, 0)),
        );
        compliance::assert_finite_contract(&mut capped, &RandomSource::from_seed(9));
    }

    #[test]
    fn uncapped_unbounded_limit_passes_through() {
        let line = Line::new(Coord::ZERO, Coord::new(1, 0, 0), Some(0), None);
        let mut all = line.limit(usize::MAX);
        assert!(all.potentially_unbounded());
        assert!(all.includes(Coord::new(1_000, 0, 0)));
        assert_eq!(all.get_coords(Some(3)).unwrap().len(), 3);
        assert!(all.randomize(&RandomSource::from_seed(0), true).is_err());
    }

    #[test]
    fn map_translates_and_tracks_membership() {
        let mut lifted = row(3).map(|c| c.plus(Coord::new(0, 0, 5)));
        assert!(!lifted.includes(Coord::new(0, 0, 5)));
        let got = lifted.get_coords(None).unwrap();
        assert_eq!(got[2], Coord::new(2, 0, 5));
        assert!(lifted.includes(Coord::new(1, 0, 5)));
        assert!(!lifted.includes(Coord::new(1, 0, 0)));
    }

    #[test]
    fn derived_sets_chain() {
        let mut s = row(20).filter(|c| c.x % 3 == 0).limit(4).map(|c| c.times(2));
        let xs: Vec<i32> = s.get_coords(None).unwrap().iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![0, 6, 12, 18]);
    }
}
