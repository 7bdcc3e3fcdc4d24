//! The `CoordSet` protocol: a rewindable, lazily enumerated collection of
//! coordinates.

use crate::array::ArrayCoordSet;
use crate::coord::Coord;
use crate::derived::{FilteredCoords, LimitedCoords, MappedCoords};
use crate::error::CoordError;
use crate::random::RandomSource;
use glam::DVec3;
use std::ops::ControlFlow;

/// Count reported by a cheap (non-exact) count of an unbounded set.
pub const UNBOUNDED: usize = usize::MAX;

/// A rewindable cursor over a set of coordinates.
///
/// Concrete sets own their cursor and ordering state. A full traversal is
/// always `rewind` followed by `next_coord` until it returns `None`, and a
/// rewound set must enumerate the same multiset again.
pub trait CoordSet {
    /// Restart enumeration from the first coordinate.
    fn rewind(&mut self);

    /// Next coordinate, or `None` once the set is exhausted.
    fn next_coord(&mut self) -> Option<Coord>;

    /// Drop any cached ordering (such as a randomization) and optionally
    /// rewind.
    fn reset(&mut self, rewind: bool) {
        if rewind {
            self.rewind();
        }
    }

    /// Switch to a randomized enumeration order drawn from `rng`.
    ///
    /// Fails on potentially unbounded sets.
    fn randomize(&mut self, rng: &RandomSource, rewind: bool) -> Result<(), CoordError>;

    /// True when enumeration might never terminate.
    fn potentially_unbounded(&self) -> bool {
        false
    }

    /// Number of coordinates.
    ///
    /// A non-exact count may be an upper bound and returns [`UNBOUNDED`] for
    /// unbounded sets. An exact count walks the set when the type cannot
    /// answer directly, and fails on unbounded sets.
    fn count(&mut self, exact: bool) -> Result<usize, CoordError> {
        if self.potentially_unbounded() {
            return if exact {
                Err(CoordError::Unbounded { op: "count" })
            } else {
                Ok(UNBOUNDED)
            };
        }
        let mut n = 0;
        self.rewind();
        while self.next_coord().is_some() {
            n += 1;
        }
        self.rewind();
        Ok(n)
    }

    /// Membership test.
    fn includes(&self, c: Coord) -> bool;

    /// Visit every coordinate from the start until `visit` breaks.
    ///
    /// Returns `Break` if the walk was aborted. On unbounded sets the
    /// callback is responsible for stopping.
    fn walk(&mut self, visit: &mut dyn FnMut(Coord) -> ControlFlow<()>) -> ControlFlow<()> {
        self.rewind();
        while let Some(c) = self.next_coord() {
            if visit(c).is_break() {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Materialize the coordinates, at most `limit` of them.
    fn get_coords(&mut self, limit: Option<usize>) -> Result<Vec<Coord>, CoordError> {
        if limit.is_none() && self.potentially_unbounded() {
            return Err(CoordError::Unbounded { op: "materialize" });
        }
        let limit = limit.unwrap_or(usize::MAX);
        let mut out = Vec::new();
        self.rewind();
        while out.len() < limit {
            match self.next_coord() {
                Some(c) => out.push(c),
                None => break,
            }
        }
        Ok(out)
    }

    /// Centroid of the set rounded to the nearest cell, or `None` if empty.
    fn get_center_coord(&mut self) -> Result<Option<Coord>, CoordError> {
        if self.potentially_unbounded() {
            return Err(CoordError::Unbounded { op: "center" });
        }
        let mut sum = DVec3::ZERO;
        let mut n = 0usize;
        let _ = self.walk(&mut |c| {
            sum += DVec3::new(c.x as f64, c.y as f64, c.z as f64);
            n += 1;
            ControlFlow::Continue(())
        });
        if n == 0 {
            return Ok(None);
        }
        let mean = (sum / n as f64).round();
        Ok(Some(Coord::new(mean.x as i32, mean.y as i32, mean.z as i32)))
    }

    /// Std iterator over a rewound traversal.
    fn iter(&mut self) -> CoordIter<'_, Self>
    where
        Self: Sized,
    {
        self.rewind();
        CoordIter { set: self }
    }

    /// Lazily keep only coordinates matching `pred`.
    fn filter<F>(self, pred: F) -> FilteredCoords<Self, F>
    where
        Self: Sized,
        F: Fn(Coord) -> bool,
    {
        FilteredCoords::new(self, pred)
    }

    /// Keep the first `n` coordinates, as a finite set.
    fn limit(self, n: usize) -> LimitedCoords<Self>
    where
        Self: Sized,
    {
        LimitedCoords::new(self, n)
    }

    /// Lazily transform every coordinate.
    fn map<F>(self, f: F) -> MappedCoords<Self, F>
    where
        Self: Sized,
        F: FnMut(Coord) -> Coord,
    {
        MappedCoords::new(self, f)
    }

    /// Snapshot the current enumeration into an owned set.
    fn materialize(&mut self) -> Result<ArrayCoordSet, CoordError>
    where
        Self: Sized,
    {
        Ok(ArrayCoordSet::new(self.get_coords(None)?))
    }
}

/// Iterator adapter returned by [`CoordSet::iter`].
pub struct CoordIter<'a, S: ?Sized> {
    set: &'a mut S,
}

impl<S: CoordSet + ?Sized> Iterator for CoordIter<'_, S> {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        self.set.next_coord()
    }
}

impl<S: CoordSet + ?Sized> CoordSet for &mut S {
    fn rewind(&mut self) {
        (**self).rewind()
    }
    fn next_coord(&mut self) -> Option<Coord> {
        (**self).next_coord()
    }
    fn reset(&mut self, rewind: bool) {
        (**self).reset(rewind)
    }
    fn randomize(&mut self, rng: &RandomSource, rewind: bool) -> Result<(), CoordError> {
        (**self).randomize(rng, rewind)
    }
    fn potentially_unbounded(&self) -> bool {
        (**self).potentially_unbounded()
    }
    fn count(&mut self, exact: bool) -> Result<usize, CoordError> {
        (**self).count(exact)
    }
    fn includes(&self, c: Coord) -> bool {
        (**self).includes(c)
    }
}

impl<S: CoordSet + ?Sized> CoordSet for Box<S> {
    fn rewind(&mut self) {
        (**self).rewind()
    }
    fn next_coord(&mut self) -> Option<Coord> {
        (**self).next_coord()
    }
    fn reset(&mut self, rewind: bool) {
        (**self).reset(rewind)
    }
    fn randomize(&mut self, rng: &RandomSource, rewind: bool) -> Result<(), CoordError> {
        (**self).randomize(rng, rewind)
    }
    fn potentially_unbounded(&self) -> bool {
        (**self).potentially_unbounded()
    }
    fn count(&mut self, exact: bool) -> Result<usize, CoordError> {
        (**self).count(exact)
    }
    fn includes(&self, c: Coord) -> bool {
        (**self).includes(c)
    }
}
