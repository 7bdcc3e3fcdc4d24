//! Materialized coordinate sets.

use crate::coord::Coord;
use crate::error::CoordError;
use crate::random::RandomSource;
use crate::set::CoordSet;
use std::collections::HashSet;

/// A finite set backed by a vector, enumerated in insertion order unless
/// randomized.
#[derive(Debug, Clone, Default)]
pub struct ArrayCoordSet {
    coords: Vec<Coord>,
    members: HashSet<Coord>,
    order: Option<Vec<usize>>,
    pos: usize,
}

impl ArrayCoordSet {
    pub fn new(coords: Vec<Coord>) -> Self {
        let members = coords.iter().copied().collect();
        Self {
            coords,
            members,
            order: None,
            pos: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The coordinates in insertion order, ignoring any randomization.
    pub fn as_slice(&self) -> &[Coord] {
        &self.coords
    }

    pub fn push(&mut self, c: Coord) {
        self.members.insert(c);
        self.coords.push(c);
        if let Some(order) = &mut self.order {
            order.push(self.coords.len() - 1);
        }
    }
}

impl FromIterator<Coord> for ArrayCoordSet {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl CoordSet for ArrayCoordSet {
    fn rewind(&mut self) {
        self.pos = 0;
    }

    fn next_coord(&mut self) -> Option<Coord> {
        let idx = match &self.order {
            Some(order) => *order.get(self.pos)?,
            None => self.pos,
        };
        let c = self.coords.get(idx).copied()?;
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
        let mut order: Vec<usize> = (0..self.coords.len()).collect();
        rng.shuffle(&mut order);
        self.order = Some(order);
        if rewind {
            self.rewind();
        }
        Ok(())
    }

    fn count(&mut self, _exact: bool) -> Result<usize, CoordError> {
        Ok(self.coords.len())
    }

    fn includes(&self, c: Coord) -> bool {
        self.members.contains(&c)
    }
}
