//! Rings of constant octahedral radius within one z layer.

use crate::coord::Coord;
use crate::line::Line;
use crate::shape::{LineSource, Shape};

/// One side of the square ring of radius `r > 0` around `center`.
///
/// Sides run counter-clockwise and each covers `2r` cells, so the four
/// sides tile the ring without overlap.
pub(crate) fn ring_side(center: Coord, r: i32, side: usize) -> Line {
    let (corner, delta) = match side & 3 {
        0 => (Coord::new(-r, -r, 0), Coord::new(1, 0, 0)),
        1 => (Coord::new(r, -r, 0), Coord::new(0, 1, 0)),
        2 => (Coord::new(r, r, 0), Coord::new(-1, 0, 0)),
        _ => (Coord::new(-r, r, 0), Coord::new(0, -1, 0)),
    };
    Line::segment(center.plus(corner), delta, (2 * r) as u32)
}

/// Geometry of a [`Circle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    pub center: Coord,
    pub radius: i32,
}

impl LineSource for Ring {
    fn line(&mut self, index: usize) -> Option<Line> {
        match self.radius {
            r if r < 0 => None,
            0 => (index == 0).then(|| Line::point(self.center)),
            r => (index < 4).then(|| ring_side(self.center, r, index)),
        }
    }

    fn contains(&self, c: Coord) -> bool {
        let d = c.minus(self.center);
        self.radius >= 0 && d.z == 0 && d.x.abs().max(d.y.abs()) == self.radius
    }

    fn line_count(&self) -> Option<usize> {
        Some(match self.radius {
            r if r < 0 => 0,
            0 => 1,
            _ => 4,
        })
    }

    fn coord_count(&self) -> Option<usize> {
        Some(match self.radius {
            r if r < 0 => 0,
            0 => 1,
            r => 8 * r as usize,
        })
    }
}

/// The cells at exactly octahedral radius `r` from a center, in its layer.
pub type Circle = Shape<Ring>;

impl Shape<Ring> {
    pub fn new(center: Coord, radius: i32) -> Self {
        Shape::from_source(Ring { center, radius })
    }
}
