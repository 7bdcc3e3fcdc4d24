//! Axis-aligned boxes: dense regions of cells.

use crate::coord::Coord;
use crate::line::Line;
use crate::shape::{LineSource, Shape};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An inclusive, axis-aligned box of cells.
///
/// A box whose `min` exceeds its `max` on any axis is empty. The mutators
/// work in place and return `&mut Self` for chaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Coord,
    pub max: Coord,
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
    Z,
}

fn axis_range(b: &mut BoundingBox, axis: Axis) -> (&mut i32, &mut i32) {
    match axis {
        Axis::X => (&mut b.min.x, &mut b.max.x),
        Axis::Y => (&mut b.min.y, &mut b.max.y),
        Axis::Z => (&mut b.min.z, &mut b.max.z),
    }
}

impl BoundingBox {
    pub const EMPTY: BoundingBox = BoundingBox {
        min: Coord::new(0, 0, 0),
        max: Coord::new(-1, -1, -1),
    };

    pub fn new(min: Coord, max: Coord) -> Self {
        Self { min, max }
    }

    /// `w * h * d` cells with the minimum corner at `(x, y, z)`.
    pub fn from_origin_size(x: i32, y: i32, z: i32, w: i32, h: i32, d: i32) -> Self {
        let min = Coord::new(x, y, z);
        Self::new(min, min.plus(Coord::new(w - 1, h - 1, d - 1)))
    }

    /// A box of `size` cells roughly centred on `center`. Even sizes put the
    /// extra cell on the low side.
    pub fn from_center_size(center: Coord, size: Coord) -> Self {
        let min = center.minus(Coord::new(size.x / 2, size.y / 2, size.z / 2));
        Self::new(min, min.plus(size).minus(Coord::new(1, 1, 1)))
    }

    /// The cube of cells within Chebyshev radius `r` of `center`.
    pub fn from_center_radius(center: Coord, r: i32) -> Self {
        let r = Coord::new(r, r, r);
        Self::new(center.minus(r), center.plus(r))
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Cell extents per axis; zero on every axis when empty.
    pub fn size(&self) -> Coord {
        if self.is_empty() {
            return Coord::ZERO;
        }
        self.max.minus(self.min).plus(Coord::new(1, 1, 1))
    }

    pub fn volume(&self) -> usize {
        let s = self.size();
        s.x as usize * s.y as usize * s.z as usize
    }

    pub fn contains(&self, c: Coord) -> bool {
        (self.min.x..=self.max.x).contains(&c.x)
            && (self.min.y..=self.max.y).contains(&c.y)
            && (self.min.z..=self.max.z).contains(&c.z)
    }

    /// The eight corner cells, min corner first. Empty boxes have none.
    pub fn corners(&self) -> Option<[Coord; 8]> {
        if self.is_empty() {
            return None;
        }
        let (lo, hi) = (self.min, self.max);
        Some([
            Coord::new(lo.x, lo.y, lo.z),
            Coord::new(hi.x, lo.y, lo.z),
            Coord::new(lo.x, hi.y, lo.z),
            Coord::new(hi.x, hi.y, lo.z),
            Coord::new(lo.x, lo.y, hi.z),
            Coord::new(hi.x, lo.y, hi.z),
            Coord::new(lo.x, hi.y, hi.z),
            Coord::new(hi.x, hi.y, hi.z),
        ])
    }

    /// Middle cell, rounding halves away from zero.
    pub fn center(&self) -> Option<Coord> {
        if self.is_empty() {
            return None;
        }
        self.min.plus(self.max).rough_divide(2)
    }

    pub fn translate(&mut self, by: Coord) -> &mut Self {
        self.min = self.min.plus(by);
        self.max = self.max.plus(by);
        self
    }

    /// Grow (or shrink, for negative `n`) every face by `n` cells.
    pub fn expand(&mut self, n: i32) -> &mut Self {
        let d = Coord::new(n, n, n);
        self.min = self.min.minus(d);
        self.max = self.max.plus(d);
        self
    }

    /// Shrink to the overlap with `other`; disjoint boxes become empty.
    pub fn intersect(&mut self, other: &BoundingBox) -> &mut Self {
        self.min = Coord::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.min.z.max(other.min.z),
        );
        self.max = Coord::new(
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
            self.max.z.min(other.max.z),
        );
        self
    }

    /// Grow just enough to contain `c`.
    pub fn encapsulate(&mut self, c: Coord) -> &mut Self {
        if self.is_empty() {
            self.min = c;
            self.max = c;
            return self;
        }
        self.min = Coord::new(self.min.x.min(c.x), self.min.y.min(c.y), self.min.z.min(c.z));
        self.max = Coord::new(self.max.x.max(c.x), self.max.y.max(c.y), self.max.z.max(c.z));
        self
    }

    /// Grow just enough to contain `other`.
    pub fn encapsulate_box(&mut self, other: &BoundingBox) -> &mut Self {
        if other.is_empty() {
            return self;
        }
        self.encapsulate(other.min);
        self.encapsulate(other.max)
    }

    fn subdivide(&mut self, axis: Axis, n: u32, i: u32) -> &mut Self {
        if n == 0 || i >= n || self.is_empty() {
            *self = Self::EMPTY;
            return self;
        }
        let (lo, hi) = axis_range(self, axis);
        let len = (*hi - *lo + 1) as i64;
        let (n, i) = (n as i64, i as i64);
        // Rounded len * k / n, in integers.
        let cut = |k: i64| (2 * len * k + n) / (2 * n);
        let start = *lo as i64;
        *hi = (start + cut(i + 1) - 1) as i32;
        *lo = (start + cut(i)) as i32;
        self
    }

    /// Keep section `i` of `n` equal, integer-rounded slices along x.
    pub fn subdivide_x(&mut self, n: u32, i: u32) -> &mut Self {
        self.subdivide(Axis::X, n, i)
    }

    /// Keep section `i` of `n` equal, integer-rounded slices along y.
    pub fn subdivide_y(&mut self, n: u32, i: u32) -> &mut Self {
        self.subdivide(Axis::Y, n, i)
    }

    /// Keep section `i` of `n` equal, integer-rounded slices along z; used
    /// for depth bands.
    pub fn subdivide_z(&mut self, n: u32, i: u32) -> &mut Self {
        self.subdivide(Axis::Z, n, i)
    }

    /// The continuous volume these cells occupy, cell `i` spanning `[i, i+1)`.
    pub fn to_aabb(&self) -> Aabb {
        let to_vec = |c: Coord| Vec3::new(c.x as f32, c.y as f32, c.z as f32);
        Aabb {
            min: to_vec(self.min),
            max: to_vec(self.max.plus(Coord::new(1, 1, 1))),
        }
    }

    /// Enumerate the cells row by row (x fastest, then y, then z).
    pub fn coords(&self) -> BoxCoords {
        Shape::from_source(*self)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl LineSource for BoundingBox {
    fn line(&mut self, index: usize) -> Option<Line> {
        let size = self.size();
        let rows = size.y as usize * size.z as usize;
        if index >= rows {
            return None;
        }
        let y = self.min.y + (index % size.y as usize) as i32;
        let z = self.min.z + (index / size.y as usize) as i32;
        Some(Line::segment(
            Coord::new(self.min.x, y, z),
            Coord::new(1, 0, 0),
            size.x as u32,
        ))
    }

    fn contains(&self, c: Coord) -> bool {
        BoundingBox::contains(self, c)
    }

    fn line_count(&self) -> Option<usize> {
        let size = self.size();
        Some(size.y as usize * size.z as usize)
    }

    fn coord_count(&self) -> Option<usize> {
        Some(self.volume())
    }
}

/// The cells of a [`BoundingBox`] as a coordinate set.
pub type BoxCoords = Shape<BoundingBox>;

/// A box with fractional corners, snapped to cells by `round`, `floor`
/// or `ceil`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    fn cells(min: Vec3, max_exclusive: Vec3) -> BoundingBox {
        let to_coord = |v: Vec3| Coord::new(v.x as i32, v.y as i32, v.z as i32);
        BoundingBox::new(
            to_coord(min),
            to_coord(max_exclusive).minus(Coord::new(1, 1, 1)),
        )
    }

    /// Cells whose span is nearest to this volume.
    pub fn round(&self) -> BoundingBox {
        Self::cells(self.min.round(), self.max.round())
    }

    /// Cells lying entirely inside this volume (inscribed).
    pub fn floor(&self) -> BoundingBox {
        Self::cells(self.min.ceil(), self.max.floor())
    }

    /// Cells touching this volume (circumscribed).
    pub fn ceil(&self) -> BoundingBox {
        Self::cells(self.min.floor(), self.max.ceil())
    }
}
