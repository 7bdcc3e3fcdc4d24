//! The 3D integer coordinate value type and the octahedral metric.

use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Octahedral distance of an offset: Chebyshev within a layer, Manhattan
/// across layers.
///
/// Sphere enumeration and radius membership tests both go through this
/// function, so shells and filters always agree on what "radius r" means.
pub fn octahedral_distance(dx: i32, dy: i32, dz: i32) -> i32 {
    dx.abs().max(dy.abs()) + dz.abs()
}

/// A cell position in the voxel world.
///
/// Plain value type: equal triples compare and hash equal, so a `Coord` can
/// key hash sets and maps directly.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coord {
    pub const ZERO: Coord = Coord { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn plus(self, other: Coord) -> Coord {
        Coord::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn minus(self, other: Coord) -> Coord {
        Coord::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Scale every axis by `k`.
    pub fn times(self, k: i32) -> Coord {
        Coord::new(self.x * k, self.y * k, self.z * k)
    }

    /// `self + other * k`, the step used to walk along a line. `None` when
    /// any axis leaves the `i32` range.
    pub fn checked_plus_times(self, other: Coord, k: i64) -> Option<Coord> {
        fn axis(v: i32, d: i32, k: i64) -> Option<i32> {
            let moved = i64::from(d).checked_mul(k)?.checked_add(i64::from(v))?;
            i32::try_from(moved).ok()
        }
        Some(Coord::new(
            axis(self.x, other.x, k)?,
            axis(self.y, other.y, k)?,
            axis(self.z, other.z, k)?,
        ))
    }

    pub fn negate(self) -> Coord {
        Coord::new(-self.x, -self.y, -self.z)
    }

    /// Per-axis euclidean remainder. An axis with a zero divisor keeps its
    /// value, so `c.modulo(d) == ZERO` means every non-zero axis of `d`
    /// divides `c` and every zero axis of `d` is zero in `c`.
    pub fn modulo(self, divisor: Coord) -> Coord {
        fn axis(v: i32, d: i32) -> i32 {
            if d == 0 { v } else { v.rem_euclid(d) }
        }
        Coord::new(
            axis(self.x, divisor.x),
            axis(self.y, divisor.y),
            axis(self.z, divisor.z),
        )
    }

    /// Floor division of every axis by `k`. Returns `None` for `k == 0`.
    pub fn whole_divide(self, k: i32) -> Option<Coord> {
        if k == 0 {
            return None;
        }
        Some(Coord::new(
            self.x.div_euclid(k),
            self.y.div_euclid(k),
            self.z.div_euclid(k),
        ))
    }

    /// Division of every axis by `k`, rounded to the nearest integer
    /// (halves away from zero). Returns `None` for `k == 0`.
    pub fn rough_divide(self, k: i32) -> Option<Coord> {
        if k == 0 {
            return None;
        }
        let axis = |v: i32| (v as f64 / k as f64).round() as i32;
        Some(Coord::new(axis(self.x), axis(self.y), axis(self.z)))
    }

    /// Octahedral distance between two cells.
    pub fn distance_to(self, other: Coord) -> i32 {
        let d = other.minus(self);
        octahedral_distance(d.x, d.y, d.z)
    }

    pub fn below(self) -> Coord {
        Coord::new(self.x, self.y, self.z - 1)
    }

    pub fn above(self) -> Coord {
        Coord::new(self.x, self.y, self.z + 1)
    }

    pub fn to_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Coord {
    type Output = Coord;
    fn add(self, rhs: Coord) -> Coord {
        self.plus(rhs)
    }
}

impl Sub for Coord {
    type Output = Coord;
    fn sub(self, rhs: Coord) -> Coord {
        self.minus(rhs)
    }
}

impl Neg for Coord {
    type Output = Coord;
    fn neg(self) -> Coord {
        self.negate()
    }
}

impl Mul<i32> for Coord {
    type Output = Coord;
    fn mul(self, k: i32) -> Coord {
        self.times(k)
    }
}

impl From<IVec3> for Coord {
    fn from(v: IVec3) -> Self {
        Coord::new(v.x, v.y, v.z)
    }
}

impl From<Coord> for IVec3 {
    fn from(c: Coord) -> Self {
        IVec3::new(c.x, c.y, c.z)
    }
}

impl From<[i32; 3]> for Coord {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Coord::new(x, y, z)
    }
}
