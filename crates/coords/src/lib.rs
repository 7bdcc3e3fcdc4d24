//! Lazy 3D coordinate sets for spatial queries over a voxel world.
//!
//! Everything here implements [`CoordSet`]: a rewindable cursor that can be
//! counted, filtered, limited, mapped, materialized or randomized.
//!
//! # Sets
//! - [`ArrayCoordSet`]: an explicit list
//! - [`Line`]: `origin + k * delta`, possibly infinite at either end
//! - [`Circle`], [`Sphere`], [`NearbyCoords`], [`BoxCoords`]: [`Shape`]s
//!   built from lines discovered on demand
//! - [`SpreadCoords`]: breadth-first flood fill with a three-way test
//!
//! # Invariants
//! - Distance is octahedral everywhere: `max(|dx|, |dy|) + |dz|`.
//! - A rewound set enumerates the same multiset again.
//! - Unbounded sets refuse to randomize, count exactly, or materialize.

pub mod array;
pub mod bbox;
pub mod circle;
pub mod coord;
pub mod derived;
pub mod error;
pub mod line;
pub mod nearby;
pub mod random;
pub mod set;
pub mod shape;
pub mod sphere;
pub mod spread;

#[cfg(test)]
pub(crate) mod compliance;

pub use array::ArrayCoordSet;
pub use bbox::{Aabb, BoundingBox, BoxCoords};
pub use circle::{Circle, Ring};
pub use coord::{Coord, octahedral_distance};
pub use derived::{FilteredCoords, LimitedCoords, MappedCoords};
pub use error::CoordError;
pub use line::Line;
pub use nearby::{NearbyCoords, Shells};
pub use random::RandomSource;
pub use set::{CoordIter, CoordSet, UNBOUNDED};
pub use shape::{LineSource, Shape};
pub use sphere::{Ball, Sphere, neighbours};
pub use spread::{Spread, SpreadCoords};

pub fn crate_info() -> &'static str {
    "delve-coords v0.1.0"
}
