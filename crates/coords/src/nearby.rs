//! Expanding-shell search around an origin.

use crate::coord::Coord;
use crate::line::Line;
use crate::shape::{LineSource, Shape};
use crate::sphere::Ball;

/// Geometry of [`NearbyCoords`]: the spheres of radius `min..=max` around
/// `origin`, discovered one shell at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shells {
    origin: Coord,
    min_radius: i32,
    max_radius: Option<i32>,
    radius: i32,
    offset: usize,
}

impl Shells {
    pub fn new(origin: Coord, min_radius: i32, max_radius: Option<i32>) -> Self {
        let min_radius = min_radius.max(0);
        Self {
            origin,
            min_radius,
            max_radius,
            radius: min_radius,
            offset: 0,
        }
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn radii(&self) -> (i32, Option<i32>) {
        (self.min_radius, self.max_radius)
    }

    fn bounded_radii(&self) -> Option<std::ops::RangeInclusive<i32>> {
        self.max_radius.map(|max| self.min_radius..=max)
    }
}

impl LineSource for Shells {
    fn line(&mut self, index: usize) -> Option<Line> {
        if index < self.offset {
            self.restart();
        }
        loop {
            if self.max_radius.is_some_and(|max| self.radius > max) {
                return None;
            }
            let mut shell = Ball {
                center: self.origin,
                radius: self.radius,
            };
            if let Some(line) = shell.line(index - self.offset) {
                return Some(line);
            }
            // This shell is exhausted; the next index starts the next shell.
            self.offset += shell.lines();
            self.radius += 1;
        }
    }

    fn contains(&self, c: Coord) -> bool {
        let d = self.origin.distance_to(c);
        d >= self.min_radius && self.max_radius.is_none_or(|max| d <= max)
    }

    fn restart(&mut self) {
        self.radius = self.min_radius;
        self.offset = 0;
    }

    fn unbounded(&self) -> bool {
        self.max_radius.is_none()
    }

    fn line_count(&self) -> Option<usize> {
        let radii = self.bounded_radii()?;
        Some(
            radii
                .map(|radius| Ball { center: self.origin, radius }.lines())
                .sum(),
        )
    }

    fn coord_count(&self) -> Option<usize> {
        let radii = self.bounded_radii()?;
        Some(
            radii
                .map(|radius| Ball { center: self.origin, radius }.cells())
                .sum(),
        )
    }
}

/// Cells within `[min_radius, max_radius]` of an origin, nearest shells
/// first. `max_radius = None` searches outward forever.
pub type NearbyCoords = Shape<Shells>;

impl Shape<Shells> {
    pub fn new(origin: Coord, min_radius: i32, max_radius: Option<i32>) -> Self {
        Shape::from_source(Shells::new(origin, min_radius, max_radius))
    }
}
