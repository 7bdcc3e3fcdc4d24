//! Shells of constant octahedral radius, stacked rings across z layers.

use crate::circle::ring_side;
use crate::coord::Coord;
use crate::line::Line;
use crate::shape::{LineSource, Shape};

/// Geometry of a [`Sphere`].
///
/// Line 0 is the bottom apex. Lines `1..=4L` are the four sides of each of
/// the `L = 2r - 1` intermediate layers, indexed as
/// `(layer, side) = ((i - 1) >> 2, (i - 1) & 3)` with layer radius
/// `r - |dz|`. The last line is the top apex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ball {
    pub center: Coord,
    pub radius: i32,
}

impl Ball {
    fn layers(&self) -> usize {
        (2 * self.radius - 1).max(0) as usize
    }

    pub(crate) fn lines(&self) -> usize {
        match self.radius {
            r if r < 0 => 0,
            0 => 1,
            _ => 4 * self.layers() + 2,
        }
    }

    pub(crate) fn cells(&self) -> usize {
        match self.radius {
            r if r < 0 => 0,
            0 => 1,
            r => 8 * (r as usize) * (r as usize) + 2,
        }
    }
}

impl LineSource for Ball {
    fn line(&mut self, index: usize) -> Option<Line> {
        let r = self.radius;
        if r < 0 {
            return None;
        }
        if r == 0 {
            return (index == 0).then(|| Line::point(self.center));
        }
        let layers = self.layers();
        if index == 0 {
            return Some(Line::point(self.center.plus(Coord::new(0, 0, -r))));
        }
        if index == 4 * layers + 1 {
            return Some(Line::point(self.center.plus(Coord::new(0, 0, r))));
        }
        if index > 4 * layers + 1 {
            return None;
        }
        let (layer, side) = ((index - 1) >> 2, (index - 1) & 3);
        let dz = -r + 1 + layer as i32;
        let layer_center = self.center.plus(Coord::new(0, 0, dz));
        Some(ring_side(layer_center, r - dz.abs(), side))
    }

    fn contains(&self, c: Coord) -> bool {
        self.radius >= 0 && self.center.distance_to(c) == self.radius
    }

    fn line_count(&self) -> Option<usize> {
        Some(self.lines())
    }

    fn coord_count(&self) -> Option<usize> {
        Some(self.cells())
    }
}

/// The cells at exactly octahedral radius `r` from a center.
///
/// Radius 1 is the ten-cell octahedral neighbourhood used for adjacency.
pub type Sphere = Shape<Ball>;

impl Shape<Ball> {
    pub fn new(center: Coord, radius: i32) -> Self {
        Shape::from_source(Ball { center, radius })
    }
}

/// The octahedral neighbours of `c`: eight in its layer plus above and below.
pub fn neighbours(c: Coord) -> impl Iterator<Item = Coord> {
    (-1..=1)
        .flat_map(move |dz: i32| {
            let r = 1 - dz.abs();
            (-r..=r).flat_map(move |dy| (-r..=r).map(move |dx| Coord::new(dx, dy, dz)))
        })
        .filter(|d| *d != Coord::ZERO)
        .map(move |d| c.plus(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use crate::random::RandomSource;
    use crate::set::CoordSet;
    use std::collections::HashSet;

    #[test]
    fn yields_count_lines_non_empty_lines() {
        for r in 0..6 {
            let mut sphere = Sphere::new(Coord::new(1, 2, 3), r);
            let n = sphere.count_lines().unwrap();
            for i in 0..n {
                let mut line = sphere.get_line(i).expect("line within count");
                assert!(line.count(true).unwrap() > 0, "r={r} line {i} is empty");
            }
            assert!(sphere.get_line(n).is_none(), "r={r} has a line past count");
        }
    }

    #[test]
    fn shell_cells_are_unique_and_at_radius() {
        for r in 0..6 {
            let center = Coord::new(-4, 0, 2);
            let mut sphere = Sphere::new(center, r);
            let coords = sphere.get_coords(None).unwrap();
            let unique: HashSet<Coord> = coords.iter().copied().collect();
            assert_eq!(unique.len(), coords.len());
            assert_eq!(coords.len(), sphere.count(true).unwrap());
            assert!(coords.iter().all(|c| center.distance_to(*c) == r));
        }
    }

    #[test]
    fn shell_matches_brute_force() {
        let center = Coord::ZERO;
        let r = 3;
        let mut expected = Vec::new();
        for z in -r..=r {
            for y in -r..=r {
                for x in -r..=r {
                    let c = Coord::new(x, y, z);
                    if center.distance_to(c) == r {
                        expected.push(c);
                    }
                }
            }
        }
        compliance::assert_same_multiset(&mut Sphere::new(center, r), &expected);
    }

    #[test]
    fn radius_one_is_the_neighbourhood() {
        let c = Coord::new(5, 5, 5);
        let from_sphere: HashSet<Coord> =
            Sphere::new(c, 1).get_coords(None).unwrap().into_iter().collect();
        let from_fn: HashSet<Coord> = neighbours(c).collect();
        assert_eq!(from_sphere.len(), 10);
        assert_eq!(from_sphere, from_fn);
    }

    #[test]
    fn sphere_contract() {
        compliance::assert_finite_contract(
            &mut Sphere::new(Coord::new(0, 0, 0), 2),
            &RandomSource::from_seed(8),
        );
    }

    #[test]
    fn randomized_draws_interleave_layers() {
        let rng = RandomSource::from_seed(21);
        let mut sphere = Sphere::new(Coord::ZERO, 4);
        sphere.randomize(&rng, true).unwrap();
        let first: Vec<i32> = sphere
            .get_coords(Some(12))
            .unwrap()
            .iter()
            .map(|c| c.z)
            .collect();
        let layers: HashSet<i32> = first.into_iter().collect();
        assert!(layers.len() > 1, "draws should not drain one layer first");
    }
}
