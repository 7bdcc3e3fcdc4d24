//! Arithmetic progressions of coordinates, finite or infinite at either end.

use crate::coord::Coord;
use crate::error::CoordError;
use crate::random::RandomSource;
use crate::set::{CoordSet, UNBOUNDED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    /// Index `base + dir * k` for `k` in `0..len`.
    Finite { len: u64 },
    /// Index `base + dir * k` for `k = 0, 1, 2, ...`.
    Outward,
    /// Index `k` for `k = 0, 1, -1, 2, -2, ...`.
    Alternating,
}

/// The coordinates `origin + k * delta` for `k` in `[min, max]`.
///
/// `None` for a bound means that end is infinite. Enumeration of a one-ended
/// line proceeds outward from its finite end; a doubly infinite line
/// proceeds outward from `origin`, alternating sides. Enumeration ends at
/// the first coordinate that would leave the `i32` range.
#[derive(Debug, Clone)]
pub struct Line {
    origin: Coord,
    delta: Coord,
    min: Option<i32>,
    max: Option<i32>,
    /// Index of the first coordinate handed out.
    base: i64,
    /// `1` to walk towards increasing indices, `-1` for decreasing.
    dir: i64,
    walk: Walk,
    order: Option<Vec<u64>>,
    pos: u64,
}

impl Line {
    pub fn new(origin: Coord, delta: Coord, min: Option<i32>, max: Option<i32>) -> Self {
        let (base, dir, walk) = match (min, max) {
            (Some(lo), Some(hi)) => {
                let (first, last) = representable(origin, delta);
                let lo = i64::from(lo).max(first);
                let hi = i64::from(hi).min(last);
                let len = u64::try_from(hi - lo + 1).unwrap_or(0);
                (lo, 1, Walk::Finite { len })
            }
            (Some(lo), None) => (i64::from(lo), 1, Walk::Outward),
            (None, Some(hi)) => (i64::from(hi), -1, Walk::Outward),
            (None, None) => (0, 1, Walk::Alternating),
        };
        Self {
            origin,
            delta,
            min,
            max,
            base,
            dir,
            walk,
            order: None,
            pos: 0,
        }
    }

    /// `len` cells starting at `origin`, stepping by `delta`. Indices stop
    /// at `i32::MAX`, so longer segments are clamped to `2^31` cells.
    pub fn segment(origin: Coord, delta: Coord, len: u32) -> Self {
        let last = i64::from(len) - 1;
        Self::new(origin, delta, Some(0), Some(i32::try_from(last).unwrap_or(i32::MAX)))
    }

    /// A line holding exactly one coordinate.
    pub fn point(c: Coord) -> Self {
        Self::new(c, Coord::ZERO, Some(0), Some(0))
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn delta(&self) -> Coord {
        self.delta
    }

    pub fn bounds(&self) -> (Option<i32>, Option<i32>) {
        (self.min, self.max)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.walk, Walk::Finite { len: 0 })
    }

    fn offset_at(&self, n: u64) -> i64 {
        match self.walk {
            Walk::Finite { .. } | Walk::Outward => n as i64,
            Walk::Alternating => {
                if n % 2 == 1 {
                    n.div_ceil(2) as i64
                } else {
                    -((n / 2) as i64)
                }
            }
        }
    }

    /// The index `k` with `origin + k * delta == c`, if any, ignoring bounds.
    fn index_of(&self, c: Coord) -> Option<i64> {
        let axes = [
            (i64::from(c.x) - i64::from(self.origin.x), i64::from(self.delta.x)),
            (i64::from(c.y) - i64::from(self.origin.y), i64::from(self.delta.y)),
            (i64::from(c.z) - i64::from(self.origin.z), i64::from(self.delta.z)),
        ];
        let k = match axes.iter().find(|&&(_, d)| d != 0) {
            Some(&(v, d)) if v % d == 0 => v / d,
            Some(_) => return None,
            None => 0,
        };
        axes.iter().all(|&(v, d)| d.checked_mul(k) == Some(v)).then_some(k)
    }
}

/// The widest index range `[first, last]` whose cells `origin + k * delta`
/// all fit in `i32`.
fn representable(origin: Coord, delta: Coord) -> (i64, i64) {
    fn floor_div(a: i64, d: i64) -> i64 {
        let q = a / d;
        if a % d != 0 && (a < 0) != (d < 0) { q - 1 } else { q }
    }
    let (lo, hi) = (i64::from(i32::MIN), i64::from(i32::MAX));
    [(origin.x, delta.x), (origin.y, delta.y), (origin.z, delta.z)]
        .into_iter()
        .filter(|&(_, d)| d != 0)
        .fold((i64::MIN, i64::MAX), |(first, last), (o, d)| {
            let (o, d) = (i64::from(o), i64::from(d));
            let (a, b) = if d > 0 { (lo - o, hi - o) } else { (hi - o, lo - o) };
            (first.max(-floor_div(-a, d)), last.min(floor_div(b, d)))
        })
}

impl CoordSet for Line {
    fn rewind(&mut self) {
        self.pos = 0;
    }

    fn next_coord(&mut self) -> Option<Coord> {
        let k = match (&self.order, self.walk) {
            (Some(order), _) => i64::try_from(*order.get(usize::try_from(self.pos).ok()?)?).ok()?,
            (None, Walk::Finite { len }) if self.pos >= len => return None,
            (None, _) => self.offset_at(self.pos),
        };
        let index = self.base.checked_add(self.dir.checked_mul(k)?)?;
        let c = self.origin.checked_plus_times(self.delta, index)?;
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
        let Walk::Finite { len } = self.walk else {
            return Err(CoordError::Unbounded { op: "randomize" });
        };
        let mut order: Vec<u64> = (0..len).collect();
        rng.shuffle(&mut order);
        self.order = Some(order);
        if rewind {
            self.rewind();
        }
        Ok(())
    }

    fn potentially_unbounded(&self) -> bool {
        !matches!(self.walk, Walk::Finite { .. })
    }

    fn count(&mut self, exact: bool) -> Result<usize, CoordError> {
        match self.walk {
            Walk::Finite { len } => Ok(usize::try_from(len).unwrap_or(UNBOUNDED)),
            _ if exact => Err(CoordError::Unbounded { op: "count" }),
            _ => Ok(UNBOUNDED),
        }
    }

    fn includes(&self, c: Coord) -> bool {
        let Some(k) = self.index_of(c) else {
            return false;
        };
        if self.delta == Coord::ZERO {
            return match (self.min, self.max) {
                (Some(lo), Some(hi)) => lo <= hi,
                _ => true,
            };
        }
        self.min.is_none_or(|lo| k >= i64::from(lo)) && self.max.is_none_or(|hi| k <= i64::from(hi))
    }
}
