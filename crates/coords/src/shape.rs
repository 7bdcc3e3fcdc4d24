//! Shapes: coordinate sets assembled from a lazily discovered list of lines.

use crate::coord::Coord;
use crate::error::CoordError;
use crate::line::Line;
use crate::random::RandomSource;
use crate::set::{CoordSet, UNBOUNDED};

/// Geometry that can be described as an ordered list of lines.
///
/// `line(i)` is asked for `i = 0, 1, 2, ...` after every `restart`; the
/// first `None` ends the shape. Implementations may keep discovery state
/// between calls but must accept any index at or past the last one asked.
pub trait LineSource {
    /// Line `index`, or `None` once there are no more lines.
    fn line(&mut self, index: usize) -> Option<Line>;

    /// Exact membership test for the coordinates the lines cover.
    fn contains(&self, c: Coord) -> bool;

    /// Called when the owning shape rewinds.
    fn restart(&mut self) {}

    fn unbounded(&self) -> bool {
        false
    }

    /// Number of lines, when known without discovering them.
    fn line_count(&self) -> Option<usize> {
        None
    }

    /// Number of coordinates, when known without enumerating them.
    fn coord_count(&self) -> Option<usize> {
        None
    }
}

/// Weighted round-robin state for a randomized shape.
#[derive(Debug, Clone)]
struct RoundRobin {
    rng: RandomSource,
    lines: Vec<Line>,
    remaining: Vec<usize>,
    live: Vec<bool>,
}

impl RoundRobin {
    fn rewind(&mut self) {
        for (i, line) in self.lines.iter_mut().enumerate() {
            line.rewind();
            self.remaining[i] = line.count(false).unwrap_or(0);
            self.live[i] = true;
        }
    }

    /// Draw from a line chosen with probability proportional to its
    /// remaining supply. Exhausted-but-unconfirmed lines keep weight 1 so a
    /// draw can discover the exhaustion and retire them.
    fn draw(&mut self) -> Option<Coord> {
        loop {
            let weights: Vec<f64> = self
                .remaining
                .iter()
                .zip(&self.live)
                .map(|(&r, &live)| if live { r.max(1) as f64 } else { 0.0 })
                .collect();
            let i = self.rng.weighted(&weights)?;
            match self.lines[i].next_coord() {
                Some(c) => {
                    self.remaining[i] = self.remaining[i].saturating_sub(1);
                    return Some(c);
                }
                None => self.live[i] = false,
            }
        }
    }
}

/// A [`CoordSet`] over the lines of a [`LineSource`].
///
/// In order, each line is drained before the next is discovered. Once
/// randomized, every line is shuffled and draws interleave across lines by
/// weighted round-robin, so consecutive coordinates come from spatially
/// distinct lines rather than one ring at a time.
#[derive(Debug, Clone)]
pub struct Shape<S> {
    source: S,
    next_line: usize,
    current: Option<Line>,
    done: bool,
    random: Option<RoundRobin>,
    /// Coordinates handed out since the last rewind.
    yielded: usize,
}

impl<S: LineSource> Shape<S> {
    pub fn from_source(source: S) -> Self {
        let mut shape = Self {
            source,
            next_line: 0,
            current: None,
            done: false,
            random: None,
            yielded: 0,
        };
        shape.rewind();
        shape
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Line `index` of the underlying geometry.
    pub fn get_line(&mut self, index: usize) -> Option<Line> {
        self.source.line(index)
    }

    pub fn count_lines(&self) -> Option<usize> {
        self.source.line_count()
    }

    fn advance(&mut self) -> Option<Coord> {
        if let Some(rr) = &mut self.random {
            return rr.draw();
        }
        if self.done {
            return None;
        }
        loop {
            if let Some(c) = self.current.as_mut().and_then(Line::next_coord) {
                return Some(c);
            }
            match self.source.line(self.next_line) {
                Some(mut line) => {
                    line.reset(true);
                    self.next_line += 1;
                    self.current = Some(line);
                }
                None => {
                    self.current = None;
                    self.done = true;
                    return None;
                }
            }
        }
    }
}

impl<S: LineSource> CoordSet for Shape<S> {
    fn rewind(&mut self) {
        self.yielded = 0;
        if let Some(rr) = &mut self.random {
            rr.rewind();
            return;
        }
        self.source.restart();
        self.next_line = 0;
        self.current = None;
        self.done = false;
    }

    fn next_coord(&mut self) -> Option<Coord> {
        let c = self.advance()?;
        self.yielded += 1;
        Some(c)
    }

    fn reset(&mut self, rewind: bool) {
        self.random = None;
        if rewind {
            self.rewind();
        }
    }

    /// Without `rewind`, the position carries over: as many draws as were
    /// already handed out since the last rewind are skipped.
    fn randomize(&mut self, rng: &RandomSource, rewind: bool) -> Result<(), CoordError> {
        if self.source.unbounded() {
            return Err(CoordError::Unbounded { op: "randomize" });
        }
        let skip = if rewind { 0 } else { self.yielded };
        self.source.restart();
        let mut lines = Vec::new();
        while let Some(mut line) = self.source.line(lines.len()) {
            line.randomize(rng, true)?;
            lines.push(line);
        }
        let n = lines.len();
        let mut rr = RoundRobin {
            rng: rng.clone(),
            lines,
            remaining: vec![0; n],
            live: vec![true; n],
        };
        rr.rewind();
        for _ in 0..skip {
            if rr.draw().is_none() {
                break;
            }
        }
        self.random = Some(rr);
        self.next_line = 0;
        self.current = None;
        self.done = false;
        self.yielded = skip;
        Ok(())
    }

    fn potentially_unbounded(&self) -> bool {
        self.source.unbounded()
    }

    /// Uses the geometry's closed-form count when it has one; otherwise
    /// sums line counts, which rewinds the shape.
    fn count(&mut self, exact: bool) -> Result<usize, CoordError> {
        if self.source.unbounded() {
            return if exact {
                Err(CoordError::Unbounded { op: "count" })
            } else {
                Ok(UNBOUNDED)
            };
        }
        if let Some(n) = self.source.coord_count() {
            return Ok(n);
        }
        self.source.restart();
        let mut total = 0;
        let mut i = 0;
        while let Some(mut line) = self.source.line(i) {
            total += line.count(exact)?;
            i += 1;
        }
        self.rewind();
        Ok(total)
    }

    fn includes(&self, c: Coord) -> bool {
        self.source.contains(c)
    }
}
