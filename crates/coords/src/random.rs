//! The shared pseudo-random source.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cell::RefCell;
use std::rc::Rc;

/// A cloneable handle to one seeded ChaCha8 stream.
///
/// Every clone draws from the same stream, so one seed drives a whole spawn
/// evaluation: region shuffles, weighted picks, count and chance rolls.
/// Single-threaded by construction (`Rc`).
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: Rc<RefCell<ChaCha8Rng>>,
}

impl RandomSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Rc::new(RefCell::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    /// Uniform integer in `lo..=hi`. Returns `lo` when the range is empty.
    pub fn range_inclusive(&self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        self.rng.borrow_mut().gen_range(lo..=hi)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&self, len: usize) -> usize {
        self.rng.borrow_mut().gen_range(0..len)
    }

    /// Roll a percentage in `[0, 100]`; 100 always passes, 0 never does.
    pub fn percent(&self, odds: f64) -> bool {
        if odds >= 100.0 {
            return true;
        }
        if odds <= 0.0 {
            return false;
        }
        self.rng.borrow_mut().gen_bool(odds / 100.0)
    }

    pub fn shuffle<T>(&self, items: &mut [T]) {
        items.shuffle(&mut *self.rng.borrow_mut());
    }

    /// Pick an index with probability proportional to its weight.
    ///
    /// Returns `None` when there are no weights or they sum to zero.
    pub fn weighted<W>(&self, weights: &[W]) -> Option<usize>
    where
        W: Copy + Into<f64>,
    {
        let dist = WeightedIndex::new(weights.iter().map(|w| (*w).into())).ok()?;
        Some(dist.sample(&mut *self.rng.borrow_mut()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let a = RandomSource::from_seed(42);
        let b = RandomSource::from_seed(42);
        let xs: Vec<i64> = (0..16).map(|_| a.range_inclusive(0, 1000)).collect();
        let ys: Vec<i64> = (0..16).map(|_| b.range_inclusive(0, 1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn clones_share_the_stream() {
        let a = RandomSource::from_seed(7);
        let b = a.clone();
        let fresh = RandomSource::from_seed(7);
        let first = fresh.range_inclusive(0, i64::MAX);
        let second = fresh.range_inclusive(0, i64::MAX);
        assert_eq!(a.range_inclusive(0, i64::MAX), first);
        assert_eq!(b.range_inclusive(0, i64::MAX), second);
    }

    #[test]
    fn percent_extremes() {
        let r = RandomSource::from_seed(1);
        for _ in 0..100 {
            assert!(r.percent(100.0));
            assert!(!r.percent(0.0));
        }
    }

    #[test]
    fn weighted_skips_zero_weights() {
        let r = RandomSource::from_seed(3);
        for _ in 0..200 {
            assert_eq!(r.weighted(&[0u32, 5, 0]), Some(1));
        }
        assert_eq!(r.weighted::<u32>(&[]), None);
        assert_eq!(r.weighted(&[0u32, 0]), None);
    }

    #[test]
    fn degenerate_range_returns_low_end() {
        let r = RandomSource::from_seed(9);
        assert_eq!(r.range_inclusive(4, 4), 4);
        assert_eq!(r.range_inclusive(5, 2), 5);
    }
}
