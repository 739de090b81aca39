use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What happens when every entry of the draw pool has been drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolPolicy {
    /// Refill the pool with the same counts and keep drawing.
    #[default]
    Recycle,
    /// Stop once the derived counts have been placed.
    Exhaust,
}

/// Shuffled multiset of aggregate class indices.
///
/// Each class index appears as many times as its draw count, so drawing
/// without replacement realizes the target distribution exactly over one
/// pass. The pool is built lazily on the first draw and only rebuilt once
/// fully drained.
#[derive(Debug, Clone, Default)]
pub struct DrawPool {
    entries: Vec<usize>,
    policy: PoolPolicy,
    fills: usize,
}

impl DrawPool {
    #[must_use]
    pub fn new(policy: PoolPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
            fills: 0,
        }
    }

    /// Entries left before the next refill.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    /// How many times the pool has been filled.
    #[must_use]
    pub fn fills(&self) -> usize {
        self.fills
    }

    /// Draws one class index, refilling from `counts` when empty.
    ///
    /// Returns `None` when the pool is drained and may not be refilled, or
    /// when every count is zero.
    pub fn draw<R: Rng>(&mut self, counts: &[usize], rng: &mut R) -> Option<usize> {
        if self.entries.is_empty() {
            if self.policy == PoolPolicy::Exhaust && self.fills > 0 {
                return None;
            }
            self.fill(counts, rng);
        }
        self.entries.pop()
    }

    fn fill<R: Rng>(&mut self, counts: &[usize], rng: &mut R) {
        self.entries = counts
            .iter()
            .enumerate()
            .flat_map(|(index, &count)| std::iter::repeat_n(index, count))
            .collect();
        self.entries.shuffle(rng);
        self.fills += 1;
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn one_pass_matches_counts_exactly() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = DrawPool::new(PoolPolicy::Exhaust);
        let counts = [5, 0, 3, 1];
        let mut drawn = [0usize; 4];
        while let Some(index) = pool.draw(&counts, &mut rng) {
            drawn[index] += 1;
        }
        assert_eq!(drawn, counts);
        assert_eq!(pool.fills(), 1);
    }

    #[test]
    fn exhaust_policy_stays_empty() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut pool = DrawPool::new(PoolPolicy::Exhaust);
        for _ in 0..3 {
            assert!(pool.draw(&[3], &mut rng).is_some());
        }
        assert!(pool.draw(&[3], &mut rng).is_none());
        assert!(pool.draw(&[3], &mut rng).is_none());
    }

    #[test]
    fn recycle_policy_refills_when_drained() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = DrawPool::new(PoolPolicy::Recycle);
        let counts = [2, 1];
        let mut drawn = [0usize; 2];
        for _ in 0..9 {
            drawn[pool.draw(&counts, &mut rng).unwrap_or(usize::MAX)] += 1;
        }
        assert_eq!(drawn, [6, 3]);
        assert_eq!(pool.fills(), 3);
    }

    #[test]
    fn all_zero_counts_yield_nothing() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pool = DrawPool::new(PoolPolicy::Recycle);
        assert!(pool.draw(&[0, 0], &mut rng).is_none());
    }

    #[test]
    fn shuffle_depends_on_seed() {
        let counts = [10, 10, 10];
        let order = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pool = DrawPool::new(PoolPolicy::Exhaust);
            std::iter::from_fn(|| pool.draw(&counts, &mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(order(7), order(7));
        assert_ne!(order(7), order(8));
    }
}
