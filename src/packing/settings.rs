use serde::{Deserialize, Serialize};

use crate::gradation::CountBasis;

use super::PoolPolicy;

/// Tunables of a packing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingSettings {
    /// RNG seed; a random seed is drawn (and reported) when absent.
    pub seed: Option<u64>,
    /// Extra grid layers above the container rim, so particles can fall in
    /// from above the fill line.
    pub headroom_layers: usize,
    /// How many layers below the grid top the trigger plane sits.
    pub trigger_offset_layers: usize,
    pub pool_policy: PoolPolicy,
    pub count_basis: CountBasis,
}

impl Default for PackingSettings {
    fn default() -> Self {
        Self {
            seed: None,
            headroom_layers: 5,
            trigger_offset_layers: 3,
            pool_policy: PoolPolicy::default(),
            count_basis: CountBasis::default(),
        }
    }
}

impl PackingSettings {
    /// Sets a fixed RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
