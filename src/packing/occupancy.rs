use serde::Serialize;

/// Running solid volume inside the container.
///
/// Placed and settled volumes are tracked separately and never reconciled:
/// only settled particles contribute to the reported packing fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Occupancy {
    container_volume: f64,
    placed_volume: f64,
    settled_volume: f64,
    settled_count: usize,
}

impl Occupancy {
    /// Creates an empty accumulator for a container of the given volume.
    #[must_use]
    pub fn new(container_volume: f64) -> Self {
        Self {
            container_volume,
            placed_volume: 0.0,
            settled_volume: 0.0,
            settled_count: 0,
        }
    }

    pub fn record_placed(&mut self, volume: f64) {
        self.placed_volume += volume;
    }

    /// Adds a settled particle and returns the updated packing fraction.
    pub fn record_settled(&mut self, volume: f64) -> f64 {
        self.settled_volume += volume;
        self.settled_count += 1;
        self.volume_fraction()
    }

    /// Settled volume as a percentage of the container volume.
    #[must_use]
    pub fn volume_fraction(&self) -> f64 {
        self.settled_volume / self.container_volume * 100.0
    }

    #[must_use]
    pub fn placed_volume(&self) -> f64 {
        self.placed_volume
    }

    #[must_use]
    pub fn settled_volume(&self) -> f64 {
        self.settled_volume
    }

    #[must_use]
    pub fn settled_count(&self) -> usize {
        self.settled_count
    }
}
