use std::collections::HashMap;
use std::hash::Hash;

use slotmap::SlotMap;

use crate::hull::ParticleHull;
use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a placed particle in the particle store.
    pub struct ParticleId;
}

/// Data associated with a placed particle.
#[derive(Debug, Clone)]
pub struct PlacedParticle {
    /// The generated hull, in body space.
    pub hull: ParticleHull,
    /// World position the body was spawned at.
    pub position: Point3,
    /// Grid layer (1-based) the particle was placed in.
    pub layer: usize,
    /// Whether the particle has crossed the trigger plane.
    pub settled: bool,
}

/// Arena of placed particles plus the table from physics handles to
/// particles that have not yet crossed the trigger plane.
///
/// Particles are never removed from the arena. A handle leaves the pending
/// table the first time it is settled, so repeated events for the same body
/// are ignored.
#[derive(Debug)]
pub struct ParticleStore<H> {
    particles: SlotMap<ParticleId, PlacedParticle>,
    pending: HashMap<H, ParticleId>,
}

impl<H> Default for ParticleStore<H> {
    fn default() -> Self {
        Self {
            particles: SlotMap::with_key(),
            pending: HashMap::new(),
        }
    }
}

impl<H: Copy + Eq + Hash> ParticleStore<H> {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a freshly spawned particle under its body handle.
    pub fn insert(&mut self, handle: H, particle: PlacedParticle) -> ParticleId {
        let id = self.particles.insert(particle);
        self.pending.insert(handle, id);
        id
    }

    /// Marks the particle behind `handle` as settled and returns it, or
    /// `None` if the handle is unknown or was already settled.
    pub fn settle(&mut self, handle: &H) -> Option<&PlacedParticle> {
        let id = self.pending.remove(handle)?;
        let particle = self.particles.get_mut(id)?;
        particle.settled = true;
        Some(&*particle)
    }

    /// Looks up a pending particle by body handle.
    #[must_use]
    pub fn pending(&self, handle: &H) -> Option<ParticleId> {
        self.pending.get(handle).copied()
    }

    #[must_use]
    pub fn get(&self, id: ParticleId) -> Option<&PlacedParticle> {
        self.particles.get(id)
    }

    /// Number of placed particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of placed particles still waiting to settle.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Iterates over all placed particles.
    pub fn iter(&self) -> impl Iterator<Item = (ParticleId, &PlacedParticle)> {
        self.particles.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::aggregate::AggregateSpec;
    use crate::hull::GenerateHull;

    fn particle(seed: u64) -> PlacedParticle {
        let spec = AggregateSpec::new("0", 1.0, 1.0, 1.0, 0.5, 16).unwrap();
        PlacedParticle {
            hull: GenerateHull::new(&spec)
                .execute(&mut StdRng::seed_from_u64(seed))
                .unwrap(),
            position: Point3::origin(),
            layer: 1,
            settled: false,
        }
    }

    #[test]
    fn settle_marks_particle_once() {
        let mut store = ParticleStore::new();
        let id = store.insert(7u32, particle(1));
        assert_eq!(store.pending(&7), Some(id));

        assert!(store.settle(&7).unwrap().settled);
        assert!(store.settle(&7).is_none());
        assert_eq!(store.pending_len(), 0);
        assert_eq!(store.len(), 1);
        assert!(store.get(id).unwrap().settled);
    }

    #[test]
    fn unknown_handle_is_ignored() {
        let mut store: ParticleStore<u32> = ParticleStore::new();
        store.insert(1, particle(2));
        assert!(store.settle(&2).is_none());
        assert_eq!(store.pending_len(), 1);
    }

    #[test]
    fn iter_visits_every_particle() {
        let mut store = ParticleStore::new();
        for handle in 0..5u32 {
            store.insert(handle, particle(u64::from(handle)));
        }
        assert_eq!(store.iter().count(), 5);
        assert!(!store.is_empty());
    }
}
