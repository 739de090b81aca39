//! Layered placement of generated particles into a physics world.
//!
//! The [`PackingScheduler`] owns everything between the population and the
//! rigid-body engine: the placement grid, the shuffled draw pool, the table of
//! spawned bodies and the running packing fraction. The engine itself sits
//! behind [`PhysicsWorld`] and reports back through [`TriggerEvent`]s.

mod grid;
mod occupancy;
mod pool;
mod scheduler;
mod settings;
mod store;
mod world;

pub use grid::{GridCursor, GridExtents, PlacementGrid};
pub use occupancy::Occupancy;
pub use pool::{DrawPool, PoolPolicy};
pub use scheduler::{LayerState, PackingPlan, PackingReport, PackingScheduler};
pub use settings::PackingSettings;
pub use store::{ParticleId, ParticleStore, PlacedParticle};
pub use world::{
    PhysicsParams, PhysicsWorld, SpawnRequest, SurfaceMaterial, TriggerEvent, TriggerKind,
    TriggerPlane, TriggerSource,
};
