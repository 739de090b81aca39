use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::mpsc::Receiver;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hull::ParticleHull;
use crate::math::{Orientation, Point3};

/// Surface material handed to the physics world with every body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceMaterial {
    pub friction: f64,
    pub restitution: f64,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
        }
    }
}

/// World-level physics parameters forwarded once at setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Scale applied to a hull when building its collision body.
    pub body_scale: f64,
    /// Vertical gravity, negative pointing down.
    pub gravity: f64,
    /// Solver sub-step; `0` lets the world decide.
    pub sub_time_step: f64,
    #[serde(flatten)]
    pub material: SurfaceMaterial,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            body_scale: 1.0,
            gravity: -9.8,
            sub_time_step: 0.0,
            material: SurfaceMaterial::default(),
        }
    }
}

/// Horizontal trigger plane below the fill line.
///
/// Bodies crossing it are reported back as [`TriggerEvent`]s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TriggerPlane {
    /// Center of the plane.
    pub center: Point3,
    /// Extent along x.
    pub width: f64,
    /// Extent along z.
    pub depth: f64,
}

/// A request to turn a generated hull into a dynamic body.
#[derive(Debug, Clone, Copy)]
pub struct SpawnRequest<'a> {
    pub hull: &'a ParticleHull,
    pub position: Point3,
    pub orientation: Orientation,
    pub body_scale: f64,
    pub material: SurfaceMaterial,
}

/// The rigid-body engine the scheduler hands particles to.
///
/// Implementations own collision resolution and integration. The scheduler
/// only stores the returned handles and matches them against trigger events.
pub trait PhysicsWorld {
    /// Opaque body identity.
    type Handle: Copy + Eq + Hash + Debug;

    /// Applies world-level parameters. Called once before the trigger is
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the world rejects the parameters.
    fn configure(&mut self, _params: &PhysicsParams) -> Result<()> {
        Ok(())
    }

    /// Installs the trigger plane whose crossings gate layer release.
    ///
    /// # Errors
    ///
    /// Returns an error if the world cannot create the trigger.
    fn register_trigger(&mut self, plane: &TriggerPlane) -> Result<()>;

    /// Creates a dynamic body for a hull and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the world cannot create the body.
    fn spawn_body(&mut self, request: &SpawnRequest<'_>) -> Result<Self::Handle>;
}

/// Direction of a trigger crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    Entered,
    Exited,
}

/// A body crossing the trigger plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent<H> {
    pub kind: TriggerKind,
    pub handle: H,
}

impl<H> TriggerEvent<H> {
    #[must_use]
    pub fn entered(handle: H) -> Self {
        Self {
            kind: TriggerKind::Entered,
            handle,
        }
    }

    #[must_use]
    pub fn exited(handle: H) -> Self {
        Self {
            kind: TriggerKind::Exited,
            handle,
        }
    }
}

/// A stream of trigger events polled by the owning loop.
pub trait TriggerSource<H> {
    /// Returns the next pending event, or `None` if there is none right now.
    fn poll_event(&mut self) -> Option<TriggerEvent<H>>;
}

impl<H> TriggerSource<H> for VecDeque<TriggerEvent<H>> {
    fn poll_event(&mut self) -> Option<TriggerEvent<H>> {
        self.pop_front()
    }
}

/// Events sent from a physics thread arrive through a channel; polling never
/// blocks.
impl<H> TriggerSource<H> for Receiver<TriggerEvent<H>> {
    fn poll_event(&mut self) -> Option<TriggerEvent<H>> {
        self.try_recv().ok()
    }
}
