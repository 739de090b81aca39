use std::fmt::Debug;
use std::hash::Hash;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::aggregate::{max_dimension, validate_population, AggregateSpec};
use crate::container::{Container, Notch};
use crate::error::{ConfigError, InputError, Result};
use crate::gradation::{CurveFor, CurvePoint, DeriveCounts};
use crate::hull::GenerateHull;
use crate::math::Point3;

use super::{
    DrawPool, GridExtents, Occupancy, PackingSettings, ParticleId, ParticleStore, PhysicsParams,
    PhysicsWorld, PlacedParticle, PlacementGrid, SpawnRequest, TriggerEvent, TriggerKind,
    TriggerPlane, TriggerSource,
};

/// Consecutive degenerate hulls tolerated by a single placement.
const MAX_SKIPPED_DRAWS: usize = 64;

/// Progress of layered release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayerState {
    /// Set up, waiting for the first tick to release layer one.
    AwaitingLayer,
    /// Spawning a layer.
    Placing,
    /// Waiting for the last layer to cross the trigger plane.
    Settling,
    /// No further layers will be released.
    Done,
}

/// Everything needed to start a packing run.
///
/// `start` runs the setup sequence against a physics world and returns the
/// scheduler that drives the run.
#[derive(Debug)]
pub struct PackingPlan {
    specs: Vec<AggregateSpec>,
    container: Box<dyn Container>,
    notch: Option<Notch>,
    settings: PackingSettings,
    physics: PhysicsParams,
}

impl PackingPlan {
    /// Creates a plan with default settings and physics parameters.
    #[must_use]
    pub fn new(specs: Vec<AggregateSpec>, container: Box<dyn Container>) -> Self {
        Self {
            specs,
            container,
            notch: None,
            settings: PackingSettings::default(),
            physics: PhysicsParams::default(),
        }
    }

    /// Adds a notch cut into the container floor.
    #[must_use]
    pub fn with_notch(mut self, notch: Notch) -> Self {
        self.notch = Some(notch);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: PackingSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsParams) -> Self {
        self.physics = physics;
        self
    }

    /// Runs the setup sequence and returns the scheduler.
    ///
    /// In order: cell size from the largest semi-axis, grid extents, grid
    /// start offset, draw counts, total count, then world configuration and
    /// trigger registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the population or container is malformed, the
    /// container footprint cannot hold a single cell, the grid has more cells
    /// than can be counted, or the world rejects its configuration or the
    /// trigger.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn start<W: PhysicsWorld>(self, world: &mut W) -> Result<PackingScheduler<W::Handle>> {
        let Self {
            mut specs,
            container,
            notch,
            settings,
            physics,
        } = self;

        validate_population(&specs)?;
        let volume = container.volume();
        let height = container.height();
        if !(volume.is_finite() && volume > 0.0 && height.is_finite() && height > 0.0) {
            return Err(InputError::InvalidContainer(format!(
                "volume {volume} and height {height} must be positive and finite"
            ))
            .into());
        }
        if let Some(notch) = &notch {
            notch.validate()?;
        }

        let cell = max_dimension(&specs);

        let (x, z) = container.grid_footprint_extents(cell);
        if x == 0 || z == 0 {
            let (width, depth) = container.grid_span();
            return Err(InputError::InvalidContainer(format!(
                "grid span {width} x {depth} cannot hold a cell of size {cell}"
            ))
            .into());
        }
        let y = ((height / cell).floor() as usize)
            .checked_add(settings.headroom_layers)
            .ok_or_else(|| {
                InputError::InvalidContainer(format!(
                    "height {height} holds too many layers of size {cell}"
                ))
            })?;
        let extents = GridExtents { x, y, z };
        if x.checked_mul(z).and_then(|n| n.checked_mul(y)).is_none() {
            return Err(InputError::InvalidContainer(format!(
                "grid of {x} x {y} x {z} cells of size {cell} is too large"
            ))
            .into());
        }

        let mut start = container.start_offset();
        if let Some(notch) = &notch {
            start.y = notch.spawn_floor(cell);
        }
        let grid = PlacementGrid::new(extents, cell, start);

        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);

        let volumes = settings.count_basis.volumes(&specs, &mut rng);
        let total_count = DeriveCounts::new(&mut specs)
            .with_volumes(volumes)
            .execute()?;
        let counts: Vec<usize> = specs
            .iter()
            .map(|s| s.draw_count().unwrap_or(0))
            .collect();

        info!(
            seed,
            cell,
            grid_x = x,
            grid_y = y,
            grid_z = z,
            total_count,
            "packing run set up"
        );

        world.configure(&physics)?;
        let trigger_plane = trigger_plane(container.as_ref(), &grid, settings.trigger_offset_layers);
        world.register_trigger(&trigger_plane)?;
        debug!(height = trigger_plane.center.y, "trigger plane registered");

        Ok(PackingScheduler {
            specs,
            counts,
            occupancy: Occupancy::new(volume),
            container,
            grid,
            pool: DrawPool::new(settings.pool_policy),
            store: ParticleStore::new(),
            rng,
            seed,
            physics,
            trigger_plane,
            total_count,
            state: LayerState::AwaitingLayer,
            paused: false,
            layer_pending: false,
            settled_in_layer: 0,
            layers_released: 0,
        })
    }
}

/// Plane across the container footprint, `offset_layers` below the grid top.
#[allow(clippy::cast_precision_loss)]
fn trigger_plane(container: &dyn Container, grid: &PlacementGrid, offset_layers: usize) -> TriggerPlane {
    let (width, depth) = container.footprint();
    let layers = grid.extents().y.saturating_sub(offset_layers);
    TriggerPlane {
        center: Point3::new(0.0, (layers as f64 * grid.cell()).floor(), 0.0),
        width,
        depth,
    }
}

/// Drives a packing run: draws, places and releases particles layer by
/// layer as the previous layer crosses the trigger plane.
///
/// All state changes happen synchronously inside [`Self::before_step`],
/// [`Self::on_trigger`], [`Self::pause`], [`Self::resume`] and
/// [`Self::place_one`]. Dropping the scheduler mid-layer leaves already
/// spawned bodies to the world. A world error while releasing a layer ends
/// the run: the layer is left short and the state moves to
/// [`LayerState::Done`].
#[derive(Debug)]
pub struct PackingScheduler<H> {
    specs: Vec<AggregateSpec>,
    counts: Vec<usize>,
    container: Box<dyn Container>,
    grid: PlacementGrid,
    pool: DrawPool,
    store: ParticleStore<H>,
    occupancy: Occupancy,
    rng: StdRng,
    seed: u64,
    physics: PhysicsParams,
    trigger_plane: TriggerPlane,
    total_count: usize,
    state: LayerState,
    paused: bool,
    layer_pending: bool,
    settled_in_layer: usize,
    layers_released: usize,
}

impl<H: Copy + Eq + Hash + Debug> PackingScheduler<H> {
    /// Starts a run with default settings.
    ///
    /// # Errors
    ///
    /// See [`PackingPlan::start`].
    pub fn new<W: PhysicsWorld<Handle = H>>(
        specs: Vec<AggregateSpec>,
        container: Box<dyn Container>,
        world: &mut W,
    ) -> Result<Self> {
        PackingPlan::new(specs, container).start(world)
    }

    /// Draws one particle, generates its hull and spawns it at the next grid
    /// cell.
    ///
    /// Returns `Ok(None)` once the draw pool or the grid is exhausted.
    /// Degenerate hulls are logged and redrawn.
    ///
    /// # Errors
    ///
    /// Returns an error if the world fails to spawn the body.
    pub fn place_one<W: PhysicsWorld<Handle = H>>(
        &mut self,
        world: &mut W,
    ) -> Result<Option<ParticleId>> {
        if self.grid.is_exhausted() {
            return Ok(None);
        }

        let mut skipped = 0;
        let hull = loop {
            let Some(index) = self.pool.draw(&self.counts, &mut self.rng) else {
                return Ok(None);
            };
            let spec = &self.specs[index];
            match GenerateHull::new(spec).execute(&mut self.rng) {
                Ok(hull) => break hull,
                Err(err) => {
                    warn!(aggregate = spec.id(), %err, "skipping degenerate particle");
                    skipped += 1;
                    if skipped >= MAX_SKIPPED_DRAWS {
                        return Ok(None);
                    }
                }
            }
        };

        let layer = self.grid.cursor().y;
        let Some(position) = self.grid.next_position() else {
            return Ok(None);
        };

        let handle = world.spawn_body(&SpawnRequest {
            hull: &hull,
            position,
            orientation: hull.orientation(),
            body_scale: self.physics.body_scale,
            material: self.physics.material,
        })?;

        self.occupancy.record_placed(hull.volume());
        debug!(
            aggregate = hull.spec_id(),
            handle = ?handle,
            x = position.x,
            y = position.y,
            z = position.z,
            "particle placed"
        );

        Ok(Some(self.store.insert(
            handle,
            PlacedParticle {
                hull,
                position,
                layer,
                settled: false,
            },
        )))
    }

    /// Per-tick hook of the owning loop. Releases the first layer; later
    /// layers are released by trigger events.
    ///
    /// Returns `true` if a layer was released.
    ///
    /// # Errors
    ///
    /// Returns an error if the world fails to spawn a body.
    pub fn before_step<W: PhysicsWorld<Handle = H>>(&mut self, world: &mut W) -> Result<bool> {
        if self.paused || self.state != LayerState::AwaitingLayer {
            return Ok(false);
        }
        self.release_layer(world)
    }

    /// Handles one trigger event from the world.
    ///
    /// An `Entered` event for a pending body settles it, adds its volume to
    /// the packing fraction and counts it towards the current layer. When a
    /// full layer has been counted the counter resets and the next layer is
    /// released. Exits, unknown handles and repeated entries are ignored.
    ///
    /// Returns `true` if a layer was released.
    ///
    /// # Errors
    ///
    /// Returns an error if the world fails to spawn a body.
    pub fn on_trigger<W: PhysicsWorld<Handle = H>>(
        &mut self,
        event: &TriggerEvent<H>,
        world: &mut W,
    ) -> Result<bool> {
        if event.kind != TriggerKind::Entered {
            trace!(handle = ?event.handle, "ignoring trigger exit");
            return Ok(false);
        }
        let Some(particle) = self.store.settle(&event.handle) else {
            trace!(handle = ?event.handle, "ignoring unknown or settled body");
            return Ok(false);
        };

        let volume = particle.hull.volume();
        let fraction = self.occupancy.record_settled(volume);
        debug!(volume_fraction = fraction, "particle settled");

        if self.state == LayerState::Done {
            return Ok(false);
        }

        self.settled_in_layer += 1;
        if self.settled_in_layer < self.grid.extents().per_layer() {
            return Ok(false);
        }
        self.settled_in_layer = 0;

        if self.paused {
            self.layer_pending = true;
            return Ok(false);
        }
        self.release_layer(world)
    }

    /// Feeds every pending event of `source` to [`Self::on_trigger`] and
    /// returns the number of layers released.
    ///
    /// # Errors
    ///
    /// Returns an error if the world fails to spawn a body.
    pub fn pump<S, W>(&mut self, source: &mut S, world: &mut W) -> Result<usize>
    where
        S: TriggerSource<H>,
        W: PhysicsWorld<Handle = H>,
    {
        let mut released = 0;
        while let Some(event) = source.poll_event() {
            if self.on_trigger(&event, world)? {
                released += 1;
            }
        }
        Ok(released)
    }

    /// Stops releasing layers. Trigger events are still accounted, and a
    /// layer completed while paused is released on [`Self::resume`].
    pub fn pause(&mut self) {
        if !self.paused {
            info!(placed = self.store.len(), "packing paused");
        }
        self.paused = true;
    }

    /// Resumes layer release.
    ///
    /// Returns `true` if a layer held back by the pause was released.
    ///
    /// # Errors
    ///
    /// Returns an error if the world fails to spawn a body.
    pub fn resume<W: PhysicsWorld<Handle = H>>(&mut self, world: &mut W) -> Result<bool> {
        self.paused = false;
        if self.layer_pending && self.state != LayerState::Done {
            self.layer_pending = false;
            return self.release_layer(world);
        }
        Ok(false)
    }

    fn release_layer<W: PhysicsWorld<Handle = H>>(&mut self, world: &mut W) -> Result<bool> {
        if self.grid.reached_top() {
            self.finish("grid height reached");
            return Ok(false);
        }

        self.state = LayerState::Placing;
        let per_layer = self.grid.extents().per_layer();
        for placed in 0..per_layer {
            match self.place_one(world) {
                Ok(Some(_)) => {}
                Ok(None) => {
                    if placed > 0 {
                        self.layers_released += 1;
                    }
                    self.finish("nothing left to place");
                    return Ok(placed > 0);
                }
                Err(err) => {
                    self.finish("physics world error");
                    return Err(err);
                }
            }
        }

        self.layers_released += 1;
        self.state = LayerState::Settling;
        info!(
            layer = self.layers_released,
            placed = self.store.len(),
            "layer released"
        );
        Ok(true)
    }

    fn finish(&mut self, reason: &str) {
        self.state = LayerState::Done;
        info!(
            reason,
            placed = self.store.len(),
            volume_fraction = self.occupancy.volume_fraction(),
            "packing complete"
        );
    }

    #[must_use]
    pub fn state(&self) -> LayerState {
        self.state
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    #[must_use]
    pub fn container(&self) -> &dyn Container {
        self.container.as_ref()
    }

    /// Aggregate classes with their derived draw counts.
    #[must_use]
    pub fn specs(&self) -> &[AggregateSpec] {
        &self.specs
    }

    /// Sum of the derived draw counts.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    #[must_use]
    pub fn trigger_plane(&self) -> &TriggerPlane {
        &self.trigger_plane
    }

    #[must_use]
    pub fn particles(&self) -> &ParticleStore<H> {
        &self.store
    }

    #[must_use]
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Live packing fraction in percent of the container volume.
    #[must_use]
    pub fn volume_fraction(&self) -> f64 {
        self.occupancy.volume_fraction()
    }

    /// Bodies counted towards the current layer.
    #[must_use]
    pub fn settled_in_layer(&self) -> usize {
        self.settled_in_layer
    }

    #[must_use]
    pub fn layers_released(&self) -> usize {
        self.layers_released
    }

    /// Seed the run RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Target gradation curve of the population.
    #[must_use]
    pub fn curve(&self) -> Vec<CurvePoint> {
        CurveFor::new(&self.specs).execute()
    }

    /// Snapshot of the run.
    #[must_use]
    pub fn report(&self) -> PackingReport {
        PackingReport {
            state: self.state,
            paused: self.paused,
            seed: self.seed,
            grid: self.grid.extents(),
            cell_size: self.grid.cell(),
            total_count: self.total_count,
            placed: self.store.len(),
            settled: self.occupancy.settled_count(),
            layers_released: self.layers_released,
            placed_volume: self.occupancy.placed_volume(),
            settled_volume: self.occupancy.settled_volume(),
            volume_fraction: self.occupancy.volume_fraction(),
        }
    }
}

/// Summary of a packing run.
#[derive(Debug, Clone, Serialize)]
pub struct PackingReport {
    pub state: LayerState,
    pub paused: bool,
    pub seed: u64,
    pub grid: GridExtents,
    pub cell_size: f64,
    pub total_count: usize,
    pub placed: usize,
    pub settled: usize,
    pub layers_released: usize,
    pub placed_volume: f64,
    pub settled_volume: f64,
    pub volume_fraction: f64,
}

impl PackingReport {
    /// Renders the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e).into())
    }
}
