//! Granulis packing demo: drives a full run against a toy physics world.
//!
//! The toy world has no dynamics: every spawned body is reported as having
//! crossed the trigger plane on the next tick, so layers release as fast as
//! they are placed.
//!
//! Usage:
//! ```text
//! cargo run --example pack                        # built-in run
//! cargo run --example pack -- path/to/run.json    # run file
//! RUST_LOG=granulis=debug cargo run --example pack
//! ```

use std::collections::VecDeque;

use granulis::config::RunConfig;
use granulis::gradation::curve_to_json;
use granulis::packing::{
    LayerState, PhysicsParams, PhysicsWorld, SpawnRequest, TriggerEvent, TriggerPlane,
};
use granulis::Result;
use tracing::info;

const DEFAULT_RUN: &str = r#"{
    "aggregates": [
        {"id": "fine", "a": 0.6, "b": 0.5, "c": 0.4, "vf_max": 0.25, "n_cuts": 16},
        {"id": "medium", "a": 1.2, "b": 1.0, "c": 0.8, "vf_max": 0.35, "n_cuts": 24},
        {"id": "coarse", "a": 2.0, "b": 1.6, "c": 1.4, "vf_max": 0.40, "n_cuts": 32}
    ],
    "container": {"shape": "cylinder", "radius": 15.0, "height": 20.0},
    "notch": {"height": 1.0, "width": 3.0, "direction": "x"},
    "packing": {"seed": 7}
}"#;

/// Settles every body one tick after it was spawned.
#[derive(Default)]
struct ToyWorld {
    next_handle: u32,
    falling: VecDeque<TriggerEvent<u32>>,
    hull_vertices: usize,
}

impl PhysicsWorld for ToyWorld {
    type Handle = u32;

    fn configure(&mut self, params: &PhysicsParams) -> Result<()> {
        info!(
            gravity = params.gravity,
            friction = params.material.friction,
            "toy world configured"
        );
        Ok(())
    }

    fn register_trigger(&mut self, plane: &TriggerPlane) -> Result<()> {
        info!(y = plane.center.y, "toy world trigger installed");
        Ok(())
    }

    fn spawn_body(&mut self, request: &SpawnRequest<'_>) -> Result<u32> {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.hull_vertices += request
            .hull
            .world_vertices(&request.position, request.body_scale)
            .len();
        self.falling.push_back(TriggerEvent::entered(handle));
        Ok(handle)
    }
}

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for granulis and the demo.
    // Override with RUST_LOG env var (e.g. RUST_LOG=granulis=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("pack=info".parse().unwrap_or_default())
        .add_directive("granulis=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::from_path(path)?,
        None => RunConfig::from_json_str(DEFAULT_RUN)?,
    };

    let mut world = ToyWorld::default();
    let mut scheduler = config.plan()?.start(&mut world)?;
    println!("{}", curve_to_json(&scheduler.curve())?);

    while scheduler.state() != LayerState::Done {
        scheduler.before_step(&mut world)?;
        let mut falling = std::mem::take(&mut world.falling);
        scheduler.pump(&mut falling, &mut world)?;
    }

    info!(vertices = world.hull_vertices, "run finished");
    println!("{}", scheduler.report().to_json()?);
    Ok(())
}
