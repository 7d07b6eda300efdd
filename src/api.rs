//! Public API for the simulation.
//!
//! This module provides the main interface between the game loop and the
//! scene state: a `Simulation` owning the ECS world and schedule, stepped at
//! a fixed rate by the loop and snapshotted for whatever client renders it.
//!
//! ## Fixed timestep
//!
//! `Simulation` itself has no accumulator: each `update` call is exactly one
//! fixed step. The loop scheduler owns the accumulator and decides how many
//! steps to run per frame, which keeps the scene dynamics deterministic
//! regardless of frame rate.

use crate::components::*;
use crate::engine::{EngineError, GameLogic};
use crate::systems::{camera_control_system, daylight_system, ground_clamp_system};
use crate::terrain::{Terrain, TerrainResource};
use crate::world::Snapshot;
use bevy_ecs::prelude::*;

/// The simulation state container.
///
/// Holds the ECS world and schedule, providing a clean API for:
/// - Stepping the scene forward one fixed interval at a time
/// - Extracting state snapshots for a renderer
/// - Spawning scene items and querying terrain height
pub struct Simulation {
    world: World,
    schedule: Schedule,
    tick: u64,
    time: f32,
    /// Defensive copy refreshed once per render.
    last_frame: Snapshot,
}

impl Simulation {
    /// Create a simulation over the given terrain with default tuning.
    pub fn new(terrain: Terrain) -> Self {
        Self::with_config(SimConfig::default(), terrain)
    }

    /// Create a simulation with custom tuning.
    pub fn with_config(config: SimConfig, terrain: Terrain) -> Self {
        let mut world = World::new();

        world.insert_resource(DeltaTime(0.0));
        world.insert_resource(InputState::default());
        world.insert_resource(Camera::default());
        world.insert_resource(SceneLight::default());
        world.insert_resource(DayCycle::default());
        world.insert_resource(TerrainResource::new(terrain));
        world.insert_resource(config);

        // Camera and lighting settle before items are re-grounded.
        let mut schedule = Schedule::default();
        schedule.add_systems((camera_control_system, daylight_system, ground_clamp_system).chain());

        Self {
            world,
            schedule,
            tick: 0,
            time: 0.0,
            last_frame: Snapshot::default(),
        }
    }

    /// A small demo scene: a procedural ridge terrain with a ring of
    /// terrain-following items around the origin.
    pub fn new_demo_world() -> Self {
        use crate::heightfield::BufferSource;

        let size = 32usize;
        let mut samples = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let u = col as f32 / (size - 1) as f32;
                let v = row as f32 / (size - 1) as f32;
                let ridge = (u * std::f32::consts::TAU).sin() * (v * std::f32::consts::PI).sin();
                samples.push(0.5 + 0.5 * ridge * 0.8);
            }
        }
        let source = BufferSource::new(size, size, samples);
        let terrain = Terrain::new(3, 10.0, -0.1, 0.1, &source)
            .expect("demo heightmap is well-formed");

        let mut sim = Self::new(terrain);
        for i in 0..8u32 {
            let angle = (i as f32 / 8.0) * std::f32::consts::TAU;
            let x = 6.0 * angle.cos();
            let z = 6.0 * angle.sin();
            sim.spawn_item(i, x, z, 0.1);
        }
        sim
    }

    /// Spawn a terrain-following item at `(x, z)`, `offset` above ground.
    pub fn spawn_item(&mut self, id: u32, x: f32, z: f32, offset: f32) {
        self.world.spawn(SceneItemBundle::new(id, x, z, offset));
    }

    /// Number of scene items.
    pub fn item_count(&mut self) -> usize {
        let mut query = self.world.query::<&ItemId>();
        query.iter(&self.world).count()
    }

    /// Interpolated terrain height at `(x, z)`, or `None` off the terrain.
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.world.resource::<TerrainResource>().height_at(x, z)
    }

    /// Current camera state (a copy).
    pub fn camera(&self) -> Camera {
        *self.world.resource::<Camera>()
    }

    /// Teleport the camera.
    pub fn set_camera_position(&mut self, x: f32, y: f32, z: f32) {
        self.world.resource_mut::<Camera>().position = Vec3::new(x, y, z);
    }

    /// Get the current tick number.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Get the elapsed simulation time.
    pub fn current_time(&self) -> f32 {
        self.time
    }

    /// Build a fresh snapshot of the current state.
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot::from_world(&mut self.world, self.tick, self.time)
    }

    /// The snapshot taken by the most recent render.
    pub fn last_frame(&self) -> &Snapshot {
        &self.last_frame
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Get direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl GameLogic for Simulation {
    fn init(&mut self) -> Result<(), EngineError> {
        let (min_x, min_z, max_x, max_z) = self
            .world
            .resource::<TerrainResource>()
            .0
            .bounds();
        log::info!(
            "simulation ready: terrain spans ({min_x}, {min_z}) to ({max_x}, {max_z})"
        );
        Ok(())
    }

    fn input(&mut self, input: &InputState) {
        *self.world.resource_mut::<InputState>() = *input;
    }

    fn update(&mut self, interval: f32, _input: &InputState) -> Result<(), EngineError> {
        self.world.resource_mut::<DeltaTime>().0 = interval;
        self.schedule.run(&mut self.world);
        self.tick += 1;
        self.time += interval;
        Ok(())
    }

    fn render(&mut self) -> Result<(), EngineError> {
        // Renderers consume this copy; the live state stays untouched by
        // whatever view-space transforms they apply.
        self.last_frame = Snapshot::from_world(&mut self.world, self.tick, self.time);
        Ok(())
    }

    fn cleanup(&mut self) {
        self.world.clear_entities();
        log::info!("simulation cleaned up");
    }
}
