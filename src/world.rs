//! Simulation snapshot types.
//!
//! The `Snapshot` struct provides a serializable view of the simulation state
//! that a renderer client consumes. Camera and lighting are value-type copies
//! taken at snapshot time, so a renderer can transform them freely without
//! the simulation ever observing the transformed state.

use crate::components::*;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a single scene item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Complete simulation state snapshot for a renderer client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current simulation tick.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub time: f32,
    /// Camera state at snapshot time.
    pub camera: Camera,
    /// Scene lighting at snapshot time.
    pub light: SceneLight,
    /// Sun angle in degrees.
    pub sun_angle: f32,
    /// All scene items.
    pub items: Vec<ItemSnapshot>,
}

impl Snapshot {
    /// Create a snapshot from the ECS world.
    pub fn from_world(world: &mut World, tick: u64, time: f32) -> Self {
        let camera = *world.resource::<Camera>();
        let light = *world.resource::<SceneLight>();
        let sun_angle = world.resource::<DayCycle>().angle;

        let mut items = Vec::new();
        let mut query = world.query::<(&ItemId, &Position)>();
        for (id, pos) in query.iter(world) {
            items.push(ItemSnapshot {
                id: id.0,
                x: pos.x,
                y: pos.y,
                z: pos.z,
            });
        }

        Self {
            tick,
            time,
            camera,
            light,
            sun_angle,
            items,
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
