//! Ridgewalk - Simulation Core
//!
//! A deterministic, fixed-timestep simulation loop over a tiled heightfield
//! terrain. The loop scheduler decouples logical updates from rendering;
//! the terrain answers exact, plane-interpolated height queries for placing
//! and constraining objects on ground level. Uses `bevy_ecs` for the
//! scene-state entity-component-system.

pub mod api;
pub mod clock;
pub mod components;
pub mod engine;
pub mod heightfield;
pub mod stats;
pub mod systems;
pub mod terrain;
pub mod world;

pub use api::Simulation;
pub use clock::Clock;
pub use components::*;
pub use engine::{EngineError, GameLogic, GameLoop, LoopConfig, WindowHost};
pub use heightfield::{BufferSource, HeightfieldError, HeightfieldGrid, HeightmapSource};
pub use stats::{LoopStats, Phase, PhaseStats};
pub use systems::*;
pub use terrain::{
    BoundingBox, Terrain, TerrainBlock, TerrainError, TerrainResource, WorldOffset,
};
pub use world::{ItemSnapshot, Snapshot};
