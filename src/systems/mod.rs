//! ECS systems for the Ridgewalk simulation.
//!
//! Systems contain the scene logic that operates on components and
//! resources. They run in a fixed chain once per fixed update:
//!
//! - `camera_control_system` - applies collected input to the camera, then
//!   keeps it above the terrain surface
//! - `daylight_system` - advances the day/night cycle and the sun light
//! - `ground_clamp_system` - snaps terrain-following items to ground level
//!
//! All three read terrain data only through [`crate::terrain::TerrainResource`]
//! and never mutate it.

pub mod camera;
pub mod daylight;
pub mod grounding;

pub use camera::*;
pub use daylight::*;
pub use grounding::*;
