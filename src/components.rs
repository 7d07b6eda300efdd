//! ECS components and resources for the Ridgewalk simulation.
//!
//! Components are pure data containers attached to entities.
//! All scene logic lives in systems that query these components; singleton
//! state (camera, lights, input, configuration) lives in resources so it is
//! passed explicitly through the schedule rather than held in globals.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// VALUE TYPES
// ============================================================================

/// 3D vector (x = east/west, y = up/down, z = north/south).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Euler rotation in degrees (x = pitch, y = yaw, z = roll).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::white()
    }
}

// ============================================================================
// CAMERA & LIGHTING RESOURCES
// ============================================================================

/// Free-look camera state.
#[derive(Resource, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Rotation,
}

impl Camera {
    /// Move relative to the current yaw: `dz` walks along the view direction,
    /// `dx` strafes, `dy` is vertical.
    pub fn move_relative(&mut self, dx: f32, dy: f32, dz: f32) {
        if dz != 0.0 {
            self.position.x += self.rotation.y.to_radians().sin() * -1.0 * dz;
            self.position.z += self.rotation.y.to_radians().cos() * dz;
        }
        if dx != 0.0 {
            self.position.x += (self.rotation.y - 90.0).to_radians().sin() * -1.0 * dx;
            self.position.z += (self.rotation.y - 90.0).to_radians().cos() * dx;
        }
        self.position.y += dy;
    }

    /// Add to the Euler rotation, in degrees.
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation.x += dx;
        self.rotation.y += dy;
        self.rotation.z += dz;
    }
}

/// Directional (sun) light.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Color,
    pub direction: Vec3,
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Color::white(),
            direction: Vec3::new(1.0, 0.0, 0.0),
            intensity: 1.0,
        }
    }
}

/// Scene lighting: ambient term plus the directional sun light.
#[derive(Resource, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SceneLight {
    pub ambient: Color,
    pub directional: DirectionalLight,
}

impl Default for SceneLight {
    fn default() -> Self {
        Self {
            ambient: Color::new(0.3, 0.3, 0.3),
            directional: DirectionalLight::default(),
        }
    }
}

/// Day/night cycle state: the sun angle in degrees. `-90` is dawn, `0` noon,
/// `90` dusk; past `90` the sun is below the horizon until the angle wraps.
#[derive(Resource, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DayCycle {
    pub angle: f32,
}

impl Default for DayCycle {
    fn default() -> Self {
        Self { angle: -90.0 }
    }
}

// ============================================================================
// INPUT & CONFIGURATION RESOURCES
// ============================================================================

/// Input snapshot collected once per loop iteration by the windowing
/// collaborator. Axes are in `[-1, 1]`; mouse deltas are in screen units
/// since the previous poll.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Strafe axis (positive = right).
    pub move_x: f32,
    /// Vertical axis (positive = up).
    pub move_y: f32,
    /// Walk axis (positive = forward).
    pub move_z: f32,
    /// Mouse displacement since the last poll.
    pub mouse_dx: f32,
    pub mouse_dy: f32,
    /// Whether the rotate button is held (mouse drives camera rotation).
    pub rotate_held: bool,
}

/// Configuration for simulation behavior tuning.
#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    /// Camera movement per update, in world units per axis unit.
    pub camera_step: f32,
    /// Degrees of camera rotation per mouse unit.
    pub mouse_sensitivity: f32,
    /// Height the camera is kept above the terrain surface.
    pub camera_clearance: f32,
    /// Degrees the sun advances per second of simulation time.
    pub day_cycle_rate: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            camera_step: 0.05,
            mouse_sensitivity: 0.2,
            camera_clearance: 0.5,
            day_cycle_rate: 66.0, // 1.1 degrees per update at 60 ups
        }
    }
}

/// Resource containing the delta time for the current fixed update.
#[derive(Resource, Default)]
pub struct DeltaTime(pub f32);

// ============================================================================
// SCENE ITEM COMPONENTS
// ============================================================================

/// Unique identifier for a scene item.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// 3D position of a scene item.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Marker keeping an item's Y glued to the terrain surface, `offset` units
/// above it. Items outside the terrain keep their current Y ("no ground").
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GroundClamp {
    pub offset: f32,
}

/// Bundle for spawning a terrain-following scene item.
#[derive(Bundle, Default)]
pub struct SceneItemBundle {
    pub id: ItemId,
    pub position: Position,
    pub clamp: GroundClamp,
}

impl SceneItemBundle {
    pub fn new(id: u32, x: f32, z: f32, offset: f32) -> Self {
        Self {
            id: ItemId(id),
            position: Position::new(x, 0.0, z),
            clamp: GroundClamp { offset },
        }
    }
}
