//! Camera control system - input-driven movement and terrain collision.

use crate::components::*;
use crate::terrain::TerrainResource;
use bevy_ecs::prelude::*;

/// System that applies the collected input to the camera and then constrains
/// it above the terrain.
///
/// Movement is yaw-relative (walking follows the view direction); rotation is
/// mouse-driven while the rotate button is held. After moving, the camera is
/// pushed up to `terrain height + clearance` if it sank below it; outside the
/// terrain there is no ground and the camera moves freely.
pub fn camera_control_system(
    config: Res<SimConfig>,
    input: Res<InputState>,
    terrain: Option<Res<TerrainResource>>,
    mut camera: ResMut<Camera>,
) {
    let step = config.camera_step;
    camera.move_relative(
        input.move_x * step,
        input.move_y * step,
        input.move_z * step,
    );

    if input.rotate_held {
        camera.rotate(
            input.mouse_dy * config.mouse_sensitivity,
            input.mouse_dx * config.mouse_sensitivity,
            0.0,
        );
    }

    if let Some(ref terrain_res) = terrain {
        if let Some(height) = terrain_res.height_at(camera.position.x, camera.position.z) {
            let floor = height + config.camera_clearance;
            if camera.position.y < floor {
                camera.position.y = floor;
            }
        }
    }
}
