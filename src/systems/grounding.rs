//! Ground clamping system - keeps scene items on the terrain surface.

use crate::components::*;
use crate::terrain::TerrainResource;
use bevy_ecs::prelude::*;

/// System that snaps every [`GroundClamp`] item's Y to the interpolated
/// terrain height plus its offset. Items outside the terrain have no ground
/// under them and keep their current Y.
pub fn ground_clamp_system(
    terrain: Option<Res<TerrainResource>>,
    mut query: Query<(&mut Position, &GroundClamp)>,
) {
    let Some(terrain) = terrain else {
        return;
    };

    for (mut pos, clamp) in query.iter_mut() {
        if let Some(height) = terrain.height_at(pos.x, pos.z) {
            pos.y = height + clamp.offset;
        }
    }
}
