//! Day/night cycle system - drives the directional sun light.

use crate::components::*;
use bevy_ecs::prelude::*;

/// System that advances the sun angle each fixed update and derives the
/// scene lighting from it.
///
/// Three bands: night (angle past 90 degrees, sun below the horizon), dawn
/// and dusk (within 10 degrees of the horizon, light fading in or out), and
/// full day. The angle wraps back to -90 after a complete revolution.
pub fn daylight_system(
    config: Res<SimConfig>,
    dt: Res<DeltaTime>,
    mut cycle: ResMut<DayCycle>,
    mut light: ResMut<SceneLight>,
) {
    cycle.angle += config.day_cycle_rate * dt.0;

    if cycle.angle > 90.0 {
        light.directional.intensity = 0.0;
        if cycle.angle >= 360.0 {
            cycle.angle = -90.0;
        }
        light.ambient = Color::new(0.3, 0.3, 0.4);
    } else if cycle.angle <= -80.0 || cycle.angle >= 80.0 {
        let factor = 1.0 - (cycle.angle.abs() - 80.0) / 10.0;
        light.ambient = Color::new(factor.max(0.3), factor.max(0.3), factor.max(0.4));
        light.directional.intensity = factor;
        light.directional.color.g = factor.max(0.9);
        light.directional.color.b = factor.max(0.5);
    } else {
        light.ambient = Color::white();
        light.directional.intensity = 1.0;
        light.directional.color = Color::white();
    }

    let rad = cycle.angle.to_radians();
    light.directional.direction.x = rad.sin();
    light.directional.direction.y = rad.cos();
}
