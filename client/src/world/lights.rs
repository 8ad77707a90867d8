use bevy::prelude::*;
use shared::world::hill_height;

use crate::constants::*;

/// Point light circling the scene above the hills.
#[derive(Component)]
pub struct OrbitingLight;

/// Where the orbiting light sits after `elapsed` seconds.
///
/// It follows a circle over the terrain, staying a fixed lift above the
/// ground but never dropping with it into the water.
pub fn orbiting_light_position(elapsed: f32) -> Vec3 {
    let angle = POINT_LIGHT_ORBIT_SPEED * elapsed;
    let x = POINT_LIGHT_ORBIT_RADIUS * angle.cos();
    let z = POINT_LIGHT_ORBIT_RADIUS * angle.sin();
    let y = hill_height(x, z).max(POINT_LIGHT_MIN_GROUND) + POINT_LIGHT_LIFT;
    Vec3::new(x, y, z)
}

pub fn spawn_lights_system(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 150.0,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::default().looking_to(Vec3::new(0.577, -0.577, 0.577), Vec3::Y),
    ));

    commands.spawn((
        OrbitingLight,
        PointLight {
            color: Color::srgb(0.7, 0.7, 0.7),
            intensity: 4_000_000.0,
            range: 100.0,
            ..default()
        },
        Transform::from_translation(orbiting_light_position(0.0)),
    ));
}

pub fn orbit_light_system(time: Res<Time>, mut query: Query<&mut Transform, With<OrbitingLight>>) {
    let position = orbiting_light_position(time.elapsed_secs());
    for mut transform in query.iter_mut() {
        transform.translation = position;
    }
}
