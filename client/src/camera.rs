use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;

use crate::constants::*;

/// Spherical camera around the origin.
///
/// `phi` is measured from the +Y axis and `theta` around it, starting at +X.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub theta: f32,
    pub phi: f32,
    pub radius: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            theta: CAMERA_START_THETA,
            phi: CAMERA_START_PHI,
            radius: CAMERA_START_RADIUS,
        }
    }
}

impl OrbitCamera {
    /// Rotates by a mouse delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.theta += (CAMERA_ROTATE_SPEED * delta.x).to_radians();
        self.phi = (self.phi + (CAMERA_ROTATE_SPEED * delta.y).to_radians())
            .clamp(CAMERA_MIN_PHI, CAMERA_MAX_PHI);
    }

    pub fn zoom(&mut self, amount: f32) {
        self.radius = (self.radius + amount).clamp(CAMERA_MIN_RADIUS, CAMERA_MAX_RADIUS);
    }

    /// Right-drag zoom: moving right or up pulls the camera back.
    pub fn drag_zoom(&mut self, delta: Vec2) {
        self.zoom(CAMERA_ZOOM_SPEED * (delta.x - delta.y));
    }

    pub fn position(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.radius * Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position()).looking_at(Vec3::ZERO, Vec3::Y)
    }
}

pub fn spawn_camera_system(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    commands.spawn((Camera3d::default(), orbit.transform(), orbit));
}

pub fn orbit_camera_system(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    mut query: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let wheel = match scroll.unit {
        MouseScrollUnit::Line => scroll.delta.y,
        MouseScrollUnit::Pixel => scroll.delta.y * 0.01,
    };

    for (mut orbit, mut transform) in query.iter_mut() {
        let before = *orbit;

        if mouse_buttons.pressed(MouseButton::Left) {
            orbit.rotate(motion.delta);
        } else if mouse_buttons.pressed(MouseButton::Right) {
            orbit.drag_zoom(motion.delta);
        }
        if wheel != 0.0 {
            orbit.zoom(-wheel * CAMERA_WHEEL_SPEED);
        }

        if *orbit != before {
            *transform = orbit.transform();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phi_is_clamped() {
        let mut orbit = OrbitCamera::default();
        orbit.rotate(Vec2::new(0.0, 10_000.0));
        assert_eq!(orbit.phi, CAMERA_MAX_PHI);
        orbit.rotate(Vec2::new(0.0, -10_000.0));
        assert_eq!(orbit.phi, CAMERA_MIN_PHI);
    }

    #[test]
    fn test_rotation_is_a_quarter_degree_per_pixel() {
        let mut orbit = OrbitCamera::default();
        let theta = orbit.theta;
        orbit.rotate(Vec2::new(4.0, 0.0));
        assert!((orbit.theta - theta - 1.0f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_radius_is_clamped() {
        let mut orbit = OrbitCamera::default();
        orbit.drag_zoom(Vec2::new(1e6, 0.0));
        assert_eq!(orbit.radius, CAMERA_MAX_RADIUS);
        orbit.zoom(-1e6);
        assert_eq!(orbit.radius, CAMERA_MIN_RADIUS);
    }

    #[test]
    fn test_position_lies_on_the_sphere() {
        let orbit = OrbitCamera {
            theta: 0.3,
            phi: 1.1,
            radius: 120.0,
        };
        assert!((orbit.position().length() - 120.0).abs() < 1e-3);

        let overhead = OrbitCamera {
            theta: 0.0,
            phi: 0.0,
            radius: 80.0,
        };
        assert!(overhead.position().abs_diff_eq(Vec3::new(0.0, 80.0, 0.0), 1e-4));
    }
}
