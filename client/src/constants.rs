use std::f32::consts::PI;

pub const BINDS_PATH: &str = "binds.ron";

// Orbit camera, in the wave demo's spherical coordinates
pub const CAMERA_START_THETA: f32 = 1.5 * PI;
pub const CAMERA_START_PHI: f32 = 0.25 * PI;
pub const CAMERA_START_RADIUS: f32 = 200.0;
pub const CAMERA_MIN_RADIUS: f32 = 50.0;
pub const CAMERA_MAX_RADIUS: f32 = 500.0;
pub const CAMERA_MIN_PHI: f32 = 0.1;
pub const CAMERA_MAX_PHI: f32 = PI - 0.1;
/// Degrees of rotation per pixel of mouse motion
pub const CAMERA_ROTATE_SPEED: f32 = 0.25;
/// Radius change per pixel of right-drag
pub const CAMERA_ZOOM_SPEED: f32 = 0.2;
/// Radius change per wheel line
pub const CAMERA_WHEEL_SPEED: f32 = 10.0;

pub const POINT_LIGHT_ORBIT_RADIUS: f32 = 70.0;
pub const POINT_LIGHT_ORBIT_SPEED: f32 = 0.2;
/// The light never dips below this height before the lift is added
pub const POINT_LIGHT_MIN_GROUND: f32 = -3.0;
pub const POINT_LIGHT_LIFT: f32 = 10.0;

pub const HUD_FONT_SIZE: f32 = 16.0;
