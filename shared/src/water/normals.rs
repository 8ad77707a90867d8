//! Surface normals for a wave field.
//!
//! The simulator only tracks heights. Renderers that light the water derive
//! normals here from central differences of neighbouring heights.

use bevy::math::Vec3;

use super::simulation::Waves;

/// Fills `out` with one unit normal per grid point.
///
/// Boundary points get `+Y`. `out` must hold `waves.vertex_count()` entries.
pub fn compute_normals(waves: &Waves, out: &mut [Vec3]) {
    let rows = waves.row_count();
    let cols = waves.column_count();
    assert_eq!(
        out.len(),
        rows * cols,
        "normal buffer does not match the wave grid"
    );

    let positions = waves.positions();
    let two_dx = 2.0 * waves.spacing();

    for i in 0..rows {
        for j in 0..cols {
            let idx = i * cols + j;
            if i == 0 || j == 0 || i == rows - 1 || j == cols - 1 {
                out[idx] = Vec3::Y;
                continue;
            }

            let l = positions[idx - 1].y;
            let r = positions[idx + 1].y;
            // row i-1 lies at larger z
            let t = positions[idx - cols].y;
            let b = positions[idx + cols].y;

            out[idx] = Vec3::new(l - r, two_dx, b - t).normalize_or(Vec3::Y);
        }
    }
}

pub fn surface_normals(waves: &Waves) -> Vec<Vec3> {
    let mut normals = vec![Vec3::Y; waves.vertex_count()];
    compute_normals(waves, &mut normals);
    normals
}
