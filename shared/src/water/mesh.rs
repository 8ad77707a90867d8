//! Vertex and index data for rendering a wave field.
//!
//! ## Mesh Structure
//! - One vertex per grid point, in the simulator's row-major order
//! - Two triangles per grid cell; the index list never changes
//! - Positions, normals and UVs are refreshed from the simulator every frame
//! - UVs span the grid: `u = 0.5 + x / width`, `v = 0.5 - z / depth`

use bevy::math::Vec3;

use super::normals::compute_normals;
use super::simulation::Waves;

/// Triangle list for a `rows x cols` grid, `(rows-1)*(cols-1)*6` indices.
pub fn grid_indices(rows: usize, cols: usize) -> Vec<u32> {
    if rows < 2 || cols < 2 {
        return Vec::new();
    }

    let mut indices = Vec::with_capacity((rows - 1) * (cols - 1) * 6);
    let n = cols as u32;
    for i in 0..rows as u32 - 1 {
        for j in 0..n - 1 {
            indices.extend_from_slice(&[i * n + j, i * n + j + 1, (i + 1) * n + j]);
            indices.extend_from_slice(&[(i + 1) * n + j, i * n + j + 1, (i + 1) * n + j + 1]);
        }
    }
    indices
}

/// Generated water mesh data ready for GPU upload.
#[derive(Debug, Default, Clone)]
pub struct WaveMeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    scratch_normals: Vec<Vec3>,
}

impl WaveMeshData {
    /// Builds the full mesh, including indices, for the current field.
    pub fn from_waves(waves: &Waves) -> Self {
        let mut data = Self {
            indices: grid_indices(waves.row_count(), waves.column_count()),
            ..Default::default()
        };
        data.refresh(waves);
        data
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Rewrites positions, normals and UVs from `waves`.
    ///
    /// Indices are rebuilt only if the grid size changed.
    pub fn refresh(&mut self, waves: &Waves) {
        let count = waves.vertex_count();
        if self.positions.len() != count {
            self.indices = grid_indices(waves.row_count(), waves.column_count());
        }

        self.scratch_normals.resize(count, Vec3::Y);
        compute_normals(waves, &mut self.scratch_normals);

        let width = waves.width();
        let depth = waves.depth();

        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        for (p, n) in waves.positions().iter().zip(&self.scratch_normals) {
            self.positions.push(p.to_array());
            self.normals.push(n.to_array());
            self.uvs.push([0.5 + p.x / width, 0.5 - p.z / depth]);
        }
    }
}
