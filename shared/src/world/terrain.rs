//! Procedural hills that surround the water.
//!
//! The land is a height function over a centered grid laid out like the wave
//! lattice: row 0 sits at `+depth/2` and column 0 at `-width/2`.

use bevy::math::Vec3;

use crate::water::grid_indices;

const SAND: [f32; 4] = [1.0, 0.96, 0.62, 1.0];
const LIGHT_GRASS: [f32; 4] = [0.48, 0.77, 0.46, 1.0];
const DARK_GRASS: [f32; 4] = [0.1, 0.48, 0.19, 1.0];
const ROCK: [f32; 4] = [0.45, 0.39, 0.34, 1.0];
const SNOW: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

pub fn hill_height(x: f32, z: f32) -> f32 {
    0.3 * (z * (0.1 * x).sin() + x * (0.1 * z).cos())
}

/// Unit normal of the `hill_height` surface, from its partial derivatives.
pub fn hill_normal(x: f32, z: f32) -> Vec3 {
    let dh_dx = 0.03 * z * (0.1 * x).cos() + 0.3 * (0.1 * z).cos();
    let dh_dz = 0.3 * (0.1 * x).sin() - 0.03 * x * (0.1 * z).sin();
    Vec3::new(-dh_dx, 1.0, -dh_dz).normalize_or(Vec3::Y)
}

/// Linear RGBA for a terrain height.
pub fn hill_color(height: f32) -> [f32; 4] {
    if height < -10.0 {
        SAND
    } else if height < 5.0 {
        LIGHT_GRASS
    } else if height < 12.0 {
        DARK_GRASS
    } else if height < 20.0 {
        ROCK
    } else {
        SNOW
    }
}

#[derive(Debug, Default, Clone)]
pub struct TerrainMeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl TerrainMeshData {
    /// Samples the hills on a `rows x cols` grid spanning `width x depth`.
    pub fn grid(width: f32, depth: f32, rows: usize, cols: usize) -> Self {
        if rows < 2 || cols < 2 {
            return Self::default();
        }

        let half_width = 0.5 * width;
        let half_depth = 0.5 * depth;
        let dx = width / (cols - 1) as f32;
        let dz = depth / (rows - 1) as f32;

        let count = rows * cols;
        let mut data = Self {
            positions: Vec::with_capacity(count),
            normals: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
            indices: grid_indices(rows, cols),
        };

        for i in 0..rows {
            let z = half_depth - i as f32 * dz;
            for j in 0..cols {
                let x = -half_width + j as f32 * dx;
                let y = hill_height(x, z);
                data.positions.push([x, y, z]);
                data.normals.push(hill_normal(x, z).to_array());
                data.colors.push(hill_color(y));
            }
        }

        data
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
