//! Dynamic water mesh fed from the wave simulation.
//!
//! The simulation owns the heights. Every frame the shared `WaveMeshData`
//! buffer is refreshed from it and copied into the mesh asset in place.

use bevy::{
    prelude::*,
    render::{
        mesh::{Indices, MeshVertexAttribute, PrimitiveTopology, VertexAttributeValues},
        render_asset::RenderAssetUsages,
        view::NoFrustumCulling,
    },
};
use shared::water::{WaveMeshData, WaveSimulation};

/// Marker for the water surface entity.
#[derive(Component)]
pub struct WaterSurface;

#[derive(Resource, Debug, Default)]
pub struct WaterMeshBuffer(pub WaveMeshData);

pub fn build_water_mesh(data: &WaveMeshData) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.uvs.clone());
    mesh.insert_indices(Indices::U32(data.indices.clone()));
    mesh
}

fn copy_float3(mesh: &mut Mesh, attribute: MeshVertexAttribute, values: &[[f32; 3]]) {
    if let Some(VertexAttributeValues::Float32x3(dst)) = mesh.attribute_mut(attribute) {
        if dst.len() == values.len() {
            dst.copy_from_slice(values);
            return;
        }
    }
    mesh.insert_attribute(attribute, values.to_vec());
}

/// Copies a refreshed buffer into an existing mesh.
///
/// UVs and indices only change with the grid size, so they are rewritten
/// only when the vertex count no longer matches.
pub fn write_water_mesh(mesh: &mut Mesh, data: &WaveMeshData) {
    let resized = mesh.count_vertices() != data.vertex_count();

    copy_float3(mesh, Mesh::ATTRIBUTE_POSITION, &data.positions);
    copy_float3(mesh, Mesh::ATTRIBUTE_NORMAL, &data.normals);

    if resized {
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.uvs.clone());
        mesh.insert_indices(Indices::U32(data.indices.clone()));
    }
}

pub fn spawn_water_system(
    mut commands: Commands,
    simulation: Res<WaveSimulation>,
    mut buffer: ResMut<WaterMeshBuffer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    buffer.0 = WaveMeshData::from_waves(&simulation.waves);
    info!(
        "Water mesh: {} vertices, {} triangles",
        buffer.0.vertex_count(),
        buffer.0.triangle_count()
    );

    commands.spawn((
        WaterSurface,
        Mesh3d(meshes.add(build_water_mesh(&buffer.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.1, 0.35, 0.6, 0.85),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.15,
            reflectance: 0.6,
            double_sided: true,
            cull_mode: None,
            ..default()
        })),
        Transform::default(),
        // the bounding box is computed from the flat starting surface
        NoFrustumCulling,
    ));
}

pub fn upload_water_mesh_system(
    simulation: Res<WaveSimulation>,
    mut buffer: ResMut<WaterMeshBuffer>,
    water: Query<&Mesh3d, With<WaterSurface>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    if !simulation.is_changed() {
        return;
    }

    buffer.0.refresh(&simulation.waves);
    for mesh3d in water.iter() {
        if let Some(mesh) = meshes.get_mut(&mesh3d.0) {
            write_water_mesh(mesh, &buffer.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::water::{WaveParams, Waves};

    fn waves(rows: usize, cols: usize) -> Waves {
        Waves::new(WaveParams::new(rows, cols, 1.0, 0.03, 3.25, 0.4)).unwrap()
    }

    #[test]
    fn test_built_mesh_matches_the_grid() {
        let data = WaveMeshData::from_waves(&waves(6, 7));
        let mesh = build_water_mesh(&data);
        assert_eq!(mesh.count_vertices(), 42);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(5 * 6 * 6));
    }

    #[test]
    fn test_write_updates_heights_in_place() {
        let mut waves = waves(8, 8);
        let mut data = WaveMeshData::from_waves(&waves);
        let mut mesh = build_water_mesh(&data);

        waves.disturb(3, 3, 2.0).unwrap();
        data.refresh(&waves);
        write_water_mesh(&mut mesh, &data);

        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("water mesh has no positions");
        };
        assert_eq!(positions[3 * 8 + 3][1], 2.0);
    }

    #[test]
    fn test_write_after_resize_replaces_indices() {
        let mut waves = waves(4, 4);
        let mut data = WaveMeshData::from_waves(&waves);
        let mut mesh = build_water_mesh(&data);

        waves
            .initialize(WaveParams::new(5, 6, 1.0, 0.03, 3.25, 0.4))
            .unwrap();
        data.refresh(&waves);
        write_water_mesh(&mut mesh, &data);

        assert_eq!(mesh.count_vertices(), 30);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(4 * 5 * 6));
    }
}
