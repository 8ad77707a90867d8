use bevy::{
    prelude::*,
    render::{
        mesh::{Indices, PrimitiveTopology},
        render_asset::RenderAssetUsages,
    },
};
use shared::world::TerrainMeshData;
use shared::{TERRAIN_RESOLUTION, TERRAIN_SIZE};

#[derive(Component)]
pub struct Terrain;

pub fn build_terrain_mesh(data: TerrainMeshData) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, data.colors);
    mesh.insert_indices(Indices::U32(data.indices));
    mesh
}

pub fn spawn_terrain_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let data = TerrainMeshData::grid(
        TERRAIN_SIZE,
        TERRAIN_SIZE,
        TERRAIN_RESOLUTION,
        TERRAIN_RESOLUTION,
    );
    log::debug!("Terrain mesh: {} vertices", data.vertex_count());

    commands.spawn((
        Terrain,
        Mesh3d(meshes.add(build_terrain_mesh(data))),
        // vertex colors carry the height bands
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::default(),
    ));
}
