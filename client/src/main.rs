mod camera;
mod constants;
mod input;
mod ui;
mod world;

use bevy::{
    pbr::wireframe::{WireframeConfig, WireframePlugin},
    prelude::*,
    render::{
        settings::{RenderCreation, WgpuFeatures, WgpuSettings},
        RenderPlugin,
    },
    window::PresentMode,
};
use clap::Parser;
use input::data::WaveAction;
use input::keyboard::get_bindings;
use serde::{Deserialize, Serialize};
use shared::constants::CONFIG_READ_ERROR;
use shared::sets::WaveUpdateSet;
use shared::water::{
    load_or_create_wave_config, load_wave_config, WaveConfig, WavePreset, WaveResult, WavesPlugin,
};
use shared::{get_demo_folder_paths, DemoFolderPaths};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, help = "RON wave config, overrides --preset")]
    config: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "demo, hills or still; defaults to the saved waves.ron, then demo"
    )]
    preset: Option<WavePreset>,

    #[arg(short, long, help = "Seed for the random disturbances")]
    seed: Option<u64>,

    #[arg(
        short,
        long,
        help = "Allows overriding of the folder holding binds.ron, defaults to the user config folder"
    )]
    assets_folder_path: Option<String>,
}

/// Light steel blue, the demos' clear color
pub const CLEAR_COLOR: Color = Color::srgb(0.69, 0.77, 0.87);

#[derive(Resource, Serialize, Deserialize)]
pub struct KeyMap {
    #[serde(default = "input::keyboard::default_key_map")]
    pub map: BTreeMap<WaveAction, Vec<KeyCode>>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            map: input::keyboard::default_key_map(),
        }
    }
}

/// An explicit `--config` wins, then `--preset`, then the user's `waves.ron`,
/// which is written with the default preset on first run like `binds.ron`.
fn wave_config(args: &Args, paths: &DemoFolderPaths) -> WaveResult<WaveConfig> {
    match (&args.config, args.preset) {
        (Some(path), _) => load_wave_config(path),
        (None, Some(preset)) => Ok(preset.to_config()),
        (None, None) => load_or_create_wave_config(&paths.wave_config_path()),
    }
}

fn scene_plugin(app: &mut App) {
    app.init_resource::<world::water::WaterMeshBuffer>()
        .add_systems(
            Startup,
            (
                camera::spawn_camera_system,
                world::lights::spawn_lights_system,
                world::terrain::spawn_terrain_system,
                world::water::spawn_water_system,
                ui::hud::setup_hud_system,
            ),
        )
        .add_systems(
            Update,
            (
                input::actions::wave_actions_system.in_set(WaveUpdateSet::Input),
                world::water::upload_water_mesh_system.in_set(WaveUpdateSet::Upload),
                ui::hud::hud_text_update_system.in_set(WaveUpdateSet::Ui),
                camera::orbit_camera_system,
                world::lights::orbit_light_system,
            ),
        );
}

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    let demo_folder_paths = get_demo_folder_paths(args.assets_folder_path.clone());

    println!(
        "Starting wave demo with config folder: {}",
        demo_folder_paths.config_folder_path.display()
    );

    let config = match wave_config(&args, &demo_folder_paths) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {}", CONFIG_READ_ERROR, err);
            std::process::exit(1);
        }
    };

    let waves_plugin = match WavesPlugin::new(&config, args.seed) {
        Ok(plugin) => plugin,
        Err(err) => {
            eprintln!("Invalid wave config: {err}");
            std::process::exit(1);
        }
    };

    let mut app = App::new();
    app.add_plugins((
        DefaultPlugins
            .set(RenderPlugin {
                render_creation: RenderCreation::Automatic(WgpuSettings {
                    // WARNING: This is a native-only feature. It will not work with WebGL or WebGPU
                    features: WgpuFeatures::POLYGON_MODE_LINE,
                    ..default()
                }),
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Wave Demo".to_string(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            }),
        WireframePlugin::default(),
    ));

    app.insert_resource(ClearColor(CLEAR_COLOR))
        .insert_resource(WireframeConfig {
            global: false,
            default_color: Color::BLACK,
        })
        .insert_resource(get_bindings(&demo_folder_paths))
        .insert_resource(demo_folder_paths)
        .add_plugins(waves_plugin)
        .add_plugins(scene_plugin)
        .run();
}
