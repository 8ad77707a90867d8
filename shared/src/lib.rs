use std::path::PathBuf;

use bevy_ecs::resource::Resource;

pub mod constants;
pub mod sets;
pub mod water;
pub mod world;

pub use constants::*;

#[derive(Resource, Debug, Clone)]
pub struct DemoFolderPaths {
    pub config_folder_path: PathBuf,
}

impl DemoFolderPaths {
    /// Default location of the wave config file.
    pub fn wave_config_path(&self) -> PathBuf {
        self.config_folder_path.join(WAVE_CONFIG_FILE)
    }
}

pub fn get_demo_folder_paths(config_folder_path: Option<String>) -> DemoFolderPaths {
    match config_folder_path {
        Some(config) => DemoFolderPaths {
            config_folder_path: config.into(),
        },
        None => default_demo_folder_paths(),
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(target_os = "windows")]
pub fn default_demo_folder_paths() -> DemoFolderPaths {
    let app_data = std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(home_dir);
    DemoFolderPaths {
        config_folder_path: app_data.join("wavedemo"),
    }
}

#[cfg(target_os = "linux")]
pub fn default_demo_folder_paths() -> DemoFolderPaths {
    DemoFolderPaths {
        config_folder_path: home_dir().join(".config/wavedemo"),
    }
}

#[cfg(target_os = "macos")]
pub fn default_demo_folder_paths() -> DemoFolderPaths {
    DemoFolderPaths {
        config_folder_path: home_dir().join("Library/Application Support/wavedemo"),
    }
}

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
pub fn default_demo_folder_paths() -> DemoFolderPaths {
    DemoFolderPaths {
        config_folder_path: home_dir().join(".wavedemo"),
    }
}
