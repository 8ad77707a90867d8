use crate::{constants::BINDS_PATH, input::data::WaveAction, KeyMap};
use bevy::prelude::*;
use bevy::{input::ButtonInput, prelude::KeyCode};
use ron::{from_str, ser::PrettyConfig};
use shared::water::{WaveError, WaveResult};
use shared::DemoFolderPaths;
use std::path::Path;
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
};

/// Writes `key_map` as RON, creating the config folder if needed.
fn write_keybindings_to_path(key_map: &KeyMap, binds_path: &Path) -> WaveResult<()> {
    let pretty_config = PrettyConfig::new()
        .with_depth_limit(2)
        .with_enumerate_arrays(false);

    let serialized = ron::ser::to_string_pretty(key_map, pretty_config).map_err(|e| {
        WaveError::Config(format!("could not serialize {} key bindings: {e}", key_map.map.len()))
    })?;
    if let Some(parent) = binds_path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(binds_path)?.write_all(serialized.as_bytes())?;
    debug!("Wrote {} key bindings to {:?}", key_map.map.len(), binds_path);
    Ok(())
}

pub fn is_action_just_pressed(
    action: WaveAction,
    keyboard_input: &ButtonInput<KeyCode>,
    key_map: &KeyMap,
) -> bool {
    key_map
        .map
        .get(&action)
        .is_some_and(|key_codes| keyboard_input.any_just_pressed(key_codes.iter().copied()))
}

pub(crate) fn default_key_map() -> BTreeMap<WaveAction, Vec<KeyCode>> {
    let mut map = BTreeMap::new();
    map.insert(WaveAction::ToggleWireframe, vec![KeyCode::Digit1, KeyCode::F6]);
    map.insert(WaveAction::Pause, vec![KeyCode::Space, KeyCode::KeyP]);
    map.insert(WaveAction::Reset, vec![KeyCode::KeyR]);
    map.insert(WaveAction::Disturb, vec![KeyCode::KeyD, KeyCode::Enter]);
    map.insert(WaveAction::Quit, vec![KeyCode::Escape]);
    map
}

/// Reads the key map at `binds_path`, writing the defaults there if it is
/// missing or unreadable.
pub fn load_or_create_bindings(binds_path: &Path) -> KeyMap {
    if let Ok(content) = fs::read_to_string(binds_path) {
        match from_str::<KeyMap>(&content) {
            Ok(key_map) => return key_map,
            Err(e) => warn!(
                "Ignoring invalid keybindings file {:?}: {}",
                binds_path, e
            ),
        }
    }

    let key_map = KeyMap::default();
    if let Err(e) = write_keybindings_to_path(&key_map, binds_path) {
        error!(
            "Failed to create default keybindings file at {:?}: {}",
            binds_path, e
        );
    }
    key_map
}

pub fn get_bindings(demo_folder_paths: &DemoFolderPaths) -> KeyMap {
    load_or_create_bindings(&demo_folder_paths.config_folder_path.join(BINDS_PATH))
}
