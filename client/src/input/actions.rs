use bevy::pbr::wireframe::WireframeConfig;
use bevy::prelude::*;
use shared::water::{DisturbanceSchedule, WaveSimulation, WaveSimulationSettings};

use crate::input::data::WaveAction;
use crate::input::keyboard::is_action_just_pressed;
use crate::KeyMap;

pub fn wave_actions_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
    mut settings: ResMut<WaveSimulationSettings>,
    mut simulation: ResMut<WaveSimulation>,
    mut schedule: ResMut<DisturbanceSchedule>,
    mut wireframe: ResMut<WireframeConfig>,
    mut ev_app_exit: EventWriter<AppExit>,
) {
    let pressed = |action| is_action_just_pressed(action, &keyboard_input, &key_map);

    if pressed(WaveAction::ToggleWireframe) {
        wireframe.global = !wireframe.global;
        debug!("Wireframe {}", if wireframe.global { "on" } else { "off" });
    }

    if pressed(WaveAction::Pause) {
        settings.paused = !settings.paused;
        info!(
            "Simulation {}",
            if settings.paused { "paused" } else { "resumed" }
        );
    }

    if pressed(WaveAction::Reset) {
        simulation.reset();
        schedule.scheduler.restart(simulation.elapsed);
        info!("Waves reset");
    }

    if pressed(WaveAction::Disturb) {
        let rows = simulation.waves.row_count();
        let cols = simulation.waves.column_count();
        if let Some(disturbance) = schedule.scheduler.sample(rows, cols) {
            if let Err(e) = simulation.disturb(disturbance) {
                warn!("Manual disturbance failed: {}", e);
            }
        }
    }

    if pressed(WaveAction::Quit) {
        ev_app_exit.write(AppExit::Success);
    }
}
