use bevy::prelude::*;
use shared::water::{WaveSimulation, WaveSimulationSettings};

use crate::constants::HUD_FONT_SIZE;

/// Marker for the single HUD text line.
#[derive(Component)]
pub struct HudText;

pub fn hud_line(simulation: &WaveSimulation, paused: bool) -> String {
    let stats = simulation.waves.stats();
    let mut line = format!(
        "Step: {} | Height: [{:+.3}, {:+.3}] | Disturbances: {}",
        simulation.waves.step_count(),
        stats.min_height,
        stats.max_height,
        simulation.disturbances
    );
    if paused {
        line.push_str(" | PAUSED");
    }
    line
}

pub fn setup_hud_system(mut commands: Commands) {
    commands
        .spawn((
            BackgroundColor(Color::BLACK.with_alpha(0.5)),
            GlobalZIndex(i32::MAX),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(1.),
                top: Val::Percent(1.),
                bottom: Val::Auto,
                right: Val::Auto,
                padding: UiRect::all(Val::Px(4.0)),
                ..default()
            },
        ))
        .with_child((
            HudText,
            Text::new("Step: 0"),
            TextFont::from_font_size(HUD_FONT_SIZE),
            TextColor(Color::WHITE),
        ));
}

pub fn hud_text_update_system(
    query: Query<Entity, With<HudText>>,
    mut writer: TextUiWriter,
    simulation: Res<WaveSimulation>,
    settings: Res<WaveSimulationSettings>,
) {
    for entity in query.iter() {
        *writer.text(entity, 0) = hud_line(&simulation, settings.paused);
    }
}
