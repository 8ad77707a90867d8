//! Bevy plugin that drives the wave simulation once per frame.

use bevy::prelude::*;
use bevy_log::{debug, warn};

use super::config::WaveConfig;
use super::disturbance::{Disturbance, DisturbanceScheduler};
use super::error::WaveResult;
use super::simulation::Waves;
use crate::sets::WaveUpdateSet;

/// The simulated water surface.
#[derive(Resource, Debug, Clone)]
pub struct WaveSimulation {
    pub waves: Waves,
    /// Simulated seconds, excluding time spent paused
    pub elapsed: f32,
    pub frames: u64,
    pub disturbances: u64,
}

impl WaveSimulation {
    pub fn new(waves: Waves) -> Self {
        Self {
            waves,
            elapsed: 0.0,
            frames: 0,
            disturbances: 0,
        }
    }

    pub fn disturb(&mut self, disturbance: Disturbance) -> WaveResult<()> {
        self.waves
            .disturb(disturbance.row, disturbance.col, disturbance.magnitude)?;
        self.disturbances += 1;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.waves.reset();
        self.elapsed = 0.0;
        self.frames = 0;
        self.disturbances = 0;
    }
}

#[derive(Resource, Debug, Clone)]
pub struct DisturbanceSchedule {
    pub scheduler: DisturbanceScheduler,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct WaveSimulationSettings {
    pub paused: bool,
}

/// Adds the wave resources and the per-frame disturb/step systems.
///
/// The plugin is built from an already validated config, so a bad config
/// is reported by `WavesPlugin::new` instead of panicking inside `App`.
pub struct WavesPlugin {
    simulation: WaveSimulation,
    schedule: DisturbanceSchedule,
}

impl WavesPlugin {
    pub fn new(config: &WaveConfig, seed: Option<u64>) -> WaveResult<Self> {
        config.validate()?;
        let mut waves = Waves::new(config.params)?;
        waves.set_step_policy(config.step_policy);
        let scheduler = DisturbanceScheduler::new(config.disturbance, seed)?;

        Ok(Self {
            simulation: WaveSimulation::new(waves),
            schedule: DisturbanceSchedule { scheduler },
        })
    }
}

impl Plugin for WavesPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.simulation.clone())
            .insert_resource(self.schedule.clone())
            .init_resource::<WaveSimulationSettings>()
            .configure_sets(
                Update,
                (
                    WaveUpdateSet::Input,
                    WaveUpdateSet::Simulate,
                    WaveUpdateSet::Upload,
                    WaveUpdateSet::Ui,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (disturb_waves_system, step_waves_system)
                    .chain()
                    .in_set(WaveUpdateSet::Simulate),
            );
    }
}

pub fn disturb_waves_system(
    time: Res<Time>,
    settings: Res<WaveSimulationSettings>,
    mut simulation: ResMut<WaveSimulation>,
    mut schedule: ResMut<DisturbanceSchedule>,
) {
    if settings.paused {
        return;
    }

    let simulation = &mut *simulation;
    let now = simulation.elapsed + time.delta_secs();

    match schedule.scheduler.apply(&mut simulation.waves, now) {
        Ok(Some(disturbance)) => {
            simulation.disturbances += 1;
            debug!(
                "Disturbed waves at ({}, {}) by {:.3}",
                disturbance.row, disturbance.col, disturbance.magnitude
            );
        }
        Ok(None) => {}
        Err(e) => warn!("Skipping disturbance: {}", e),
    }
}

pub fn step_waves_system(
    time: Res<Time>,
    settings: Res<WaveSimulationSettings>,
    mut simulation: ResMut<WaveSimulation>,
) {
    if settings.paused {
        return;
    }

    let dt = time.delta_secs();
    if let Err(e) = simulation.waves.update(dt) {
        warn!("Wave update skipped: {}", e);
        return;
    }
    simulation.elapsed += dt;
    simulation.frames += 1;
}
