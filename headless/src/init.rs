use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_app::ScheduleRunnerPlugin;
use bevy_log::{error, info};
use shared::constants::CONFIG_READ_ERROR;
use shared::get_demo_folder_paths;
use shared::sets::WaveUpdateSet;
use shared::water::{
    load_or_create_wave_config, load_wave_config, WaveConfig, WaveError, WavePreset, WaveResult,
    WavesPlugin,
};
use std::path::PathBuf;
use std::time::Duration;

use crate::runner::{track_progress_system, RunProgress, RunSettings};

#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    /// RON config file, takes precedence over `preset`
    pub config_path: Option<PathBuf>,
    /// Used when no config file is given; `None` reads the user's `waves.ron`,
    /// writing the default preset there on first use
    pub preset: Option<WavePreset>,
    pub seed: Option<u64>,
    pub frame_rate: f64,
    pub run: RunSettings,
}

impl HeadlessOptions {
    pub fn wave_config(&self) -> WaveResult<WaveConfig> {
        match (&self.config_path, self.preset) {
            (Some(path), _) => load_wave_config(path),
            (None, Some(preset)) => Ok(preset.to_config()),
            (None, None) => {
                load_or_create_wave_config(&get_demo_folder_paths(None).wave_config_path())
            }
        }
    }
}

/// Adds the wave simulation and the run bookkeeping to an app that already
/// has time support (`MinimalPlugins` or `TimePlugin`).
///
/// Every frame advances time by exactly `1 / frame_rate` seconds, so two runs
/// with the same config and seed produce the same field.
pub fn build_app(
    app: &mut App,
    config: &WaveConfig,
    seed: Option<u64>,
    frame_rate: f64,
    run: RunSettings,
) -> WaveResult<()> {
    if !frame_rate.is_finite() || frame_rate <= 0.0 {
        return Err(WaveError::InvalidParameter {
            name: "frame_rate",
            value: frame_rate,
            reason: "must be finite and positive",
        });
    }

    let frame_time = Duration::from_secs_f64(1.0 / frame_rate);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(frame_time));
    // slow frame rates would otherwise be clamped by the virtual clock
    if let Some(mut virtual_time) = app.world_mut().get_resource_mut::<Time<Virtual>>() {
        let max_delta = virtual_time.max_delta().max(frame_time);
        virtual_time.set_max_delta(max_delta);
    }

    app.add_plugins(WavesPlugin::new(config, seed)?);
    app.insert_resource(run);
    app.init_resource::<RunProgress>();
    app.add_systems(Update, track_progress_system.in_set(WaveUpdateSet::Ui));
    Ok(())
}

pub fn init(options: HeadlessOptions) -> AppExit {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)));
    app.add_plugins(bevy_log::LogPlugin::default());

    let config = match options.wave_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{}: {}", CONFIG_READ_ERROR, err);
            return AppExit::error();
        }
    };

    info!(
        "Running {}x{} wave field (dx {}, dt {}) for {} frames at {} fps",
        config.params.rows,
        config.params.cols,
        config.params.spacing,
        config.params.time_step,
        options.run.frames,
        options.frame_rate
    );

    if let Err(err) = build_app(
        &mut app,
        &config,
        options.seed,
        options.frame_rate,
        options.run,
    ) {
        error!("Could not start the simulation: {}", err);
        return AppExit::error();
    }

    app.run()
}
