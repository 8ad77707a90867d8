//! Frame budget, periodic statistics and the final snapshot.

use bevy::prelude::*;
use bevy_log::{error, info};
use shared::water::WaveSimulation;
use std::path::PathBuf;

use crate::snapshot::{save_snapshot, HeightSnapshot};

#[derive(Resource, Debug, Clone)]
pub struct RunSettings {
    /// Number of frames to run before exiting
    pub frames: u64,
    /// Log field statistics every N frames, 0 disables
    pub log_every: u64,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            frames: 600,
            log_every: 60,
            snapshot_path: None,
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct RunProgress {
    pub frames: u64,
    pub finished: bool,
}

pub fn track_progress_system(
    settings: Res<RunSettings>,
    simulation: Res<WaveSimulation>,
    mut progress: ResMut<RunProgress>,
    mut ev_app_exit: EventWriter<AppExit>,
) {
    if progress.finished {
        return;
    }
    progress.frames += 1;

    if settings.log_every > 0 && progress.frames % settings.log_every == 0 {
        let stats = simulation.waves.stats();
        info!(
            "frame {} | step {} | height [{:.4}, {:.4}] | mean |h| {:.5} | disturbances {}",
            progress.frames,
            simulation.waves.step_count(),
            stats.min_height,
            stats.max_height,
            stats.mean_abs_height,
            simulation.disturbances
        );
    }

    if progress.frames < settings.frames {
        return;
    }
    progress.finished = true;

    let mut exit = AppExit::Success;
    if let Some(path) = &settings.snapshot_path {
        let snapshot = HeightSnapshot::from_waves(&simulation.waves);
        if let Err(err) = save_snapshot(&snapshot, path) {
            error!("Could not save snapshot to {}: {}", path.display(), err);
            exit = AppExit::error();
        }
    }

    info!(
        "Finished {} frames ({} steps, {:.2}s simulated)",
        progress.frames,
        simulation.waves.step_count(),
        simulation.elapsed
    );
    ev_app_exit.write(exit);
}
