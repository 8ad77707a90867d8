//! Random, interval-gated disturbances that keep the water moving.

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::config::DisturbanceConfig;
use super::error::WaveResult;
use super::simulation::Waves;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disturbance {
    pub row: usize,
    pub col: usize,
    pub magnitude: f32,
}

/// Emits at most one disturbance per poll once `interval` seconds have
/// passed since the previous one.
#[derive(Debug, Clone)]
pub struct DisturbanceScheduler {
    config: DisturbanceConfig,
    rng: StdRng,
    /// Total time at which the last interval started
    time_base: f32,
}

impl DisturbanceScheduler {
    pub fn new(config: DisturbanceConfig, seed: Option<u64>) -> WaveResult<Self> {
        config.validate()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            time_base: 0.0,
        })
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Restarts the interval clock at `total_time`.
    pub fn restart(&mut self, total_time: f32) {
        self.time_base = total_time;
    }

    /// Returns the disturbance due at `total_time`, if any.
    ///
    /// Grids too small to keep `margin` points clear of the edge never get one.
    pub fn poll(&mut self, total_time: f32, rows: usize, cols: usize) -> Option<Disturbance> {
        if !self.config.enabled || total_time - self.time_base < self.config.interval {
            return None;
        }
        self.time_base += self.config.interval;
        self.sample(rows, cols)
    }

    /// Draws a random in-range disturbance, ignoring the interval clock.
    pub fn sample(&mut self, rows: usize, cols: usize) -> Option<Disturbance> {
        let margin = self.config.margin;
        if rows <= 2 * margin || cols <= 2 * margin {
            log::debug!(
                "{}x{} grid is too small for a disturbance margin of {}",
                rows,
                cols,
                margin
            );
            return None;
        }

        Some(Disturbance {
            row: self.rng.gen_range(margin..rows - margin),
            col: self.rng.gen_range(margin..cols - margin),
            magnitude: self
                .rng
                .gen_range(self.config.min_magnitude..=self.config.max_magnitude),
        })
    }

    /// Polls and applies the result to `waves`.
    pub fn apply(&mut self, waves: &mut Waves, total_time: f32) -> WaveResult<Option<Disturbance>> {
        let Some(disturbance) = self.poll(total_time, waves.row_count(), waves.column_count())
        else {
            return Ok(None);
        };
        waves.disturb(disturbance.row, disturbance.col, disturbance.magnitude)?;
        Ok(Some(disturbance))
    }
}
