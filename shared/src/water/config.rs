//! Wave simulation configuration.
//!
//! A `WaveConfig` is what a `waves.ron` file holds: grid and dynamics for the
//! simulator, the step policy, and the random disturbance schedule.

use std::{
    fs::{self, File},
    io::Write,
    path::Path,
    str::FromStr,
};

use bevy_log::{info, warn};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

use super::error::{WaveError, WaveResult};
use crate::constants::*;

/// Grid and physical parameters for `Waves::initialize`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    /// Number of grid rows (z axis)
    pub rows: usize,
    /// Number of grid columns (x axis)
    pub cols: usize,
    /// Distance between adjacent lattice points
    pub spacing: f32,
    /// Fixed simulation step, independent of frame rate
    pub time_step: f32,
    /// Wave propagation speed
    pub speed: f32,
    /// Damping factor (0.0 = waves never die out)
    pub damping: f32,
}

impl WaveParams {
    pub fn new(
        rows: usize,
        cols: usize,
        spacing: f32,
        time_step: f32,
        speed: f32,
        damping: f32,
    ) -> Self {
        Self {
            rows,
            cols,
            spacing,
            time_step,
            speed,
            damping,
        }
    }

    pub fn validate(&self) -> WaveResult<()> {
        if self.rows < 2 {
            return Err(WaveError::invalid("rows", self.rows as f64, "must be >= 2"));
        }
        if self.cols < 2 {
            return Err(WaveError::invalid("cols", self.cols as f64, "must be >= 2"));
        }
        // mesh indices are u32
        match self.rows.checked_mul(self.cols) {
            Some(points) if points <= u32::MAX as usize => {}
            _ => {
                return Err(WaveError::invalid(
                    "rows * cols",
                    self.rows as f64 * self.cols as f64,
                    "grid must have at most u32::MAX points",
                ))
            }
        }
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(WaveError::invalid("spacing", self.spacing, "must be finite and > 0"));
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(WaveError::invalid(
                "time_step",
                self.time_step,
                "must be finite and > 0",
            ));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(WaveError::invalid("speed", self.speed, "must be finite and > 0"));
        }
        if !self.damping.is_finite() || self.damping < 0.0 {
            return Err(WaveError::invalid("damping", self.damping, "must be finite and >= 0"));
        }
        Ok(())
    }

    /// Largest speed for which the explicit scheme stays bounded.
    pub fn max_stable_speed(&self) -> f32 {
        self.spacing / (2.0 * self.time_step) * (self.damping * self.time_step + 2.0).sqrt()
    }
}

impl Default for WaveParams {
    fn default() -> Self {
        Self::new(
            DEFAULT_ROWS,
            DEFAULT_COLS,
            DEFAULT_SPACING,
            DEFAULT_TIME_STEP,
            DEFAULT_SPEED,
            DEFAULT_DAMPING,
        )
    }
}

/// How `Waves::update` consumes accumulated frame time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StepPolicy {
    /// At most one step per update. Under low frame rates the simulation
    /// runs slower than wall-clock time.
    #[default]
    Single,
    /// Step until the accumulator drops below the time step, capped at
    /// `max_steps`. Time beyond the cap is discarded.
    CatchUp { max_steps: u32 },
}

/// Interval-gated random disturbances ("raindrops").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisturbanceConfig {
    pub enabled: bool,
    /// Seconds between two disturbances
    pub interval: f32,
    /// Rows/columns kept clear of the grid edge, at least 2
    pub margin: usize,
    pub min_magnitude: f32,
    pub max_magnitude: f32,
}

impl DisturbanceConfig {
    pub fn validate(&self) -> WaveResult<()> {
        if !self.interval.is_finite() || self.interval <= 0.0 {
            return Err(WaveError::invalid("interval", self.interval, "must be finite and > 0"));
        }
        if self.margin < 2 {
            return Err(WaveError::invalid("margin", self.margin as f64, "must be >= 2"));
        }
        if !self.min_magnitude.is_finite() || self.min_magnitude < 0.0 {
            return Err(WaveError::invalid(
                "min_magnitude",
                self.min_magnitude,
                "must be finite and >= 0",
            ));
        }
        if !self.max_magnitude.is_finite() || self.max_magnitude < self.min_magnitude {
            return Err(WaveError::invalid(
                "max_magnitude",
                self.max_magnitude,
                "must be finite and >= min_magnitude",
            ));
        }
        Ok(())
    }
}

impl Default for DisturbanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: DISTURBANCE_INTERVAL,
            margin: DISTURBANCE_MARGIN,
            min_magnitude: DISTURBANCE_MIN_MAGNITUDE,
            max_magnitude: DISTURBANCE_MAX_MAGNITUDE,
        }
    }
}

/// Complete wave system configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WaveConfig {
    pub params: WaveParams,
    #[serde(default)]
    pub step_policy: StepPolicy,
    #[serde(default)]
    pub disturbance: DisturbanceConfig,
}

impl WaveConfig {
    pub fn validate(&self) -> WaveResult<()> {
        self.params.validate()?;
        if let StepPolicy::CatchUp { max_steps } = self.step_policy {
            if max_steps == 0 {
                return Err(WaveError::invalid("max_steps", 0.0f32, "must be >= 1"));
            }
        }
        self.disturbance.validate()
    }
}

/// Preset configurations matching the demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WavePreset {
    /// 200x200 grid used by the wave demo
    #[default]
    Demo,
    /// 160x160 grid used by the lighting, blend and textured hills demos
    Hills,
    /// Demo grid with no random disturbances
    Still,
}

impl WavePreset {
    pub fn to_config(self) -> WaveConfig {
        let mut config = WaveConfig::default();

        match self {
            WavePreset::Demo => {}
            WavePreset::Hills => {
                config.params.rows = HILLS_ROWS;
                config.params.cols = HILLS_COLS;
                config.params.spacing = HILLS_SPACING;
            }
            WavePreset::Still => {
                config.disturbance.enabled = false;
            }
        }

        config
    }
}

impl FromStr for WavePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "demo" => Ok(WavePreset::Demo),
            "hills" => Ok(WavePreset::Hills),
            "still" => Ok(WavePreset::Still),
            other => Err(format!(
                "unknown preset `{other}` (expected demo, hills or still)"
            )),
        }
    }
}

/// Loads and validates a RON wave config. A missing file is an `Io` error.
pub fn load_wave_config(path: &Path) -> WaveResult<WaveConfig> {
    let contents = fs::read_to_string(path)?;
    let config: WaveConfig = ron::de::from_str(&contents)
        .map_err(|e| WaveError::Config(format!("{CONFIG_PARSE_ERROR} {}: {e}", path.display())))?;
    config.validate()?;

    info!("Loaded wave config from {}", path.display());
    Ok(config)
}

/// Like `load_wave_config`, but a missing file is created from the default
/// preset so the user has a `waves.ron` to edit.
pub fn load_or_create_wave_config(path: &Path) -> WaveResult<WaveConfig> {
    if path.exists() {
        return load_wave_config(path);
    }

    let config = WavePreset::default().to_config();
    info!(
        "Wave config file not found: {}. Writing the default preset there.",
        path.display()
    );
    if let Err(e) = save_wave_config(&config, path) {
        warn!("Could not write default wave config to {}: {}", path.display(), e);
    }
    Ok(config)
}

pub fn save_wave_config(config: &WaveConfig, path: &Path) -> WaveResult<()> {
    let pretty_config = PrettyConfig::new()
        .with_depth_limit(3)
        .with_separate_tuple_members(true)
        .with_enumerate_arrays(true);

    let serialized = ron::ser::to_string_pretty(config, pretty_config)
        .map_err(|e| WaveError::Config(e.to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(serialized.as_bytes())?;
    Ok(())
}
