pub const WAVE_CONFIG_FILE: &str = "waves.ron";

// Grid and dynamics used by the wave demo.
pub const DEFAULT_ROWS: usize = 200;
pub const DEFAULT_COLS: usize = 200;
pub const DEFAULT_SPACING: f32 = 0.8;
pub const DEFAULT_TIME_STEP: f32 = 0.03;
pub const DEFAULT_SPEED: f32 = 3.25;
pub const DEFAULT_DAMPING: f32 = 0.4;

// Grid used by the lighting and textured hills demos.
pub const HILLS_ROWS: usize = 160;
pub const HILLS_COLS: usize = 160;
pub const HILLS_SPACING: f32 = 1.0;

pub const DISTURBANCE_INTERVAL: f32 = 0.25;
pub const DISTURBANCE_MARGIN: usize = 5;
pub const DISTURBANCE_MIN_MAGNITUDE: f32 = 1.0;
pub const DISTURBANCE_MAX_MAGNITUDE: f32 = 2.0;

/// Side length of the hills terrain and its grid resolution.
pub const TERRAIN_SIZE: f32 = 160.0;
pub const TERRAIN_RESOLUTION: usize = 50;

pub const CONFIG_READ_ERROR: &str = "Failed to read wave config";
pub const CONFIG_PARSE_ERROR: &str = "Failed to parse wave config";
