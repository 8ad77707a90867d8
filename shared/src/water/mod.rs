//! Height-field water driven by a finite-difference wave equation.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  WaveConfig (ron / presets)                   │
//! │  - Grid and dynamics (rows, cols, dx, dt, speed, damping)    │
//! │  - Step policy, disturbance schedule                          │
//! └──────────────────────────┬───────────────────────────────────┘
//!                            │
//!            ┌───────────────┴────────────────┐
//!            ▼                                ▼
//!   ┌─────────────────┐              ┌──────────────────┐
//!   │      Waves      │◄─ disturb ───│ Disturbance      │
//!   │ (simulation.rs) │              │ Scheduler        │
//!   │                 │              └──────────────────┘
//!   │ - prev / curr   │
//!   │ - fixed step    │───── read ──► normals.rs, mesh.rs
//!   └─────────────────┘                (mesh sink)
//! ```
//!
//! The simulator never touches normals or GPU buffers. Callers read the
//! positions after `update` and derive whatever vertex data they need.

pub mod config;
pub mod disturbance;
pub mod error;
pub mod mesh;
pub mod normals;
pub mod plugin;
pub mod simulation;

pub use config::{
    load_or_create_wave_config, load_wave_config, save_wave_config, DisturbanceConfig, StepPolicy, WaveConfig, WaveParams,
    WavePreset,
};
pub use disturbance::{Disturbance, DisturbanceScheduler};
pub use error::{WaveError, WaveResult};
pub use mesh::{grid_indices, WaveMeshData};
pub use normals::{compute_normals, surface_normals};
pub use plugin::{DisturbanceSchedule, WaveSimulation, WaveSimulationSettings, WavesPlugin};
pub use simulation::{FieldStats, StepCoefficients, Waves};
