//! Error types for the wave simulator and its configuration.

use thiserror::Error;

pub type WaveResult<T> = Result<T, WaveError>;

#[derive(Error, Debug)]
pub enum WaveError {
    /// A construction or update argument is outside its valid range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Disturbance coordinates too close to, or beyond, the grid boundary.
    #[error("disturbance at ({row}, {col}) out of range for a {rows}x{cols} grid (needs 2 <= i < n-2)")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl WaveError {
    pub(crate) fn invalid(name: &'static str, value: impl Into<f64>, reason: &'static str) -> Self {
        WaveError::InvalidParameter {
            name,
            value: value.into(),
            reason,
        }
    }
}
