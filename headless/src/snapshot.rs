use bevy_log::info;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use shared::water::{WaveError, WaveResult, Waves};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Heights of a wave field at one instant, row-major.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HeightSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub spacing: f32,
    pub step_count: u64,
    pub heights: Vec<f32>,
}

impl HeightSnapshot {
    pub fn from_waves(waves: &Waves) -> Self {
        Self {
            rows: waves.row_count(),
            cols: waves.column_count(),
            spacing: waves.spacing(),
            step_count: waves.step_count(),
            heights: waves.positions().iter().map(|p| p.y).collect(),
        }
    }

    pub fn height(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.heights.get(row * self.cols + col).copied()
    }
}

pub fn save_snapshot(snapshot: &HeightSnapshot, path: &Path) -> WaveResult<()> {
    // keep the height list on a single line
    let pretty_config = PrettyConfig::new().with_depth_limit(1);

    let serialized = ron::ser::to_string_pretty(snapshot, pretty_config)
        .map_err(|e| WaveError::Config(e.to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(serialized.as_bytes())?;
    info!(
        "Height snapshot ({}x{}, step {}) saved to {}",
        snapshot.rows,
        snapshot.cols,
        snapshot.step_count,
        path.display()
    );
    Ok(())
}

pub fn load_snapshot(path: &Path) -> WaveResult<HeightSnapshot> {
    let contents = fs::read_to_string(path)?;
    let snapshot: HeightSnapshot = ron::de::from_str(&contents)
        .map_err(|e| WaveError::Config(format!("{}: {e}", path.display())))?;

    if snapshot.heights.len() != snapshot.rows * snapshot.cols {
        return Err(WaveError::Config(format!(
            "{}: expected {} heights, found {}",
            path.display(),
            snapshot.rows * snapshot.cols,
            snapshot.heights.len()
        )));
    }
    log::debug!("Loaded snapshot from {}", path.display());
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::water::WaveParams;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("headless-snapshot-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_snapshot_captures_heights() {
        let mut waves = Waves::new(WaveParams::new(6, 8, 0.5, 0.03, 3.25, 0.4)).unwrap();
        waves.disturb(3, 4, 1.0).unwrap();
        waves.update(0.03).unwrap();

        let snapshot = HeightSnapshot::from_waves(&waves);
        assert_eq!(snapshot.heights.len(), 48);
        assert_eq!(snapshot.step_count, 1);
        assert_eq!(snapshot.height(3, 4), waves.height(3, 4));
        assert_eq!(snapshot.height(6, 0), None);
    }

    #[test]
    fn test_save_then_load() {
        let mut waves = Waves::new(WaveParams::new(5, 5, 1.0, 0.03, 3.25, 0.4)).unwrap();
        waves.disturb(2, 2, 1.5).unwrap();
        let snapshot = HeightSnapshot::from_waves(&waves);

        let path = temp_path("roundtrip/nested/snapshot.ron");
        save_snapshot(&snapshot, &path).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.rows, 5);
        assert_eq!(loaded.height(2, 2), Some(1.5));
        assert_eq!(loaded.height(2, 1), Some(0.75));
        let _ = fs::remove_dir_all(temp_path("roundtrip"));
    }

    #[test]
    fn test_load_rejects_mismatched_size() {
        let path = temp_path("bad.ron");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "(rows: 2, cols: 2, spacing: 1.0, step_count: 0, heights: [0.0, 0.0])",
        )
        .unwrap();
        assert!(matches!(load_snapshot(&path), Err(WaveError::Config(_))));
        let _ = fs::remove_file(&path);
    }
}
