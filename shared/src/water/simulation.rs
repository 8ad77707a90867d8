//! Finite-difference wave field simulator.
//!
//! The water surface is a `rows x cols` lattice of points whose heights obey
//! the damped 2D wave equation, integrated with an explicit scheme:
//!
//! ```text
//! y[n+1] = k1·y[n-1] + k2·y[n] + k3·(y_up + y_down + y_left + y_right)[n]
//! ```
//!
//! Two layers are kept (`previous`, `current`). A step writes the new heights
//! over `previous` and then swaps the layers, so no copy is ever made.
//! Boundary points are never written.

use std::ops::Index;

use bevy::math::Vec3;
use rayon::prelude::*;

use super::config::{StepPolicy, WaveParams};
use super::error::{WaveError, WaveResult};

/// Grids with at least this many points step their rows in parallel.
const PARALLEL_STEP_MIN_POINTS: usize = 64 * 64;

/// Update coefficients derived from spacing, time step, speed and damping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepCoefficients {
    pub k1: f32,
    pub k2: f32,
    pub k3: f32,
}

impl StepCoefficients {
    pub fn from_params(params: &WaveParams) -> Self {
        let dt = params.time_step;
        let dx = params.spacing;
        let d = params.damping * dt + 2.0;
        let e = (params.speed * params.speed) * (dt * dt) / (dx * dx);
        Self {
            k1: (params.damping * dt - 2.0) / d,
            k2: (4.0 - 8.0 * e) / d,
            k3: (2.0 * e) / d,
        }
    }
}

/// Summary of the current height field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldStats {
    pub min_height: f32,
    pub max_height: f32,
    pub mean_abs_height: f32,
}

#[derive(Debug, Clone)]
pub struct Waves {
    params: WaveParams,
    coefficients: StepCoefficients,
    step_policy: StepPolicy,
    /// Real time not yet consumed by a step, always in [0, time_step)
    accumulator: f32,
    steps: u64,
    previous: Vec<Vec3>,
    current: Vec<Vec3>,
}

impl Waves {
    pub fn new(params: WaveParams) -> WaveResult<Self> {
        let mut waves = Self {
            params,
            coefficients: StepCoefficients::default(),
            step_policy: StepPolicy::default(),
            accumulator: 0.0,
            steps: 0,
            previous: Vec::new(),
            current: Vec::new(),
        };
        waves.initialize(params)?;
        Ok(waves)
    }

    /// (Re)builds the lattice and coefficients. All heights start at zero.
    ///
    /// On error the simulator is left untouched.
    pub fn initialize(&mut self, params: WaveParams) -> WaveResult<()> {
        params.validate()?;

        let rows = params.rows;
        let cols = params.cols;
        let dx = params.spacing;
        let half_width = (cols - 1) as f32 * dx * 0.5;
        let half_depth = (rows - 1) as f32 * dx * 0.5;

        let mut lattice = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            let z = half_depth - i as f32 * dx;
            for j in 0..cols {
                let x = -half_width + j as f32 * dx;
                lattice.push(Vec3::new(x, 0.0, z));
            }
        }

        self.params = params;
        self.coefficients = StepCoefficients::from_params(&params);
        self.previous = lattice.clone();
        self.current = lattice;
        self.accumulator = 0.0;
        self.steps = 0;

        let max_speed = params.max_stable_speed();
        if params.speed > max_speed {
            log::warn!(
                "Wave speed {} exceeds the stable limit {} for dx={} dt={}, the field will blow up",
                params.speed,
                max_speed,
                params.spacing,
                params.time_step
            );
        }
        log::debug!(
            "Initialized {}x{} wave grid (k1={}, k2={}, k3={})",
            rows,
            cols,
            self.coefficients.k1,
            self.coefficients.k2,
            self.coefficients.k3
        );

        Ok(())
    }

    /// Flattens both layers without touching the lattice or coefficients.
    pub fn reset(&mut self) {
        for p in self.previous.iter_mut().chain(self.current.iter_mut()) {
            p.y = 0.0;
        }
        self.accumulator = 0.0;
        self.steps = 0;
    }

    pub fn set_step_policy(&mut self, policy: StepPolicy) {
        self.step_policy = policy;
    }

    /// Accumulates `dt` seconds and runs fixed steps according to the step policy.
    ///
    /// Returns the number of steps taken.
    pub fn update(&mut self, dt: f32) -> WaveResult<u32> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(WaveError::invalid("dt", dt, "must be finite and >= 0"));
        }

        self.accumulator += dt;
        if self.accumulator < self.params.time_step {
            return Ok(0);
        }

        let taken = match self.step_policy {
            StepPolicy::Single => {
                self.step();
                self.accumulator = 0.0;
                1
            }
            StepPolicy::CatchUp { max_steps } => {
                let mut taken = 0;
                while self.accumulator >= self.params.time_step && taken < max_steps {
                    self.step();
                    self.accumulator -= self.params.time_step;
                    taken += 1;
                }
                if self.accumulator >= self.params.time_step {
                    log::debug!(
                        "Dropping {}s of simulation time after {} catch-up steps",
                        self.accumulator,
                        taken
                    );
                    self.accumulator = 0.0;
                }
                taken
            }
        };

        Ok(taken)
    }

    /// Adds a pyramid-shaped impulse at `(row, col)`.
    ///
    /// The point gets `magnitude`, its four direct neighbours half of it.
    pub fn disturb(&mut self, row: usize, col: usize, magnitude: f32) -> WaveResult<()> {
        let rows = self.params.rows;
        let cols = self.params.cols;
        if row < 2 || row + 2 >= rows || col < 2 || col + 2 >= cols {
            return Err(WaveError::IndexOutOfRange {
                row,
                col,
                rows,
                cols,
            });
        }
        if !magnitude.is_finite() {
            return Err(WaveError::invalid("magnitude", magnitude, "must be finite"));
        }

        let half = 0.5 * magnitude;
        let idx = row * cols + col;
        self.current[idx].y += magnitude;
        self.current[idx + 1].y += half;
        self.current[idx - 1].y += half;
        self.current[idx + cols].y += half;
        self.current[idx - cols].y += half;

        Ok(())
    }

    fn step(&mut self) {
        finite_difference_step(
            &mut self.previous,
            &self.current,
            self.params.rows,
            self.params.cols,
            self.coefficients,
        );
        std::mem::swap(&mut self.previous, &mut self.current);
        self.steps += 1;
    }

    pub fn get(&self, index: usize) -> Option<&Vec3> {
        self.current.get(index)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.current
    }

    /// Height of the previous step, mainly for inspecting the integrator.
    pub fn previous_positions(&self) -> &[Vec3] {
        &self.previous
    }

    pub fn height(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.params.rows || col >= self.params.cols {
            return None;
        }
        Some(self.current[row * self.params.cols + col].y)
    }

    pub fn row_count(&self) -> usize {
        self.params.rows
    }

    pub fn column_count(&self) -> usize {
        self.params.cols
    }

    pub fn vertex_count(&self) -> usize {
        self.params.rows * self.params.cols
    }

    pub fn triangle_count(&self) -> usize {
        (self.params.rows - 1) * (self.params.cols - 1) * 2
    }

    pub fn width(&self) -> f32 {
        (self.params.cols - 1) as f32 * self.params.spacing
    }

    pub fn depth(&self) -> f32 {
        (self.params.rows - 1) as f32 * self.params.spacing
    }

    pub fn spacing(&self) -> f32 {
        self.params.spacing
    }

    pub fn time_step(&self) -> f32 {
        self.params.time_step
    }

    pub fn params(&self) -> &WaveParams {
        &self.params
    }

    pub fn coefficients(&self) -> StepCoefficients {
        self.coefficients
    }

    pub fn accumulated_time(&self) -> f32 {
        self.accumulator
    }

    /// Number of finite-difference steps since the last (re)initialization.
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn stats(&self) -> FieldStats {
        let mut min_height = f32::INFINITY;
        let mut max_height = f32::NEG_INFINITY;
        let mut abs_sum = 0.0f64;
        for p in &self.current {
            min_height = min_height.min(p.y);
            max_height = max_height.max(p.y);
            abs_sum += p.y.abs() as f64;
        }
        FieldStats {
            min_height,
            max_height,
            mean_abs_height: (abs_sum / self.current.len() as f64) as f32,
        }
    }
}

impl Index<usize> for Waves {
    type Output = Vec3;

    fn index(&self, index: usize) -> &Vec3 {
        &self.current[index]
    }
}

/// Writes the next heights of every interior point into `previous`.
///
/// Reads only the pre-step values of `previous` and `current`, so rows can
/// be processed in any order.
pub(crate) fn finite_difference_step(
    previous: &mut [Vec3],
    current: &[Vec3],
    rows: usize,
    cols: usize,
    k: StepCoefficients,
) {
    debug_assert_eq!(previous.len(), rows * cols);
    debug_assert_eq!(current.len(), rows * cols);
    if rows < 3 || cols < 3 {
        return;
    }

    let step_row = |i: usize, row: &mut [Vec3]| {
        let base = i * cols;
        for j in 1..cols - 1 {
            let idx = base + j;
            row[j].y = k.k1 * row[j].y
                + k.k2 * current[idx].y
                + k.k3
                    * (current[idx + cols].y
                        + current[idx - cols].y
                        + current[idx + 1].y
                        + current[idx - 1].y);
        }
    };

    let interior = &mut previous[cols..(rows - 1) * cols];
    if rows * cols >= PARALLEL_STEP_MIN_POINTS {
        interior
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(r, row)| step_row(r + 1, row));
    } else {
        interior
            .chunks_mut(cols)
            .enumerate()
            .for_each(|(r, row)| step_row(r + 1, row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn scenario_params() -> WaveParams {
        WaveParams::new(5, 5, 1.0, 0.03, 3.25, 0.4)
    }

    fn is_boundary(waves: &Waves, idx: usize) -> bool {
        let (i, j) = (idx / waves.column_count(), idx % waves.column_count());
        i == 0 || j == 0 || i == waves.row_count() - 1 || j == waves.column_count() - 1
    }

    #[test]
    fn test_coefficients() {
        let params = scenario_params();
        let k = StepCoefficients::from_params(&params);
        let d = 0.4 * 0.03 + 2.0;
        let e = 3.25f32 * 3.25 * 0.03 * 0.03 / 1.0;
        assert!((k.k1 - (0.4 * 0.03 - 2.0) / d).abs() < EPS);
        assert!((k.k2 - (4.0 - 8.0 * e) / d).abs() < EPS);
        assert!((k.k3 - 2.0 * e / d).abs() < EPS);
    }

    #[test]
    fn test_lattice_layout() {
        let waves = Waves::new(WaveParams::new(3, 4, 2.0, 0.03, 1.0, 0.0)).unwrap();
        // half width = 3, half depth = 2
        assert_eq!(waves[0], Vec3::new(-3.0, 0.0, 2.0));
        assert_eq!(waves[3], Vec3::new(3.0, 0.0, 2.0));
        assert_eq!(waves[4], Vec3::new(-3.0, 0.0, 0.0));
        assert_eq!(waves[11], Vec3::new(3.0, 0.0, -2.0));
        assert_eq!(waves.width(), 6.0);
        assert_eq!(waves.depth(), 4.0);
    }

    #[test]
    fn test_counts() {
        for (rows, cols) in [(2, 2), (5, 5), (3, 7), (200, 200)] {
            let waves = Waves::new(WaveParams::new(rows, cols, 1.0, 0.03, 1.0, 0.1)).unwrap();
            assert_eq!(waves.vertex_count(), rows * cols);
            assert_eq!(waves.positions().len(), rows * cols);
            assert_eq!(waves.triangle_count(), (rows - 1) * (cols - 1) * 2);
            assert_eq!(waves.row_count(), rows);
            assert_eq!(waves.column_count(), cols);
        }
    }

    #[test]
    fn test_initialize_rejects_bad_params() {
        let mut params = scenario_params();
        params.spacing = 0.0;
        assert!(matches!(
            Waves::new(params),
            Err(WaveError::InvalidParameter { name: "spacing", .. })
        ));

        let mut params = scenario_params();
        params.time_step = -0.03;
        assert!(matches!(
            Waves::new(params),
            Err(WaveError::InvalidParameter { name: "time_step", .. })
        ));
    }

    #[test]
    fn test_failed_reinitialize_keeps_state() {
        let mut waves = Waves::new(scenario_params()).unwrap();
        waves.disturb(2, 2, 1.0).unwrap();
        let before = waves.positions().to_vec();

        let mut bad = scenario_params();
        bad.rows = 1;
        assert!(waves.initialize(bad).is_err());
        assert_eq!(waves.positions(), &before[..]);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let params = scenario_params();
        let once = Waves::new(params).unwrap();

        let mut twice = Waves::new(params).unwrap();
        twice.disturb(2, 2, 1.0).unwrap();
        twice.update(0.03).unwrap();
        twice.initialize(params).unwrap();
        twice.initialize(params).unwrap();

        assert_eq!(once.positions(), twice.positions());
        assert_eq!(once.previous_positions(), twice.previous_positions());
        assert_eq!(twice.accumulated_time(), 0.0);
        assert_eq!(twice.step_count(), 0);
    }

    #[test]
    fn test_disturb_locality_and_magnitude() {
        let mut waves = Waves::new(WaveParams::new(9, 9, 1.0, 0.03, 3.25, 0.4)).unwrap();
        waves.disturb(4, 5, 2.0).unwrap();

        for i in 0..9 {
            for j in 0..9 {
                let expected = match (i, j) {
                    (4, 5) => 2.0,
                    (3, 5) | (5, 5) | (4, 4) | (4, 6) => 1.0,
                    _ => 0.0,
                };
                assert_eq!(waves.height(i, j), Some(expected), "at ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_disturb_out_of_range() {
        let mut waves = Waves::new(scenario_params()).unwrap();
        for (i, j) in [(1, 2), (2, 1), (3, 2), (2, 3), (0, 0), (4, 4), (100, 2)] {
            assert!(
                matches!(
                    waves.disturb(i, j, 1.0),
                    Err(WaveError::IndexOutOfRange { .. })
                ),
                "({i}, {j}) should be rejected"
            );
        }
        assert!(waves.positions().iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn test_scenario_single_step() {
        let params = scenario_params();
        let mut waves = Waves::new(params).unwrap();
        waves.disturb(2, 2, 1.0).unwrap();

        assert_eq!(waves.height(2, 2), Some(1.0));
        for (i, j) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert_eq!(waves.height(i, j), Some(0.5));
        }
        let nonzero = waves.positions().iter().filter(|p| p.y != 0.0).count();
        assert_eq!(nonzero, 5);

        let k = waves.coefficients();
        let before: Vec<f32> = waves.positions().iter().map(|p| p.y).collect();
        let prev_before: Vec<f32> = waves.previous_positions().iter().map(|p| p.y).collect();

        assert_eq!(waves.update(0.03).unwrap(), 1);

        let idx = 2 * 5 + 2;
        let expected = k.k1 * prev_before[idx]
            + k.k2 * before[idx]
            + k.k3 * (before[idx + 5] + before[idx - 5] + before[idx + 1] + before[idx - 1]);
        assert!((waves.height(2, 2).unwrap() - expected).abs() < EPS);

        for n in 0..5 {
            assert_eq!(waves.height(0, n), Some(0.0));
            assert_eq!(waves.height(4, n), Some(0.0));
            assert_eq!(waves.height(n, 0), Some(0.0));
            assert_eq!(waves.height(n, 4), Some(0.0));
        }
        // the pre-step field is now the previous layer
        let prev_after: Vec<f32> = waves.previous_positions().iter().map(|p| p.y).collect();
        assert_eq!(prev_after, before);
    }

    #[test]
    fn test_fixed_step_gating() {
        let mut waves = Waves::new(WaveParams::new(7, 7, 1.0, 0.25, 1.0, 0.2)).unwrap();
        waves.disturb(3, 3, 1.0).unwrap();
        let before = waves.positions().to_vec();

        assert_eq!(waves.update(0.125).unwrap(), 0);
        assert_eq!(waves.update(0.0625).unwrap(), 0);
        assert_eq!(waves.positions(), &before[..]);
        assert_eq!(waves.accumulated_time(), 0.1875);

        assert_eq!(waves.update(0.0625).unwrap(), 1);
        assert_ne!(waves.positions(), &before[..]);
        assert_eq!(waves.accumulated_time(), 0.0);
        assert_eq!(waves.step_count(), 1);
    }

    #[test]
    fn test_single_policy_never_catches_up() {
        let mut waves = Waves::new(WaveParams::new(7, 7, 1.0, 0.25, 1.0, 0.2)).unwrap();
        assert_eq!(waves.update(10.0).unwrap(), 1);
        assert_eq!(waves.accumulated_time(), 0.0);
        assert_eq!(waves.step_count(), 1);
    }

    #[test]
    fn test_catch_up_policy() {
        let mut waves = Waves::new(WaveParams::new(7, 7, 1.0, 0.25, 1.0, 0.2)).unwrap();
        waves.set_step_policy(StepPolicy::CatchUp { max_steps: 8 });

        assert_eq!(waves.update(0.875).unwrap(), 3);
        assert_eq!(waves.accumulated_time(), 0.125);

        // capped: remainder is dropped
        assert_eq!(waves.update(5.0).unwrap(), 8);
        assert_eq!(waves.accumulated_time(), 0.0);
        assert_eq!(waves.step_count(), 11);
    }

    #[test]
    fn test_update_rejects_bad_dt() {
        let mut waves = Waves::new(scenario_params()).unwrap();
        assert!(waves.update(-0.01).is_err());
        assert!(waves.update(f32::NAN).is_err());
        assert!(waves.update(f32::INFINITY).is_err());
        assert_eq!(waves.accumulated_time(), 0.0);
        assert_eq!(waves.update(0.0).unwrap(), 0);
    }

    #[test]
    fn test_boundary_stays_flat() {
        let mut waves = Waves::new(WaveParams::new(12, 10, 0.8, 0.03, 3.25, 0.4)).unwrap();
        waves.disturb(2, 2, 1.5).unwrap();
        waves.disturb(9, 7, -2.0).unwrap();
        waves.disturb(5, 5, 1.0).unwrap();

        for frame in 0..200 {
            waves.update(0.016).unwrap();
            if frame % 37 == 0 {
                waves.disturb(2 + frame % 8, 2 + frame % 6, 1.0).unwrap();
            }
            for (idx, p) in waves.positions().iter().enumerate() {
                if is_boundary(&waves, idx) {
                    assert_eq!(p.y, 0.0, "boundary point {idx} moved");
                }
            }
        }
        assert!(waves.step_count() > 0);
    }

    #[test]
    fn test_horizontal_coordinates_never_change() {
        let mut waves = Waves::new(WaveParams::new(8, 8, 1.0, 0.03, 3.25, 0.4)).unwrap();
        let lattice: Vec<(f32, f32)> = waves.positions().iter().map(|p| (p.x, p.z)).collect();
        waves.disturb(4, 4, 1.0).unwrap();
        for _ in 0..10 {
            waves.update(0.03).unwrap();
        }
        let after: Vec<(f32, f32)> = waves.positions().iter().map(|p| (p.x, p.z)).collect();
        assert_eq!(lattice, after);
    }

    #[test]
    fn test_step_is_linear() {
        let rows = 6;
        let cols = 7;
        let k = StepCoefficients::from_params(&WaveParams::new(rows, cols, 1.0, 0.03, 3.25, 0.4));

        let field = |seed: f32| -> Vec<Vec3> {
            (0..rows * cols)
                .map(|n| Vec3::new(0.0, ((n as f32 + seed) * 0.37).sin(), 0.0))
                .collect()
        };
        let combine = |a: &[Vec3], b: &[Vec3], wa: f32, wb: f32| -> Vec<Vec3> {
            a.iter()
                .zip(b)
                .map(|(x, y)| Vec3::new(0.0, wa * x.y + wb * y.y, 0.0))
                .collect()
        };

        let (prev_a, curr_a) = (field(1.0), field(2.0));
        let (prev_b, curr_b) = (field(3.0), field(4.0));
        let (wa, wb) = (0.75, -1.5);

        let mut step_a = prev_a.clone();
        finite_difference_step(&mut step_a, &curr_a, rows, cols, k);
        let mut step_b = prev_b.clone();
        finite_difference_step(&mut step_b, &curr_b, rows, cols, k);

        let mut step_ab = combine(&prev_a, &prev_b, wa, wb);
        finite_difference_step(&mut step_ab, &combine(&curr_a, &curr_b, wa, wb), rows, cols, k);

        let expected = combine(&step_a, &step_b, wa, wb);
        for (got, want) in step_ab.iter().zip(&expected) {
            assert!((got.y - want.y).abs() < 1e-5, "{} != {}", got.y, want.y);
        }
    }

    #[test]
    fn test_parallel_step_matches_sequential() {
        // large enough to take the rayon path
        let rows = 80;
        let cols = 90;
        let k = StepCoefficients::from_params(&WaveParams::new(rows, cols, 0.8, 0.03, 3.25, 0.4));
        let curr: Vec<Vec3> = (0..rows * cols)
            .map(|n| Vec3::new(0.0, (n as f32 * 0.13).cos(), 0.0))
            .collect();
        let prev: Vec<Vec3> = (0..rows * cols)
            .map(|n| Vec3::new(0.0, (n as f32 * 0.07).sin(), 0.0))
            .collect();

        let mut parallel = prev.clone();
        finite_difference_step(&mut parallel, &curr, rows, cols, k);

        let mut sequential = prev.clone();
        for i in 1..rows - 1 {
            for j in 1..cols - 1 {
                let idx = i * cols + j;
                sequential[idx].y = k.k1 * prev[idx].y
                    + k.k2 * curr[idx].y
                    + k.k3
                        * (curr[idx + cols].y
                            + curr[idx - cols].y
                            + curr[idx + 1].y
                            + curr[idx - 1].y);
            }
        }
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_damping_dissipates_energy() {
        let mut waves = Waves::new(WaveParams::new(40, 40, 0.8, 0.03, 3.25, 2.0)).unwrap();
        waves.disturb(20, 20, 2.0).unwrap();
        for _ in 0..20 {
            waves.update(0.03).unwrap();
        }
        let early = waves.stats().mean_abs_height;
        for _ in 0..400 {
            waves.update(0.03).unwrap();
        }
        let late = waves.stats().mean_abs_height;
        assert!(late < early, "{late} should be below {early}");
    }

    #[test]
    fn test_reset_flattens_field() {
        let mut waves = Waves::new(scenario_params()).unwrap();
        waves.disturb(2, 2, 1.0).unwrap();
        waves.update(0.03).unwrap();
        waves.reset();
        assert!(waves.positions().iter().all(|p| p.y == 0.0));
        assert!(waves.previous_positions().iter().all(|p| p.y == 0.0));
        assert_eq!(waves.step_count(), 0);
        assert_eq!(waves[0], Vec3::new(-2.0, 0.0, 2.0));
    }

    #[test]
    fn test_stats() {
        let mut waves = Waves::new(scenario_params()).unwrap();
        assert_eq!(waves.stats(), FieldStats::default());
        waves.disturb(2, 2, -2.0).unwrap();
        let stats = waves.stats();
        assert_eq!(stats.min_height, -2.0);
        assert_eq!(stats.max_height, 0.0);
        assert!((stats.mean_abs_height - 6.0 / 25.0).abs() < EPS);
    }

    #[test]
    fn test_accessors() {
        let waves = Waves::new(scenario_params()).unwrap();
        assert!(waves.get(24).is_some());
        assert!(waves.get(25).is_none());
        assert_eq!(waves.height(5, 0), None);
        assert_eq!(waves.spacing(), 1.0);
        assert_eq!(waves.time_step(), 0.03);
        assert_eq!(waves.params(), &scenario_params());
    }
}
