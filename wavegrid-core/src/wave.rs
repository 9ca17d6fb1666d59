//! Per-frame grid displacement updater
//!
//! Every frame, each cell `(i, j)` of the grid is lifted to
//!
//! ```text
//! distance = |(j, i) - (cols / 2, rows / 2)|
//! offset   = linear_map(distance, domain, offset_range)
//! y        = linear_map(sin(phase + offset), [-1, 1], [noise(i * sx, j * sy), crest])
//! ```
//!
//! after which the phase accumulator drops by `phase_step`. The state is an
//! explicit value threaded through [`step`]; nothing here is global.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::math::{distance, linear_map};
use crate::traits::{NoiseField, VerticalOffset};

/// Constants of the displacement function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    /// Amount subtracted from the phase after each step
    pub phase_step: f64,
    /// Source interval for the distance-to-offset map
    pub distance_domain: [f64; 2],
    /// Target interval for the distance-to-offset map
    pub offset_range: [f64; 2],
    /// Noise coordinate scale for the `i` and `j` indices
    pub noise_scale: [f64; 2],
    /// Height reached at the top of the sine
    pub crest: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            phase_step: 0.06,
            distance_domain: [0.0, 400.0],
            offset_range: [-100.0, 100.0],
            noise_scale: [0.08, 0.1],
            crest: 1.0,
        }
    }
}

/// The phase accumulator.
///
/// It decreases without bound; `sin` is periodic so the output never drifts,
/// but absolute precision of the phase degrades over very long runs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveState {
    pub phase: f64,
}

impl WaveState {
    pub fn new(phase: f64) -> Self {
        Self { phase }
    }

    /// State after one step
    pub fn advanced(self, params: &WaveParams) -> Self {
        Self {
            phase: self.phase - params.phase_step,
        }
    }
}

/// Radial distance of cell `(i, j)` from the centre of a `rows × cols` grid
#[inline]
pub fn cell_distance(i: usize, j: usize, rows: usize, cols: usize) -> f64 {
    distance(j as f64, i as f64, cols as f64 * 0.5, rows as f64 * 0.5)
}

/// Phase offset of cell `(i, j)`
#[inline]
pub fn cell_offset(params: &WaveParams, i: usize, j: usize, rows: usize, cols: usize) -> f64 {
    let [d0, d1] = params.distance_domain;
    let [o0, o1] = params.offset_range;
    linear_map(cell_distance(i, j, rows, cols), d0, d1, o0, o1)
}

/// Noise floor of cell `(i, j)`
#[inline]
pub fn cell_floor<N>(params: &WaveParams, i: usize, j: usize, noise: &N) -> f64
where
    N: NoiseField + ?Sized,
{
    let [sx, sy] = params.noise_scale;
    noise.sample(i as f64 * sx, j as f64 * sy)
}

/// Height of cell `(i, j)` at `phase`. Pure in all of its inputs.
pub fn cell_height<N>(
    params: &WaveParams,
    phase: f64,
    i: usize,
    j: usize,
    rows: usize,
    cols: usize,
    noise: &N,
) -> f64
where
    N: NoiseField + ?Sized,
{
    let angle = phase + cell_offset(params, i, j, rows, cols);
    let floor = cell_floor(params, i, j, noise);
    linear_map(angle.sin(), -1.0, 1.0, floor, params.crest)
}

/// Update the vertical offset of every element in `grid` and return the
/// next state.
pub fn step<T, N>(state: WaveState, grid: &mut Grid<T>, params: &WaveParams, noise: &N) -> WaveState
where
    T: VerticalOffset,
    N: NoiseField + ?Sized,
{
    let (rows, cols) = (grid.rows(), grid.cols());
    for ((i, j), cell) in grid.indexed_iter_mut() {
        cell.set_vertical_offset(cell_height(params, state.phase, i, j, rows, cols, noise));
    }
    let next = state.advanced(params);
    tracing::trace!(phase = next.phase, cells = rows * cols, "wave step");
    next
}

/// Summary of a height grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl HeightStats {
    /// `None` for an empty grid
    pub fn from_grid<T: VerticalOffset>(grid: &Grid<T>) -> Option<Self> {
        if grid.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for cell in grid.iter() {
            let y = cell.vertical_offset();
            min = min.min(y);
            max = max.max(y);
            sum += y;
        }
        Some(Self {
            min,
            max,
            mean: sum / grid.len() as f64,
        })
    }
}

/// A self-contained run of the updater over a plain height grid
#[derive(Debug, Clone)]
pub struct WaveSimulation<N> {
    params: WaveParams,
    state: WaveState,
    heights: Grid<f64>,
    noise: N,
}

impl<N: NoiseField> WaveSimulation<N> {
    pub fn new(rows: usize, cols: usize, params: WaveParams, noise: N) -> Self {
        Self {
            params,
            state: WaveState::default(),
            heights: Grid::new(rows, cols, 0.0),
            noise,
        }
    }

    /// Run one step
    pub fn step(&mut self) -> WaveState {
        self.state = step(self.state, &mut self.heights, &self.params, &self.noise);
        self.state
    }

    /// Run `frames` steps
    pub fn run(&mut self, frames: usize) -> WaveState {
        for _ in 0..frames {
            self.step();
        }
        self.state
    }

    /// Zero the phase and heights
    pub fn reset(&mut self) {
        self.state = WaveState::default();
        self.heights.iter_mut().for_each(|h| *h = 0.0);
    }

    pub fn heights(&self) -> &Grid<f64> {
        &self.heights
    }

    pub fn state(&self) -> WaveState {
        self.state
    }

    pub fn params(&self) -> &WaveParams {
        &self.params
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    pub fn stats(&self) -> Option<HeightStats> {
        HeightStats::from_grid(&self.heights)
    }
}
