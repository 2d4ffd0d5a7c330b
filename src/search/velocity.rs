//! Constant-velocity path scoring over the difference matrix.
//!
//! For a candidate start index `i` and velocity `v`, the path visits reference
//! row `floor(i + v * t)` at query column `t`. A candidate's template score is
//! the lowest path cost over the velocity grid.

use crate::config::{max_index, SeqMatchConfig};
use crate::matrix::DifferenceMatrix;
use crate::trace::stage_span;
use crate::util::{SeqMatchError, SeqMatchResult};

/// Velocity range searched by the scorer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityRange {
    /// Smallest velocity (inclusive).
    pub v_min: f64,
    /// Largest velocity (inclusive).
    pub v_max: f64,
    /// Number of steps; `steps + 1` velocities are tested.
    pub steps: usize,
}

impl VelocityRange {
    /// Evenly spaced velocities from `v_min` to `v_max`, both inclusive.
    pub fn grid(&self) -> Vec<f64> {
        let v_min = self.v_min;
        let v_max = self.v_max;
        if self.steps == 0 {
            return vec![v_min];
        }
        let step = (v_max - v_min) / self.steps as f64;
        let mut grid: Vec<f64> = (0..=self.steps).map(|k| v_min + k as f64 * step).collect();
        if let Some(last) = grid.last_mut() {
            *last = v_max;
        }
        grid
    }
}

impl From<&SeqMatchConfig> for VelocityRange {
    fn from(cfg: &SeqMatchConfig) -> Self {
        Self {
            v_min: cfg.v_min,
            v_max: cfg.v_max,
            steps: cfg.num_velocities,
        }
    }
}

/// Cost of the path starting at reference row `start` with velocity `v`.
///
/// Every visited row is bounds-checked against the matrix.
pub fn path_cost(d: &DifferenceMatrix, start: usize, v: f64) -> SeqMatchResult<f32> {
    let mut cost = 0.0f32;
    for t in 0..d.cols() {
        let row = (start as f64 + v * t as f64).floor() as usize;
        cost += d.get(row, t).ok_or(SeqMatchError::IndexOutOfBounds {
            index: row,
            len: d.rows(),
            context: "path row",
        })?;
    }
    Ok(cost)
}

fn candidate_score(d: &DifferenceMatrix, start: usize, velocities: &[f64]) -> SeqMatchResult<f32> {
    let mut best = f32::INFINITY;
    for &v in velocities {
        let cost = path_cost(d, start, v)?;
        // NaN costs never replace the running best.
        if cost < best {
            best = cost;
        }
    }
    Ok(best)
}

fn candidate_count(d: &DifferenceMatrix, range: &VelocityRange) -> SeqMatchResult<usize> {
    let m = max_index(d.rows(), d.cols(), range.v_max);
    if m < 1 {
        return Err(SeqMatchError::InvalidConfiguration {
            reason: "v_max * seq_len leaves no candidate start index",
        });
    }
    Ok(m as usize)
}

/// Template score per candidate start index in `[0, max_index)`.
pub fn score_templates(d: &DifferenceMatrix, range: &VelocityRange) -> SeqMatchResult<Vec<f32>> {
    let m = candidate_count(d, range)?;
    let _span = stage_span!(
        DEBUG,
        "score_templates",
        candidates = m,
        steps = range.steps
    )
    .entered();

    let velocities = range.grid();
    (0..m)
        .map(|start| candidate_score(d, start, &velocities))
        .collect()
}

/// Candidate-parallel variant of [`score_templates`].
#[cfg(feature = "rayon")]
pub fn score_templates_par(
    d: &DifferenceMatrix,
    range: &VelocityRange,
) -> SeqMatchResult<Vec<f32>> {
    use rayon::prelude::*;

    let m = candidate_count(d, range)?;
    let _span = stage_span!(
        DEBUG,
        "score_templates",
        candidates = m,
        steps = range.steps,
        parallel = true
    )
    .entered();

    let velocities = range.grid();
    (0..m)
        .into_par_iter()
        .map(|start| candidate_score(d, start, &velocities))
        .collect()
}
