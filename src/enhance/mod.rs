//! Local contrast enhancement of the difference matrix.
//!
//! Each reference row is normalized against a window of neighbouring rows,
//! per query column: `(D[i, j] - mean) / std` with population statistics.
//! Zero-variance windows are not masked; they produce NaN or infinite
//! entries which propagate through scoring.

use crate::matrix::DifferenceMatrix;
use crate::trace::stage_span;
use crate::util::math::mean_std;
use crate::util::{SeqMatchError, SeqMatchResult};
use std::ops::Range;

/// Half-open reference window used to normalize row `row`.
///
/// The upper bound is capped at `num_refs - 1`, so the last reference row
/// never contributes to any window. Known quirk, kept for compatibility with
/// published results; an empty range yields NaN statistics.
pub fn contrast_window_bounds(row: usize, num_refs: usize, window: usize) -> Range<usize> {
    let half = window / 2;
    let lo = row.saturating_sub(half);
    let hi = (row + half + 1).min(num_refs.saturating_sub(1));
    lo..hi.max(lo)
}

/// Returns the contrast-enhanced copy of `d`.
pub fn enhance_contrast(d: &DifferenceMatrix, window: usize) -> SeqMatchResult<DifferenceMatrix> {
    check_window(window)?;
    let _span = stage_span!(
        DEBUG,
        "enhance_contrast",
        refs = d.rows(),
        window = window
    )
    .entered();

    let mut out = d.clone();
    let cols = d.cols();
    for (i, row) in out.as_mut_slice().chunks_exact_mut(cols).enumerate() {
        enhance_row(d, i, window, row);
    }
    Ok(out)
}

/// Row-parallel variant of [`enhance_contrast`].
#[cfg(feature = "rayon")]
pub fn enhance_contrast_par(
    d: &DifferenceMatrix,
    window: usize,
) -> SeqMatchResult<DifferenceMatrix> {
    use rayon::prelude::*;

    check_window(window)?;
    let _span = stage_span!(
        DEBUG,
        "enhance_contrast",
        refs = d.rows(),
        window = window,
        parallel = true
    )
    .entered();

    let mut out = d.clone();
    let cols = d.cols();
    out.as_mut_slice()
        .par_chunks_mut(cols)
        .enumerate()
        .for_each(|(i, row)| enhance_row(d, i, window, row));
    Ok(out)
}

fn check_window(window: usize) -> SeqMatchResult<()> {
    if window == 0 {
        return Err(SeqMatchError::InvalidConfiguration {
            reason: "contrast_window must be positive",
        });
    }
    Ok(())
}

fn enhance_row(d: &DifferenceMatrix, i: usize, window: usize, out: &mut [f32]) {
    let bounds = contrast_window_bounds(i, d.rows(), window);
    for (j, cell) in out.iter_mut().enumerate() {
        let (mean, std) = mean_std(d.column_range(j, bounds.clone()));
        *cell = ((*cell as f64 - mean) / std) as f32;
    }
}
