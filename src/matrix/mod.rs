//! Reference-by-query difference matrix.
//!
//! `D[i, j]` is the distance between reference descriptor `i` and query
//! descriptor `j`. The matrix is row-major with one row per reference place
//! and one column per query time step, and is rebuilt for every query.

use crate::descriptor::DescriptorView;
use crate::kernel::Kernel;
use crate::trace::stage_span;
use crate::util::{SeqMatchError, SeqMatchResult};

#[cfg(not(feature = "simd"))]
use crate::kernel::scalar::DotScalar as DotKernel;
#[cfg(feature = "simd")]
use crate::kernel::simd::DotSimd as DotKernel;

/// Dense `rows x cols` matrix of descriptor distances.
#[derive(Clone, Debug, PartialEq)]
pub struct DifferenceMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl DifferenceMatrix {
    /// Wraps a row-major buffer of exactly `rows * cols` values.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> SeqMatchResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(SeqMatchError::InvalidDimensions {
                len: rows,
                dim: cols,
            });
        }
        let needed = rows
            .checked_mul(cols)
            .ok_or(SeqMatchError::InvalidDimensions {
                len: rows,
                dim: cols,
            })?;
        if data.len() != needed {
            return Err(SeqMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> SeqMatchResult<Self>
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(rows.saturating_mul(cols));
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self::new(rows, cols, data)
    }

    /// Number of reference rows (`N`).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of query columns (`L`).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the value at `(row, col)` if in range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Returns one reference row.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.data.get(start..start + self.cols)
    }

    /// Iterates over column `col` restricted to rows `rows`.
    pub(crate) fn column_range(
        &self,
        col: usize,
        rows: std::ops::Range<usize>,
    ) -> impl Iterator<Item = f32> + Clone + '_ {
        let end = rows.end.min(self.rows);
        let start = rows.start.min(end);
        (start..end).map(move |r| self.data[r * self.cols + col])
    }

    /// Returns the row-major backing buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// True if any entry is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.data.iter().any(|v| !v.is_finite())
    }
}

pub(crate) fn check_compatible(
    reference: DescriptorView<'_>,
    query: DescriptorView<'_>,
) -> SeqMatchResult<()> {
    if reference.dim() != query.dim() {
        return Err(SeqMatchError::DimensionMismatch {
            expected: reference.dim(),
            got: query.dim(),
        });
    }
    Ok(())
}

/// Computes the `N x L` distance matrix between unit-norm descriptors.
///
/// `D[i, j] = sqrt(max(0, 2 - 2 <ref_i, query_j>))`.
pub fn difference_matrix(
    reference: DescriptorView<'_>,
    query: DescriptorView<'_>,
) -> SeqMatchResult<DifferenceMatrix> {
    let _span = stage_span!(
        DEBUG,
        "difference_matrix",
        refs = reference.len(),
        queries = query.len()
    )
    .entered();
    <DotKernel as Kernel>::difference_matrix(reference, query)
}

/// Row-parallel variant of [`difference_matrix`].
#[cfg(feature = "rayon")]
pub fn difference_matrix_par(
    reference: DescriptorView<'_>,
    query: DescriptorView<'_>,
) -> SeqMatchResult<DifferenceMatrix> {
    let _span = stage_span!(
        DEBUG,
        "difference_matrix",
        refs = reference.len(),
        queries = query.len(),
        parallel = true
    )
    .entered();
    crate::kernel::rayon::difference_matrix_par::<DotKernel>(reference, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_shape() {
        assert!(DifferenceMatrix::new(2, 2, vec![0.0; 3]).is_err());
        assert!(DifferenceMatrix::new(0, 2, Vec::new()).is_err());
        let d = DifferenceMatrix::new(2, 3, vec![0.0; 6]).unwrap();
        assert_eq!(d.shape(), (2, 3));
        assert!(d.get(2, 0).is_none());
        assert!(d.get(1, 3).is_none());
    }

    #[test]
    fn column_range_clips_to_rows() {
        let d = DifferenceMatrix::from_fn(4, 2, |i, j| (i * 10 + j) as f32).unwrap();
        let col: Vec<f32> = d.column_range(1, 2..9).collect();
        assert_eq!(col, vec![21.0, 31.0]);
        assert_eq!(d.column_range(0, 3..3).count(), 0);
    }

    #[test]
    fn identical_and_antipodal_descriptors() {
        let reference = [0.6f32, 0.8, -0.6, -0.8];
        let query = [0.6f32, 0.8];
        let r = DescriptorView::from_slice(&reference, 2, 2).unwrap();
        let q = DescriptorView::from_slice(&query, 1, 2).unwrap();
        let d = difference_matrix(r, q).unwrap();
        assert_eq!(d.shape(), (2, 1));
        assert!(d.get(0, 0).unwrap() < 1e-3);
        assert!((d.get(1, 0).unwrap() - 2.0).abs() < 1e-5);
        assert!(!d.has_non_finite());
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let r = DescriptorView::from_slice(&[1.0, 0.0], 1, 2).unwrap();
        let q = DescriptorView::from_slice(&[1.0, 0.0, 0.0], 1, 3).unwrap();
        assert_eq!(
            difference_matrix(r, q).unwrap_err(),
            SeqMatchError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        );
    }
}
