//! Descriptor distance kernels.
//!
//! A kernel supplies the dot product between two descriptors; the unit-norm
//! distance and the full difference matrix are derived from it.

use crate::descriptor::DescriptorView;
use crate::matrix::{check_compatible, DifferenceMatrix};
use crate::util::math::unit_distance_from_dot;
use crate::util::SeqMatchResult;

/// Kernel trait for descriptor comparisons.
pub trait Kernel {
    /// Dot product of two descriptors of equal length.
    fn dot(a: &[f32], b: &[f32]) -> f32;

    /// Euclidean distance between two unit-norm descriptors.
    #[inline]
    fn distance(a: &[f32], b: &[f32]) -> f32 {
        unit_distance_from_dot(Self::dot(a, b))
    }

    /// Fills one matrix row: distances from `reference_row` to every query.
    fn fill_row(reference_row: &[f32], query: DescriptorView<'_>, out: &mut [f32]) {
        for (cell, q) in out.iter_mut().zip(query.rows()) {
            *cell = Self::distance(reference_row, q);
        }
    }

    /// Builds the full `N x L` difference matrix.
    fn difference_matrix(
        reference: DescriptorView<'_>,
        query: DescriptorView<'_>,
    ) -> SeqMatchResult<DifferenceMatrix> {
        check_compatible(reference, query)?;
        let cols = query.len();
        let mut data = vec![0.0f32; reference.len() * cols];
        for (out, r) in data.chunks_exact_mut(cols).zip(reference.rows()) {
            Self::fill_row(r, query, out);
        }
        DifferenceMatrix::new(reference.len(), cols, data)
    }
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;
