//! Rayon-parallel difference matrix (feature-gated).
//!
//! Reference rows are independent, so the matrix is filled row-parallel.
//! Each row is computed with the same kernel as the sequential path and the
//! results are bitwise identical.

use crate::descriptor::DescriptorView;
use crate::kernel::Kernel;
use crate::matrix::{check_compatible, DifferenceMatrix};
use crate::util::SeqMatchResult;
use rayon::prelude::*;

/// Row-parallel difference matrix for any kernel.
pub fn difference_matrix_par<K: Kernel>(
    reference: DescriptorView<'_>,
    query: DescriptorView<'_>,
) -> SeqMatchResult<DifferenceMatrix> {
    check_compatible(reference, query)?;
    let cols = query.len();
    let ref_data = reference.as_slice();
    let dim = reference.dim();
    let mut data = vec![0.0f32; reference.len() * cols];

    data.par_chunks_mut(cols)
        .zip(ref_data.par_chunks(dim))
        .for_each(|(out, r)| K::fill_row(r, query, out));

    DifferenceMatrix::new(reference.len(), cols, data)
}
