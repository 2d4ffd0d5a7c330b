//! Descriptor arrays.
//!
//! `DescriptorView` is a borrowed row-major `len x dim` array of `f32`
//! embeddings; `Descriptors` is its owned counterpart. Rows are expected to be
//! unit-norm, which the distance kernels rely on but do not check.

use crate::util::{SeqMatchError, SeqMatchResult};
use std::ops::Range;

/// Borrowed row-major descriptor array.
#[derive(Copy, Clone, Debug)]
pub struct DescriptorView<'a> {
    data: &'a [f32],
    len: usize,
    dim: usize,
}

impl<'a> DescriptorView<'a> {
    /// Creates a view over `len` descriptors of dimension `dim`.
    ///
    /// Trailing elements beyond `len * dim` are ignored.
    pub fn from_slice(data: &'a [f32], len: usize, dim: usize) -> SeqMatchResult<Self> {
        let needed = required_len(len, dim)?;
        if data.len() < needed {
            return Err(SeqMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data: &data[..needed],
            len,
            dim,
        })
    }

    /// Returns the number of descriptors.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; zero-length views cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the descriptor dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the backing slice (`len * dim` elements).
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns descriptor `idx`, if in range.
    pub fn row(&self, idx: usize) -> Option<&'a [f32]> {
        if idx >= self.len {
            return None;
        }
        let start = idx * self.dim;
        self.data.get(start..start + self.dim)
    }

    /// Iterates over all descriptors in order.
    pub fn rows(&self) -> std::slice::ChunksExact<'a, f32> {
        self.data.chunks_exact(self.dim)
    }

    /// Returns a zero-copy view over a contiguous range of descriptors.
    pub fn slice(&self, range: Range<usize>) -> SeqMatchResult<DescriptorView<'a>> {
        if range.start >= range.end {
            return Err(SeqMatchError::InvalidDimensions {
                len: range.end.saturating_sub(range.start),
                dim: self.dim,
            });
        }
        if range.end > self.len {
            return Err(SeqMatchError::IndexOutOfBounds {
                index: range.end - 1,
                len: self.len,
                context: "descriptor",
            });
        }
        let data = &self.data[range.start * self.dim..range.end * self.dim];
        Ok(DescriptorView {
            data,
            len: range.len(),
            dim: self.dim,
        })
    }

    /// Returns a view over at most the first `max_len` descriptors.
    pub fn truncated(&self, max_len: usize) -> SeqMatchResult<DescriptorView<'a>> {
        self.slice(0..self.len.min(max_len))
    }

    /// Copies the view into an owned array.
    pub fn to_descriptors(&self) -> Descriptors {
        Descriptors {
            data: self.data.to_vec(),
            len: self.len,
            dim: self.dim,
        }
    }
}

/// Owned row-major descriptor array.
#[derive(Clone, Debug, PartialEq)]
pub struct Descriptors {
    data: Vec<f32>,
    len: usize,
    dim: usize,
}

impl Descriptors {
    /// Wraps a buffer of exactly `len * dim` values.
    pub fn new(data: Vec<f32>, len: usize, dim: usize) -> SeqMatchResult<Self> {
        let needed = required_len(len, dim)?;
        if data.len() != needed {
            return Err(SeqMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self { data, len, dim })
    }

    /// Builds an array from per-descriptor rows, which must share one length.
    pub fn from_rows<R>(rows: &[R]) -> SeqMatchResult<Self>
    where
        R: AsRef<[f32]>,
    {
        let dim = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        required_len(rows.len(), dim)?;
        let mut data = Vec::with_capacity(rows.len() * dim);
        for row in rows {
            let row = row.as_ref();
            if row.len() != dim {
                return Err(SeqMatchError::DimensionMismatch {
                    expected: dim,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            len: rows.len(),
            dim,
        })
    }

    /// Returns a borrowed view.
    pub fn view(&self) -> DescriptorView<'_> {
        DescriptorView {
            data: &self.data,
            len: self.len,
            dim: self.dim,
        }
    }

    /// Returns the number of descriptors.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; zero-length arrays cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the descriptor dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns descriptor `idx`, if in range.
    pub fn row(&self, idx: usize) -> Option<&[f32]> {
        self.view().row(idx)
    }

    /// Returns the backing buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Scales every row to unit L2 norm. All-zero rows are left untouched.
    pub fn l2_normalize_rows(&mut self) {
        for row in self.data.chunks_exact_mut(self.dim) {
            let norm = row.iter().map(|v| (*v as f64) * (*v as f64)).sum::<f64>().sqrt();
            if norm > 0.0 {
                let inv = (1.0 / norm) as f32;
                for v in row.iter_mut() {
                    *v *= inv;
                }
            }
        }
    }
}

fn required_len(len: usize, dim: usize) -> SeqMatchResult<usize> {
    if len == 0 || dim == 0 {
        return Err(SeqMatchError::InvalidDimensions { len, dim });
    }
    len.checked_mul(dim)
        .ok_or(SeqMatchError::InvalidDimensions { len, dim })
}
