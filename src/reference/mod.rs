//! Reference traverse: poses paired 1:1 with descriptors.
//!
//! A `ReferenceMap` is built once and shared read-only between matchers,
//! typically behind an `Arc` so that several matchers (one per descriptor
//! type or per query traverse) can run concurrently without synchronization.

use crate::descriptor::{DescriptorView, Descriptors};
use crate::util::{SeqMatchError, SeqMatchResult};

/// Ordered reference poses and their descriptors.
#[derive(Clone, Debug)]
pub struct ReferenceMap<P> {
    poses: Vec<P>,
    descriptors: Descriptors,
}

impl<P> ReferenceMap<P> {
    /// Pairs poses with descriptors; both must have the same length.
    pub fn new(poses: Vec<P>, descriptors: Descriptors) -> SeqMatchResult<Self> {
        if poses.len() != descriptors.len() {
            return Err(SeqMatchError::LengthMismatch {
                poses: poses.len(),
                descriptors: descriptors.len(),
            });
        }
        Ok(Self { poses, descriptors })
    }

    /// Returns the number of reference places (`N`).
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Always false; an empty map cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Returns the descriptor dimension.
    pub fn dim(&self) -> usize {
        self.descriptors.dim()
    }

    /// Returns the pose at reference index `idx`.
    pub fn pose(&self, idx: usize) -> SeqMatchResult<&P> {
        self.poses.get(idx).ok_or(SeqMatchError::IndexOutOfBounds {
            index: idx,
            len: self.poses.len(),
            context: "reference pose",
        })
    }

    /// Returns all poses in reference order.
    pub fn poses(&self) -> &[P] {
        &self.poses
    }

    /// Returns a view of the reference descriptors.
    pub fn descriptors(&self) -> DescriptorView<'_> {
        self.descriptors.view()
    }
}
