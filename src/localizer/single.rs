//! Single-image nearest-neighbour baseline.

use crate::descriptor::DescriptorView;
use crate::localizer::{Localization, Localizer};
use crate::matrix::check_compatible;
use crate::reference::ReferenceMap;
use crate::util::math::argmin;
use crate::util::{SeqMatchError, SeqMatchResult};
use std::sync::Arc;

#[cfg(not(feature = "simd"))]
use crate::kernel::scalar::DotScalar as DotKernel;
#[cfg(feature = "simd")]
use crate::kernel::simd::DotSimd as DotKernel;
use crate::kernel::Kernel;

/// Matches only the most recent query descriptor against every reference
/// descriptor and proposes the nearest one.
pub struct SingleImageMatcher<P> {
    reference: Arc<ReferenceMap<P>>,
}

impl<P> SingleImageMatcher<P> {
    /// Creates a matcher over a shared reference map.
    pub fn new(reference: Arc<ReferenceMap<P>>) -> Self {
        Self { reference }
    }

    /// Distance from `descriptor` to every reference descriptor.
    pub fn distances(&self, descriptor: &[f32]) -> SeqMatchResult<Vec<f32>> {
        if descriptor.len() != self.reference.dim() {
            return Err(SeqMatchError::DimensionMismatch {
                expected: self.reference.dim(),
                got: descriptor.len(),
            });
        }
        Ok(self
            .reference
            .descriptors()
            .rows()
            .map(|r| DotKernel::distance(r, descriptor))
            .collect())
    }

    /// Proposes the reference nearest to a single descriptor; the score is
    /// the raw distance.
    pub fn localize_descriptor(&self, descriptor: &[f32]) -> SeqMatchResult<Localization<P>>
    where
        P: Clone,
    {
        let dists = self.distances(descriptor)?;
        let index = argmin(&dists).ok_or(SeqMatchError::InvalidInput("empty reference map"))?;
        Ok(Localization {
            index,
            pose: self.reference.pose(index)?.clone(),
            score: dists[index],
        })
    }
}

impl<P: Clone> Localizer<P> for SingleImageMatcher<P> {
    fn localize(&self, query: DescriptorView<'_>) -> SeqMatchResult<Localization<P>> {
        check_compatible(self.reference.descriptors(), query)?;
        let current = query
            .row(0)
            .ok_or(SeqMatchError::InvalidInput("empty query window"))?;
        self.localize_descriptor(current)
    }

    fn name(&self) -> &'static str {
        "Single"
    }
}
