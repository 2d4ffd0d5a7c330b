//! Localizer capability and its implementations.
//!
//! Both the sequence matcher and the single-image baseline answer the same
//! question: given the current query window, which reference pose are we at
//! and how good is the match. Callers pick one through [`LocalizerKind`].

mod sequence;
mod single;

pub use sequence::SeqMatcher;
pub use single::SingleImageMatcher;

use crate::config::SeqMatchConfig;
use crate::descriptor::DescriptorView;
use crate::reference::ReferenceMap;
use crate::util::SeqMatchResult;
use std::sync::Arc;

/// Outcome of one localization.
#[derive(Clone, Debug, PartialEq)]
pub struct Localization<P> {
    /// Reference index of the proposal.
    pub index: usize,
    /// Reference pose at `index`.
    pub pose: P,
    /// Confidence (sequence matcher) or raw distance (single image).
    pub score: f32,
}

/// Estimates the current reference pose from a query window.
///
/// Query windows are ordered most recent first: row 0 is the current
/// observation.
pub trait Localizer<P> {
    /// Localizes the query window against the reference map.
    fn localize(&self, query: DescriptorView<'_>) -> SeqMatchResult<Localization<P>>;

    /// Short model name used in reports.
    fn name(&self) -> &'static str;
}

/// Selects a localizer implementation.
#[derive(Clone, Debug, PartialEq)]
pub enum LocalizerKind {
    /// Sequence matching with the given configuration.
    Sequence(SeqMatchConfig),
    /// Nearest neighbour on the most recent descriptor.
    SingleImage,
}

/// A localizer chosen at runtime.
pub enum AnyLocalizer<P> {
    Sequence(SeqMatcher<P>),
    SingleImage(SingleImageMatcher<P>),
}

impl<P> AnyLocalizer<P> {
    /// Builds the localizer named by `kind`, validating its configuration.
    pub fn build(reference: Arc<ReferenceMap<P>>, kind: LocalizerKind) -> SeqMatchResult<Self> {
        Ok(match kind {
            LocalizerKind::Sequence(cfg) => Self::Sequence(SeqMatcher::new(reference, cfg)?),
            LocalizerKind::SingleImage => Self::SingleImage(SingleImageMatcher::new(reference)),
        })
    }
}

impl<P: Clone> Localizer<P> for AnyLocalizer<P> {
    fn localize(&self, query: DescriptorView<'_>) -> SeqMatchResult<Localization<P>> {
        match self {
            Self::Sequence(m) => m.localize(query),
            Self::SingleImage(m) => m.localize(query),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Sequence(m) => m.name(),
            Self::SingleImage(m) => m.name(),
        }
    }
}
