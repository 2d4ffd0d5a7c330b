//! Sequence-matching localizer.

use crate::config::SeqMatchConfig;
use crate::descriptor::DescriptorView;
use crate::enhance::enhance_contrast;
use crate::localizer::{Localization, Localizer};
use crate::matrix::{difference_matrix, DifferenceMatrix};
use crate::reference::ReferenceMap;
use crate::search::{locate_best_match, score_templates, SequenceMatch, VelocityRange};
use crate::trace::stage_span;
use crate::util::SeqMatchResult;
use std::sync::Arc;

/// Localizes a query window by searching constant-velocity alignments
/// against the reference traverse.
///
/// The matcher holds only the shared reference map and a validated
/// configuration, so one instance can serve many threads.
pub struct SeqMatcher<P> {
    reference: Arc<ReferenceMap<P>>,
    cfg: SeqMatchConfig,
}

impl<P> SeqMatcher<P> {
    /// Creates a matcher; fails if `cfg` is invalid for this reference map.
    pub fn new(reference: Arc<ReferenceMap<P>>, cfg: SeqMatchConfig) -> SeqMatchResult<Self> {
        cfg.validate_for(reference.len())?;
        Ok(Self { reference, cfg })
    }

    /// Returns the matcher configuration.
    pub fn config(&self) -> &SeqMatchConfig {
        &self.cfg
    }

    /// Returns the shared reference map.
    pub fn reference(&self) -> &Arc<ReferenceMap<P>> {
        &self.reference
    }

    /// Difference matrix for the first `seq_len` rows of `query`, enhanced if
    /// configured.
    pub fn difference_matrix(&self, query: DescriptorView<'_>) -> SeqMatchResult<DifferenceMatrix> {
        let query = query.truncated(self.cfg.seq_len)?;
        let reference = self.reference.descriptors();

        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            let d = crate::matrix::difference_matrix_par(reference, query)?;
            return if self.cfg.enhance {
                crate::enhance::enhance_contrast_par(&d, self.cfg.contrast_window)
            } else {
                Ok(d)
            };
        }

        let d = difference_matrix(reference, query)?;
        if self.cfg.enhance {
            enhance_contrast(&d, self.cfg.contrast_window)
        } else {
            Ok(d)
        }
    }

    /// Template score per candidate start index.
    pub fn template_scores(&self, query: DescriptorView<'_>) -> SeqMatchResult<Vec<f32>> {
        let d = self.difference_matrix(query)?;
        let range = VelocityRange::from(&self.cfg);

        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return crate::search::score_templates_par(&d, &range);
        }

        score_templates(&d, &range)
    }

    /// Best start index and confidence for `query`.
    pub fn match_sequence(&self, query: DescriptorView<'_>) -> SeqMatchResult<SequenceMatch> {
        let _span = stage_span!(
            INFO,
            "seq_match",
            refs = self.reference.len(),
            queries = query.len()
        )
        .entered();
        let scores = self.template_scores(query)?;
        locate_best_match(&scores, self.cfg.match_window)
    }
}

impl<P: Clone> Localizer<P> for SeqMatcher<P> {
    fn localize(&self, query: DescriptorView<'_>) -> SeqMatchResult<Localization<P>> {
        let m = self.match_sequence(query)?;
        let pose = self.reference.pose(m.index)?.clone();
        Ok(Localization {
            index: m.index,
            pose,
            score: m.confidence,
        })
    }

    fn name(&self) -> &'static str {
        "Seq Match"
    }
}
