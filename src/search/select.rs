//! Best-match selection and confidence.

use crate::trace::stage_event;
use crate::util::math::{argmin, fold_min};
use crate::util::{SeqMatchError, SeqMatchResult};

/// Best candidate start index and its confidence.
///
/// Lower confidence values mean a more distinctive match when template scores
/// are positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SequenceMatch {
    /// Reference index where the query sequence starts.
    pub index: usize,
    /// Ratio between the best score and the best score outside the window.
    pub confidence: f32,
}

impl SequenceMatch {
    /// False if the confidence is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.confidence.is_finite()
    }
}

/// Confidence of a match from its score and the best competing score.
///
/// For a positive competitor the ratio `best / outside_min` is returned;
/// otherwise the inverted ratio `outside_min / best`. The two branches are not
/// symmetric in meaning (the second arises with contrast-enhanced, possibly
/// negative scores); both are kept as-is.
pub fn match_confidence(best: f32, outside_min: f32) -> f32 {
    if outside_min > 0.0 {
        best / outside_min
    } else {
        outside_min / best
    }
}

/// Picks the lowest template score and rates it against the best score
/// outside a `match_window` exclusion zone around it.
pub fn locate_best_match(scores: &[f32], match_window: usize) -> SeqMatchResult<SequenceMatch> {
    let insufficient = SeqMatchError::InsufficientCandidates {
        len: scores.len(),
        window: match_window,
    };
    let best = argmin(scores).ok_or(insufficient.clone())?;

    let half = match_window / 2;
    let lo = best.saturating_sub(half);
    let hi = (best + half).min(scores.len());
    let outside = scores[..lo].iter().chain(&scores[hi..]).copied();
    let outside_min = fold_min(outside).ok_or(insufficient)?;

    let confidence = match_confidence(scores[best], outside_min);
    stage_event!(DEBUG, "best_match", index = best, confidence = confidence);
    Ok(SequenceMatch {
        index: best,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_positive_branch() {
        assert!((match_confidence(1.0, 4.0) - 0.25).abs() < 1e-7);
    }

    #[test]
    fn confidence_non_positive_branch() {
        assert!((match_confidence(-4.0, -2.0) - 0.5).abs() < 1e-7);
        assert_eq!(match_confidence(-1.0, 0.0), 0.0);
    }

    #[test]
    fn selects_sharp_minimum() {
        let mut scores = vec![5.0f32; 30];
        scores[12] = 1.0;
        scores[25] = 4.0;
        let m = locate_best_match(&scores, 6).unwrap();
        assert_eq!(m.index, 12);
        assert!((m.confidence - 0.25).abs() < 1e-7);
    }

    #[test]
    fn exclusion_window_hides_neighbours() {
        let scores = [9.0f32, 3.0, 2.0, 1.0, 2.0, 3.0, 9.0];
        // window [1, 5) excluded; best outside is scores[5] = 3
        let m = locate_best_match(&scores, 4).unwrap();
        assert_eq!(m.index, 3);
        assert!((m.confidence - 1.0 / 3.0).abs() < 1e-7);
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let scores = [2.0f32, 1.0, 5.0, 1.0, 5.0];
        assert_eq!(locate_best_match(&scores, 2).unwrap().index, 1);
    }

    #[test]
    fn window_covering_everything_fails() {
        let scores = [3.0f32, 1.0, 3.0];
        assert_eq!(
            locate_best_match(&scores, 8).unwrap_err(),
            SeqMatchError::InsufficientCandidates { len: 3, window: 8 }
        );
        assert!(locate_best_match(&[], 2).is_err());
    }
}
