//! Sequence search: velocity scoring and best-match selection.

pub(crate) mod select;
pub(crate) mod velocity;

pub use select::{locate_best_match, match_confidence, SequenceMatch};
#[cfg(feature = "rayon")]
pub use velocity::score_templates_par;
pub use velocity::{path_cost, score_templates, VelocityRange};
