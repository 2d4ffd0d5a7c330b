//! Low-level building blocks for custom localization pipelines.
//!
//! The stage functions are pure: each takes its inputs by reference and
//! returns a fresh value. Most users should go through [`crate::SeqMatcher`]
//! or [`crate::AnyLocalizer`] instead.

pub use crate::enhance::{contrast_window_bounds, enhance_contrast};
pub use crate::kernel::scalar::DotScalar;
pub use crate::kernel::Kernel;
pub use crate::matrix::difference_matrix;
pub use crate::search::{
    locate_best_match, match_confidence, path_cost, score_templates, VelocityRange,
};

#[cfg(feature = "rayon")]
pub use crate::enhance::enhance_contrast_par;
#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::difference_matrix_par as difference_matrix_par_with;
#[cfg(feature = "rayon")]
pub use crate::matrix::difference_matrix_par;
#[cfg(feature = "rayon")]
pub use crate::search::score_templates_par;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::DotSimd;
