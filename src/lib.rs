//! SeqMatch is a CPU-first sequence-matching localizer for place descriptors.
//!
//! Given a window of recent query descriptors, it builds a distance matrix
//! against a reference traverse, optionally enhances its local contrast,
//! searches constant-velocity alignments and reports the best-supported
//! reference pose with a confidence score. A single-image nearest-neighbour
//! baseline implements the same [`Localizer`] capability.
//!
//! Optional features: `rayon` (parallel stages and sweeps), `simd`
//! (vectorized dot products) and `tracing` (spans and events).

pub mod config;
pub mod descriptor;
pub mod enhance;
pub mod kernel;
pub mod localizer;
pub mod lowlevel;
pub mod matrix;
pub mod reference;
pub mod search;
pub mod sweep;
mod trace;
pub mod util;

pub use config::{max_index, SeqMatchConfig};
pub use descriptor::{DescriptorView, Descriptors};
pub use localizer::{
    AnyLocalizer, Localization, Localizer, LocalizerKind, SeqMatcher, SingleImageMatcher,
};
pub use matrix::DifferenceMatrix;
pub use reference::ReferenceMap;
pub use search::SequenceMatch;
pub use sweep::{localize_traverse, QueryOutcome, TraverseReport};
pub use util::{SeqMatchError, SeqMatchResult};

#[cfg(feature = "rayon")]
pub use sweep::localize_traverse_par;
