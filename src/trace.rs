//! Feature-gated tracing hooks.
//!
//! Call sites pick the level: `INFO` for whole localizations and sweeps,
//! `DEBUG` for the individual pipeline stages and per-query detail.
//! Without the `tracing` feature nothing is emitted and spans become
//! [`NoopSpan`].

/// Opens a span at `tracing::Level::$level`.
///
/// `let _span = stage_span!(DEBUG, "score_templates", candidates = m).entered();`
#[cfg(feature = "tracing")]
macro_rules! stage_span {
    ($level:ident, $name:expr $(, $($field:tt)*)?) => {
        tracing::span!(tracing::Level::$level, $name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! stage_span {
    ($level:ident, $name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emits a named event at `tracing::Level::$level` with key/value fields.
#[cfg(feature = "tracing")]
macro_rules! stage_event {
    ($level:ident, $name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::event!(name: $name, tracing::Level::$level, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! stage_event {
    ($level:ident, $name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

pub(crate) use stage_event;
pub(crate) use stage_span;

/// Span guard returned by [`stage_span!`] when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
