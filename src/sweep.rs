//! Batch localization over a query traverse.
//!
//! Every query window is localized independently; a failed query is
//! recorded and the sweep continues.

use crate::descriptor::Descriptors;
use crate::localizer::{Localization, Localizer};
use crate::trace::{stage_event, stage_span};
use crate::util::SeqMatchResult;
use std::time::{Duration, Instant};

/// Result of localizing one query window.
#[derive(Clone, Debug)]
pub struct QueryOutcome<P> {
    /// Position of the query in the traverse.
    pub query: usize,
    /// Proposal or the error that prevented one.
    pub result: SeqMatchResult<Localization<P>>,
    /// Wall time spent in `localize`.
    pub elapsed: Duration,
}

/// Outcomes for a whole traverse, in query order.
#[derive(Clone, Debug)]
pub struct TraverseReport<P> {
    /// Name of the localizer that produced the report.
    pub model: &'static str,
    /// One entry per query window.
    pub outcomes: Vec<QueryOutcome<P>>,
}

impl<P> TraverseReport<P> {
    /// Number of queries that produced a proposal.
    pub fn num_localized(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of queries that failed.
    pub fn num_failed(&self) -> usize {
        self.outcomes.len() - self.num_localized()
    }

    /// Total time spent localizing.
    pub fn total_time(&self) -> Duration {
        self.outcomes.iter().map(|o| o.elapsed).sum()
    }
}

fn localize_one<P, L>(localizer: &L, query: usize, window: &Descriptors) -> QueryOutcome<P>
where
    L: Localizer<P> + ?Sized,
{
    let start = Instant::now();
    let result = localizer.localize(window.view());
    let elapsed = start.elapsed();
    if let Err(err) = &result {
        stage_event!(
            DEBUG,
            "query_failed",
            query = query,
            error = err.to_string().as_str()
        );
    }
    QueryOutcome {
        query,
        result,
        elapsed,
    }
}

fn finish<P>(model: &'static str, outcomes: Vec<QueryOutcome<P>>) -> TraverseReport<P> {
    let report = TraverseReport { model, outcomes };
    stage_event!(
        INFO,
        "traverse_done",
        localized = report.num_localized(),
        failed = report.num_failed()
    );
    report
}

/// Localizes every window of a traverse in order.
pub fn localize_traverse<P, L>(localizer: &L, windows: &[Descriptors]) -> TraverseReport<P>
where
    L: Localizer<P> + ?Sized,
{
    let _span = stage_span!(INFO, "localize_traverse", queries = windows.len()).entered();
    let outcomes = windows
        .iter()
        .enumerate()
        .map(|(query, window)| localize_one(localizer, query, window))
        .collect();
    finish(localizer.name(), outcomes)
}

/// Query-parallel variant of [`localize_traverse`]; outcomes keep query order.
#[cfg(feature = "rayon")]
pub fn localize_traverse_par<P, L>(localizer: &L, windows: &[Descriptors]) -> TraverseReport<P>
where
    P: Send,
    L: Localizer<P> + Sync + ?Sized,
{
    use rayon::prelude::*;

    let _span = stage_span!(
        INFO,
        "localize_traverse",
        queries = windows.len(),
        parallel = true
    )
    .entered();
    let outcomes = windows
        .par_iter()
        .enumerate()
        .map(|(query, window)| localize_one(localizer, query, window))
        .collect();
    finish(localizer.name(), outcomes)
}
