//! Sequence matcher configuration.

use crate::util::{SeqMatchError, SeqMatchResult};

/// Parameters of the sequence-matching localizer.
///
/// The value is validated once when a matcher is built; the matching stages
/// only ever see a validated copy.
#[derive(Clone, Debug, PartialEq)]
pub struct SeqMatchConfig {
    /// Number of query descriptors matched as one sequence (`L`).
    pub seq_len: usize,
    /// Reference window used for local contrast enhancement.
    pub contrast_window: usize,
    /// Number of velocity steps; `num_velocities + 1` velocities are tested.
    pub num_velocities: usize,
    /// Smallest reference-per-query velocity.
    pub v_min: f64,
    /// Largest reference-per-query velocity.
    pub v_max: f64,
    /// Exclusion window around the best match when computing confidence.
    pub match_window: usize,
    /// Apply local contrast enhancement to the difference matrix.
    pub enhance: bool,
    /// Use rayon for the matrix and scoring stages; ignored without the
    /// `rayon` feature.
    pub parallel: bool,
}

impl Default for SeqMatchConfig {
    fn default() -> Self {
        Self {
            seq_len: 10,
            contrast_window: 10,
            num_velocities: 20,
            v_min: 1.0,
            v_max: 10.0,
            match_window: 20,
            enhance: false,
            parallel: false,
        }
    }
}

impl SeqMatchConfig {
    /// Checks the rules that do not depend on the reference map.
    pub fn validate(&self) -> SeqMatchResult<()> {
        if self.seq_len == 0 {
            return Err(invalid("seq_len must be positive"));
        }
        if self.contrast_window == 0 {
            return Err(invalid("contrast_window must be positive"));
        }
        if self.num_velocities == 0 {
            return Err(invalid("num_velocities must be at least 1"));
        }
        if !self.v_min.is_finite() || !self.v_max.is_finite() {
            return Err(invalid("velocities must be finite"));
        }
        if self.v_min <= 0.0 {
            return Err(invalid("v_min must be positive"));
        }
        if self.v_min > self.v_max {
            return Err(invalid("v_min must not exceed v_max"));
        }
        if self.match_window == 0 {
            return Err(invalid("match_window must be positive"));
        }
        Ok(())
    }

    /// Checks all rules against a reference map of `num_refs` places.
    pub fn validate_for(&self, num_refs: usize) -> SeqMatchResult<()> {
        self.validate()?;
        if num_refs == 0 {
            return Err(invalid("reference map is empty"));
        }
        if self.seq_len > num_refs {
            return Err(invalid("seq_len exceeds the reference length"));
        }
        if self.contrast_window >= num_refs {
            return Err(invalid("contrast_window must be smaller than the reference length"));
        }
        if self.match_window >= num_refs {
            return Err(invalid("match_window must be smaller than the reference length"));
        }
        let max_index = max_index(num_refs, self.seq_len, self.v_max);
        if max_index < 1 {
            return Err(invalid("v_max * seq_len leaves no candidate start index"));
        }
        if self.match_window as i64 >= max_index {
            return Err(invalid("match_window must be smaller than the candidate count"));
        }
        Ok(())
    }

    /// Returns the number of candidate start indices for `num_refs` places.
    pub fn candidate_count(&self, num_refs: usize) -> i64 {
        max_index(num_refs, self.seq_len, self.v_max)
    }
}

/// Number of admissible start indices: `N - 1 - ceil(v_max * L)`.
///
/// The value may be zero or negative, in which case no sequence fits.
pub fn max_index(num_refs: usize, seq_len: usize, v_max: f64) -> i64 {
    let reach = (v_max * seq_len as f64).ceil();
    num_refs as i64 - 1 - reach as i64
}

fn invalid(reason: &'static str) -> SeqMatchError {
    SeqMatchError::InvalidConfiguration { reason }
}
