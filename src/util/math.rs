//! Numeric helpers shared by the matching stages.

/// Returns the index of the smallest value, or `None` for an empty slice.
///
/// A NaN anywhere wins (the first one is returned); otherwise ties resolve
/// to the lowest index.
pub(crate) fn argmin(values: &[f32]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, &value) in values.iter().enumerate() {
        if value.is_nan() {
            return Some(idx);
        }
        match best {
            Some(b) if value >= values[b] => {}
            _ => best = Some(idx),
        }
    }
    best
}

/// Folds a sequence into its running minimum, replacing the current value
/// only when the next one is strictly smaller.
pub(crate) fn fold_min<I>(values: I) -> Option<f32>
where
    I: IntoIterator<Item = f32>,
{
    let mut iter = values.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |acc, v| if v < acc { v } else { acc }))
}

/// Converts a dot product of two unit vectors into their Euclidean distance.
///
/// Uses `|a - b|^2 = 2 - 2 a.b`; the radicand is clamped at zero since
/// rounding can push it slightly negative for identical or antipodal vectors.
#[inline]
pub(crate) fn unit_distance_from_dot(dot: f32) -> f32 {
    (2.0 - 2.0 * dot).max(0.0).sqrt()
}

/// Population mean and standard deviation (ddof = 0) of the values.
///
/// Two passes over the data so that a constant input yields a standard
/// deviation of exactly zero. An empty input yields NaN for both.
pub(crate) fn mean_std<I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = f32> + Clone,
{
    let mut count = 0usize;
    let mut sum = 0.0f64;
    for v in values.clone() {
        count += 1;
        sum += v as f64;
    }
    if count == 0 {
        return (f64::NAN, f64::NAN);
    }
    let n = count as f64;
    let mean = sum / n;
    let sum_sq_dev: f64 = values
        .into_iter()
        .map(|v| {
            let dev = v as f64 - mean;
            dev * dev
        })
        .sum();
    (mean, (sum_sq_dev / n).sqrt())
}
