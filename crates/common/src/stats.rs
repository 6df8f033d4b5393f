//! Percentile statistics over duration samples

use crate::error::{Error, Result};
use crate::models::Summary;

/// Linear-interpolation percentile over an ascending slice.
///
/// Returns `Ok(None)` for an empty slice. `p` must lie in `[0, 100]`.
pub fn percentile(sorted_values: &[f64], p: f64) -> Result<Option<f64>> {
    if !(0.0..=100.0).contains(&p) {
        return Err(Error::Validation(format!(
            "percentile must be in the range [0, 100], got {p}"
        )));
    }

    let (Some(first), Some(last)) = (sorted_values.first(), sorted_values.last()) else {
        return Ok(None);
    };

    if p <= 0.0 {
        return Ok(Some(*first));
    }
    if p >= 100.0 {
        return Ok(Some(*last));
    }

    let index = (sorted_values.len() - 1) as f64 * (p / 100.0);
    let lo = index.floor() as usize;
    let hi = index.ceil() as usize;

    if lo == hi {
        return Ok(Some(sorted_values[lo]));
    }

    let lower = sorted_values[lo];
    let upper = sorted_values[hi];
    Ok(Some(lower + (upper - lower) * (index - lo as f64)))
}

/// Summarize samples into count and P50/P75/P90.
///
/// Negative and NaN samples are dropped before sorting.
pub fn summarize_metric(name: &str, samples: &[f64]) -> Result<Summary> {
    let mut values: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|v| !v.is_nan() && *v >= 0.0)
        .collect();
    values.sort_by(f64::total_cmp);

    Ok(Summary {
        metric: name.to_string(),
        count: values.len(),
        p50: percentile(&values, 50.0)?,
        p75: percentile(&values, 75.0)?,
        p90: percentile(&values, 90.0)?,
    })
}
