//! Percentile bootstrap of the median over paired deltas.

use rand::Rng;

use mpb_core::RngHandle;

/// Median of a sample, averaging the middle pair for even sizes.
pub fn median(values: &[f64]) -> f64 {
    debug_assert!(!values.is_empty());
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Percentile with linear interpolation between order statistics.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = lower + 1;
    if upper >= sorted.len() {
        return sorted[sorted.len() - 1];
    }
    let fraction = rank - lower as f64;
    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

/// 95% percentile bootstrap interval for the median of `deltas`.
///
/// Draws `n_resamples` resamples with replacement from the shared stream,
/// takes each resample's median, and reports the 2.5th and 97.5th
/// percentiles. The caller owns the RNG so consecutive comparators share
/// one deterministic stream.
pub fn bootstrap_median_ci(
    deltas: &[f64],
    n_resamples: usize,
    rng: &mut RngHandle,
) -> (f64, f64) {
    let mut medians = Vec::with_capacity(n_resamples);
    let mut resample = vec![0.0; deltas.len()];
    for _ in 0..n_resamples {
        for slot in resample.iter_mut() {
            *slot = deltas[rng.inner_mut().gen_range(0..deltas.len())];
        }
        medians.push(median(&resample));
    }
    medians.sort_by(f64::total_cmp);
    (percentile(&medians, 2.5), percentile(&medians, 97.5))
}
