//! Descriptive statistics, correlation and z-score anomaly flagging.
//!
//! These helpers back the aggregation reports. Empty input yields `None`
//! rather than NaN, and the standard deviation of a single observation is
//! defined as zero.

use serde::Serialize;
use tracing::debug;

/// Degrees-of-freedom convention for the standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdMode {
    /// Divide by `n`. The anomaly detector uses this convention.
    Population,
    /// Divide by `n - 1`.
    Sample,
}

/// Summary statistics over one numeric series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub std: Option<f64>,
}

/// Compute the full summary in the given std convention.
pub fn describe(values: &[f64], mode: StdMode) -> Summary {
    Summary {
        count: values.len(),
        mean: mean(values),
        median: median(values),
        min: values.iter().copied().reduce(f64::min),
        max: values.iter().copied().reduce(f64::max),
        std: std_dev(values, mode),
    }
}

/// Arithmetic mean; `None` on empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median over a sorted copy; even-length input averages the middle pair.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Standard deviation via Welford's single-pass update.
///
/// `None` on empty input; a single observation has deviation zero in both
/// conventions.
pub fn std_dev(values: &[f64], mode: StdMode) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    if values.len() == 1 {
        return Some(0.0);
    }

    // Welford's online algorithm for numerically stable variance.
    let mut count = 0usize;
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for &x in values {
        count += 1;
        let delta = x - mean;
        mean += delta / count as f64;
        let delta2 = x - mean;
        m2 += delta * delta2;
    }

    let denom = match mode {
        StdMode::Population => count,
        StdMode::Sample => count - 1,
    };
    Some((m2 / denom as f64).sqrt())
}

/// Pearson correlation coefficient of two equal-length series.
///
/// `None` when lengths differ, fewer than two pairs exist, or either
/// series is constant (zero variance leaves the coefficient undefined).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Indices of values whose absolute z-score reaches `threshold`.
///
/// Z-scores use the population deviation. A constant series has no spread
/// to measure against and flags nothing; the comparison is inclusive, so a
/// value sitting exactly at the threshold is flagged.
pub fn zscore_flags(values: &[f64], threshold: f64) -> Vec<usize> {
    let Some(mean) = mean(values) else {
        return Vec::new();
    };
    let Some(std) = std_dev(values, StdMode::Population) else {
        return Vec::new();
    };
    if std == 0.0 {
        return Vec::new();
    }
    let flagged: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, &v)| ((v - mean) / std).abs() >= threshold)
        .map(|(idx, _)| idx)
        .collect();
    debug!(
        observations = values.len(),
        flagged = flagged.len(),
        threshold,
        "z-score pass complete"
    );
    flagged
}

/// Z-score of one value against a series mean and deviation.
pub fn zscore(value: f64, mean: f64, std: f64) -> f64 {
    if std == 0.0 {
        return 0.0;
    }
    (value - mean) / std
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Summary statistics
    // ========================================================================

    #[test]
    fn describe_handles_empty_input() {
        let summary = describe(&[], StdMode::Population);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.median, None);
        assert_eq!(summary.min, None);
        assert_eq!(summary.max, None);
        assert_eq!(summary.std, None);
    }

    #[test]
    fn single_observation_has_zero_std() {
        let summary = describe(&[42.0], StdMode::Sample);
        assert_eq!(summary.mean, Some(42.0));
        assert_eq!(summary.median, Some(42.0));
        assert_eq!(summary.std, Some(0.0));
    }

    #[test]
    fn even_length_median_averages_middle_pair() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn population_and_sample_std_differ() {
        let values = [10.0, 10.0, 10.0, 10.0, 100.0];
        let pop = std_dev(&values, StdMode::Population).unwrap();
        let sample = std_dev(&values, StdMode::Sample).unwrap();
        assert!((pop - 36.0).abs() < 1e-9);
        assert!((sample - 40.249223594996215).abs() < 1e-9);
    }

    #[test]
    fn welford_matches_two_pass_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&values, StdMode::Population).unwrap() - 2.0).abs() < 1e-12);
    }

    // ========================================================================
    // Correlation
    // ========================================================================

    #[test]
    fn pearson_detects_perfect_linear_relation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);

        let neg = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&xs, &neg).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_is_undefined_for_constant_or_mismatched_series() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
    }

    // ========================================================================
    // Anomaly flagging
    // ========================================================================

    #[test]
    fn spike_reaches_threshold_exactly() {
        // mean 28, population std 36: z(100) = 2.0 on the nose.
        let values = [10.0, 10.0, 10.0, 10.0, 100.0];
        assert_eq!(zscore_flags(&values, 2.0), vec![4]);
    }

    #[test]
    fn constant_series_flags_nothing() {
        assert_eq!(zscore_flags(&[5.0, 5.0, 5.0], 0.5), Vec::<usize>::new());
        assert_eq!(zscore_flags(&[], 2.0), Vec::<usize>::new());
    }

    #[test]
    fn tighter_threshold_flags_both_tails() {
        let values = [1.0, 5.0, 5.0, 5.0, 9.0];
        let flags = zscore_flags(&values, 1.0);
        assert_eq!(flags, vec![0, 4]);
    }

    #[test]
    fn zscore_of_zero_spread_is_zero() {
        assert_eq!(zscore(7.0, 7.0, 0.0), 0.0);
        assert!((zscore(100.0, 28.0, 36.0) - 2.0).abs() < 1e-12);
    }
}
