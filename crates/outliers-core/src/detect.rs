use crate::error::DetectError;

/// Default standard-deviation multiple for flagging a value.
pub const DEFAULT_SIGMA: f64 = 2.0;

/// Tuning for the detector. Only the multiplier is configurable; the
/// statistics are always population (uncorrected) statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    pub sigma: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
        }
    }
}

/// Population mean and standard deviation of a value sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub mean: f64,
    pub stddev: f64,
}

/// Mean and uncorrected standard deviation over the whole slice, or `None`
/// for an empty slice. The empty case is handled here so no NaN ever enters
/// a comparison downstream.
pub fn population_stats(values: &[f64]) -> Option<Stats> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|value| {
            let deviation = value - mean;
            deviation * deviation
        })
        .sum::<f64>()
        / n;

    Some(Stats {
        mean,
        stddev: variance.sqrt(),
    })
}

/// Indices of values deviating from the mean by strictly more than
/// `sigma * stddev`, in ascending order.
///
/// A single element or an all-identical sequence has `stddev == 0`, and the
/// strict comparison then flags nothing. Comparison is exact; no epsilon.
pub fn detect_outliers(values: &[f64], config: &DetectorConfig) -> Result<Vec<i32>, DetectError> {
    if values.len() > i32::MAX as usize {
        return Err(DetectError::TooManyMetrics(values.len()));
    }

    let Some(stats) = population_stats(values) else {
        return Ok(Vec::new());
    };

    let threshold = config.sigma * stats.stddev;
    Ok(values
        .iter()
        .enumerate()
        .filter(|(_, value)| (*value - stats.mean).abs() > threshold)
        .map(|(index, _)| index as i32)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn detect(values: &[f64]) -> Vec<i32> {
        detect_outliers(values, &DetectorConfig::default()).unwrap()
    }

    #[test]
    fn empty_input_yields_no_outliers() {
        assert!(detect(&[]).is_empty());
    }

    #[test]
    fn single_value_yields_no_outliers() {
        assert!(detect(&[42.0]).is_empty());
    }

    #[test]
    fn identical_values_yield_no_outliers() {
        assert!(detect(&[7.0; 10]).is_empty());
    }

    #[test]
    fn stats_are_population_not_sample() {
        // Classic example: population stddev 2, sample stddev would be ~2.14.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = population_stats(&values).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.stddev, 2.0);
    }

    #[test]
    fn empty_input_has_no_stats() {
        assert!(population_stats(&[]).is_none());
    }

    #[test]
    fn injected_spikes_are_flagged_at_their_positions() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut values: Vec<f64> = (0..1000).map(|_| rng.gen_range(0.0..40.0)).collect();
        values[7] = 97.2;
        values[113] = 92.4;
        values[835] = 93.1;

        assert_eq!(detect(&values), vec![7, 113, 835]);
    }

    #[test]
    fn flagged_indices_are_in_bounds_ascending_and_over_threshold() {
        let mut rng = StdRng::seed_from_u64(11);
        let values: Vec<f64> = (0..500)
            .map(|i| {
                if i % 97 == 0 {
                    rng.gen_range(200.0..300.0)
                } else {
                    rng.gen_range(0.0..40.0)
                }
            })
            .collect();

        let stats = population_stats(&values).unwrap();
        let indices = detect(&values);
        assert!(!indices.is_empty());
        for window in indices.windows(2) {
            assert!(window[0] < window[1]);
        }
        for &index in &indices {
            let index = index as usize;
            assert!(index < values.len());
            assert!((values[index] - stats.mean).abs() > DEFAULT_SIGMA * stats.stddev);
        }
    }

    #[test]
    fn detection_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(23);
        let values: Vec<f64> = (0..256).map(|_| rng.gen_range(-10.0..10.0)).collect();
        assert_eq!(detect(&values), detect(&values));
    }

    #[test]
    fn custom_sigma_changes_the_threshold() {
        // One deviant among three identical values sits at sqrt(3) sigma:
        // outside 1 sigma, inside 2.
        let values = [10.0, 10.0, 10.0, 16.0];
        assert!(detect(&values).is_empty());
        let strict = detect_outliers(&values, &DetectorConfig { sigma: 1.0 }).unwrap();
        assert_eq!(strict, vec![3]);
    }
}
