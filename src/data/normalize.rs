//! Per-feature standardization fitted on training data only.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::record::Dataset;
use crate::error::ConfigError;

/// Standard deviations below this are treated as zero variance; such a
/// column transforms to 0.
pub const ZERO_VARIANCE_TOLERANCE: f64 = 1e-12;

/// Per-column mean and sample standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub mean: Vec<f64>,
    pub std_dev: Vec<f64>,
}

/// Fits [`NormalizationStats`] so transformed columns have mean 0 and unit
/// standard deviation.
pub struct NormalizerStandardize;

impl NormalizerStandardize {
    /// Sample statistics (divisor `n - 1`) of every feature column.
    pub fn fit(train: &Dataset) -> Result<NormalizationStats, ConfigError> {
        if train.is_empty() {
            return Err(ConfigError::EmptyDataset("fit normalization on"));
        }
        let width = train.num_features();
        let n = train.len() as f64;

        let mut mean = vec![0.0; width];
        for record in &train.records {
            check_width(width, record.features.len())?;
            for (m, x) in mean.iter_mut().zip(&record.features) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut std_dev = vec![0.0; width];
        if train.len() > 1 {
            for record in &train.records {
                for ((s, x), m) in std_dev.iter_mut().zip(&record.features).zip(&mean) {
                    *s += (x - m).powi(2);
                }
            }
            for s in &mut std_dev {
                *s = (*s / (n - 1.0)).sqrt();
            }
        }

        for (column, s) in std_dev.iter().enumerate() {
            if *s < ZERO_VARIANCE_TOLERANCE {
                warn!(column, "feature has zero variance; it will standardize to 0");
            }
        }
        debug!(?mean, ?std_dev, "fitted normalizer");
        Ok(NormalizationStats { mean, std_dev })
    }
}

impl NormalizationStats {
    pub fn num_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardizes `dataset` in place with these (training) statistics.
    pub fn transform(&self, dataset: &mut Dataset) -> Result<(), ConfigError> {
        for record in &dataset.records {
            check_width(self.num_features(), record.features.len())?;
        }
        for record in &mut dataset.records {
            for ((x, m), s) in record.features.iter_mut().zip(&self.mean).zip(&self.std_dev) {
                *x = if *s < ZERO_VARIANCE_TOLERANCE { 0.0 } else { (*x - m) / s };
            }
        }
        Ok(())
    }

    /// Like [`transform`](Self::transform) but returns a new dataset.
    pub fn transformed(&self, dataset: &Dataset) -> Result<Dataset, ConfigError> {
        let mut copy = dataset.clone();
        self.transform(&mut copy)?;
        Ok(copy)
    }

    /// Maps standardized features back to the original scale. Zero-variance
    /// columns come back as their mean.
    pub fn revert(&self, features: &[f64]) -> Result<Vec<f64>, ConfigError> {
        check_width(self.num_features(), features.len())?;
        Ok(features.iter()
            .zip(&self.mean)
            .zip(&self.std_dev)
            .map(|((z, m), s)| if *s < ZERO_VARIANCE_TOLERANCE { *m } else { z * s + m })
            .collect())
    }
}

fn check_width(expected: usize, got: usize) -> Result<(), ConfigError> {
    if expected == got {
        Ok(())
    } else {
        Err(ConfigError::FeatureCountMismatch { expected, got })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Record;
    use approx::assert_relative_eq;

    fn dataset(rows: &[[f64; 3]]) -> Dataset {
        Dataset::new(rows.iter().map(|r| Record::new(r.to_vec(), 0)).collect())
    }

    fn column(ds: &Dataset, j: usize) -> Vec<f64> {
        ds.records.iter().map(|r| r.features[j]).collect()
    }

    #[test]
    fn fit_uses_sample_standard_deviation() {
        let ds = dataset(&[[1.0, 10.0, 0.0], [2.0, 20.0, 0.0], [3.0, 30.0, 0.0]]);
        let stats = NormalizerStandardize::fit(&ds).unwrap();
        assert_eq!(stats.mean, vec![2.0, 20.0, 0.0]);
        assert_relative_eq!(stats.std_dev[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(stats.std_dev[1], 10.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_column_transforms_to_zero() {
        let mut ds = dataset(&[[1.0, 7.5, 2.0], [2.0, 7.5, 4.0], [4.0, 7.5, 9.0]]);
        let stats = NormalizerStandardize::fit(&ds).unwrap();
        stats.transform(&mut ds).unwrap();
        assert_eq!(column(&ds, 1), vec![0.0, 0.0, 0.0]);
        assert!(ds.records.iter().flat_map(|r| &r.features).all(|x| x.is_finite()));
    }

    #[test]
    fn single_record_fits_with_zero_spread() {
        let mut ds = dataset(&[[1.0, 2.0, 3.0]]);
        let stats = NormalizerStandardize::fit(&ds).unwrap();
        assert_eq!(stats.std_dev, vec![0.0; 3]);
        stats.transform(&mut ds).unwrap();
        assert_eq!(ds.records[0].features, vec![0.0; 3]);
    }

    #[test]
    fn revert_undoes_transform() {
        let original = dataset(&[[1.0, 5.0, -2.0], [3.0, 6.0, 0.5], [8.0, 9.0, 4.0]]);
        let stats = NormalizerStandardize::fit(&original).unwrap();
        let scaled = stats.transformed(&original).unwrap();
        for (s, o) in scaled.records.iter().zip(&original.records) {
            let back = stats.revert(&s.features).unwrap();
            for (b, x) in back.iter().zip(&o.features) {
                assert_relative_eq!(*b, *x, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn width_mismatch_and_empty_input_are_errors() {
        let stats = NormalizerStandardize::fit(&dataset(&[[1.0, 2.0, 3.0], [2.0, 3.0, 4.0]])).unwrap();
        let mut narrow = Dataset::new(vec![Record::new(vec![1.0, 2.0], 0)]);
        assert_eq!(
            stats.transform(&mut narrow),
            Err(ConfigError::FeatureCountMismatch { expected: 3, got: 2 })
        );
        assert!(matches!(
            NormalizerStandardize::fit(&Dataset::default()),
            Err(ConfigError::EmptyDataset(_))
        ));
    }
}
