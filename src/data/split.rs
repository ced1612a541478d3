use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::data::record::Dataset;
use crate::error::ConfigError;

/// Disjoint train/test partition of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitTestAndTrain {
    pub train: Dataset,
    pub test: Dataset,
}

/// Permutes the record order in place.
pub fn shuffle<R: Rng + ?Sized>(dataset: &mut Dataset, rng: &mut R) {
    dataset.records.shuffle(rng);
}

/// Cuts `dataset` at `floor(fraction * len)`: the head trains, the rest tests.
pub fn split_test_and_train(dataset: Dataset, fraction: f64) -> Result<SplitTestAndTrain, ConfigError> {
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(ConfigError::InvalidSplitFraction(fraction));
    }
    let cut = (fraction * dataset.len() as f64).floor() as usize;
    let mut records = dataset.records;
    let test = records.split_off(cut);
    Ok(SplitTestAndTrain {
        train: Dataset::new(records),
        test: Dataset::new(test),
    })
}

/// Seeded shuffle followed by [`split_test_and_train`]. The same seed and
/// input order always produce the same partition.
pub fn shuffle_and_split(
    mut dataset: Dataset,
    seed: u64,
    fraction: f64,
) -> Result<SplitTestAndTrain, ConfigError> {
    shuffle(&mut dataset, &mut StdRng::seed_from_u64(seed));
    split_test_and_train(dataset, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Record;

    fn numbered(n: usize) -> Dataset {
        Dataset::new((0..n).map(|i| Record::new(vec![i as f64; 4], i % 3)).collect())
    }

    fn ids(ds: &Dataset) -> Vec<usize> {
        ds.records.iter().map(|r| r.features[0] as usize).collect()
    }

    #[test]
    fn sizes_follow_floor_of_fraction() {
        let split = shuffle_and_split(numbered(150), 6, 0.65).unwrap();
        assert_eq!((split.train.len(), split.test.len()), (97, 53));
    }

    #[test]
    fn same_seed_same_partition() {
        let a = shuffle_and_split(numbered(150), 6, 0.65).unwrap();
        let b = shuffle_and_split(numbered(150), 6, 0.65).unwrap();
        assert_eq!(a, b);

        let c = shuffle_and_split(numbered(150), 7, 0.65).unwrap();
        assert_ne!(ids(&a.train), ids(&c.train));
    }

    #[test]
    fn partition_is_disjoint_and_complete() {
        let split = shuffle_and_split(numbered(150), 6, 0.65).unwrap();
        let mut all: Vec<usize> = ids(&split.train).into_iter().chain(ids(&split.test)).collect();
        all.sort_unstable();
        assert_eq!(all, (0..150).collect::<Vec<_>>());
    }

    #[test]
    fn unshuffled_split_keeps_order() {
        let split = split_test_and_train(numbered(10), 0.5).unwrap();
        assert_eq!(ids(&split.train), vec![0, 1, 2, 3, 4]);
        assert_eq!(ids(&split.test), vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn fraction_must_be_strictly_inside_unit_interval() {
        for bad in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let err = split_test_and_train(numbered(10), bad).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidSplitFraction(_)));
        }
    }
}
