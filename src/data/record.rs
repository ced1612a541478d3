use serde::{Deserialize, Serialize};

use crate::math::matrix::Matrix;

/// One labelled sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub features: Vec<f64>,
    pub label: usize,
}

impl Record {
    pub fn new(features: Vec<f64>, label: usize) -> Record {
        Record { features, label }
    }
}

/// Ordered collection of records. File order until shuffled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Dataset {
        Dataset { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Width of the first record, or 0 for an empty dataset.
    pub fn num_features(&self) -> usize {
        self.records.first().map_or(0, |r| r.features.len())
    }

    /// Feature rows as an `n × num_features` batch.
    pub fn features(&self) -> Matrix {
        Matrix::from_data(self.records.iter().map(|r| r.features.clone()).collect())
    }

    pub fn labels(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.label).collect()
    }

    /// `n × num_classes` one-hot label matrix.
    pub fn one_hot_labels(&self, num_classes: usize) -> Matrix {
        let mut res = Matrix::zeros(self.len(), num_classes);
        for (row, record) in res.data.iter_mut().zip(&self.records) {
            row[record.label] = 1.0;
        }
        res
    }
}
