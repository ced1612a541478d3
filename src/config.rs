use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{ConfigError, Result};
use crate::network::spec::NetworkSpec;
use crate::optim::sgd::Sgd;
use crate::train::train_config::TrainConfig;

/// Every knob of a pipeline run. Missing JSON fields take the defaults,
/// which reproduce the classic Iris tutorial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where the archive is cached and extracted.
    pub data_dir: PathBuf,
    /// Use this file instead of downloading.
    pub data_file: Option<PathBuf>,
    pub skip_lines: usize,
    pub delimiter: char,
    pub num_features: usize,
    pub num_classes: usize,
    /// Seeds both the shuffle and weight initialization.
    pub seed: u64,
    pub train_fraction: f64,
    pub hidden_layers: Vec<usize>,
    pub hidden_activation: ActivationFunction,
    pub learning_rate: f64,
    pub l2: f64,
    pub epochs: usize,
    pub report_every: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            data_dir: default_data_dir(),
            data_file: None,
            skip_lines: 0,
            delimiter: ',',
            num_features: 4,
            num_classes: 3,
            seed: 6,
            train_fraction: 0.65,
            hidden_layers: vec![3, 3],
            hidden_activation: ActivationFunction::Tanh,
            learning_rate: 0.1,
            l2: 1e-4,
            epochs: 1000,
            report_every: 100,
        }
    }
}

impl PipelineConfig {
    pub fn load_json(path: &Path) -> Result<PipelineConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(ConfigError::InvalidSplitFraction(self.train_fraction));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ConfigError::InvalidHyperparameter {
                name: "learning_rate",
                requirement: "positive and finite",
                value: self.learning_rate,
            });
        }
        if !(self.l2 >= 0.0 && self.l2.is_finite()) {
            return Err(ConfigError::InvalidHyperparameter {
                name: "l2",
                requirement: "non-negative and finite",
                value: self.l2,
            });
        }
        if self.num_classes < 2 {
            return Err(ConfigError::InvalidHyperparameter {
                name: "num_classes",
                requirement: "at least 2",
                value: self.num_classes as f64,
            });
        }
        self.network_spec().validate()
    }

    pub fn network_spec(&self) -> NetworkSpec {
        NetworkSpec::mlp(self.num_features, &self.hidden_layers, self.hidden_activation, self.num_classes)
    }

    pub fn optimizer(&self) -> Sgd {
        Sgd::new(self.learning_rate, self.l2)
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig::new(self.epochs, self.report_every)
    }
}

/// `<cache dir>/iris-nn`, or `./data` where no cache dir is known.
pub fn default_data_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("iris-nn"))
        .unwrap_or_else(|| PathBuf::from("data"))
}
