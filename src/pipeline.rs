//! The end-to-end run: acquire → parse → split → normalize → train → evaluate.

use std::path::PathBuf;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::data::{self, Dataset, NormalizationStats, NormalizerStandardize, RecordReader};
use crate::error::{ConfigError, Result};
use crate::eval::Evaluation;
use crate::network::Network;
use crate::train::{train_loop_with, EpochStats};

/// Everything a run produced.
#[derive(Debug)]
pub struct PipelineReport {
    pub data_path: PathBuf,
    pub train_size: usize,
    pub test_size: usize,
    pub normalization: NormalizationStats,
    pub history: Vec<EpochStats>,
    pub evaluation: Evaluation,
}

impl PipelineReport {
    pub fn final_loss(&self) -> Option<f64> {
        self.history.last().map(|s| s.loss)
    }
}

/// Resolves the dataset path: an explicit `data_file`, or the cached or
/// freshly downloaded copy under `data_dir`.
pub fn resolve_data_path(config: &PipelineConfig) -> Result<PathBuf> {
    match &config.data_file {
        Some(path) => Ok(path.clone()),
        None => Ok(data::ensure_iris_data(&config.data_dir)?),
    }
}

pub fn load_dataset(config: &PipelineConfig, path: &std::path::Path) -> Result<Dataset> {
    let reader = RecordReader::new(config.skip_lines, config.delimiter, config.num_features, config.num_classes);
    reader.read_path(path)
}

/// Runs the whole pipeline. `on_epoch` sees every epoch's stats.
pub fn run<F>(config: &PipelineConfig, on_epoch: F) -> Result<PipelineReport>
where
    F: FnMut(&EpochStats),
{
    config.validate()?;

    let data_path = resolve_data_path(config)?;
    debug!(path = %data_path.display(), "using dataset");

    let dataset = load_dataset(config, &data_path)?;
    info!(records = dataset.len(), "loaded dataset");

    let split = data::shuffle_and_split(dataset, config.seed, config.train_fraction)?;
    let (mut train, mut test) = (split.train, split.test);
    info!(train = train.len(), test = test.len(), "split dataset");
    if test.is_empty() {
        return Err(ConfigError::EmptyDataset("evaluate").into());
    }

    let normalization = NormalizerStandardize::fit(&train)?;
    normalization.transform(&mut train)?;
    normalization.transform(&mut test)?;

    info!("Build model....");
    let spec = config.network_spec();
    let mut network = Network::new(&spec, &mut StdRng::seed_from_u64(config.seed))?;

    info!(epochs = config.epochs, learning_rate = config.learning_rate, "training");
    let history = train_loop_with(
        &mut network,
        &train.features(),
        &train.one_hot_labels(config.num_classes),
        &config.optimizer(),
        &config.train_config(),
        on_epoch,
    )?;

    let mut evaluation = Evaluation::new(config.num_classes);
    evaluation.eval(&test.one_hot_labels(config.num_classes), &network.output(&test.features()));
    info!(accuracy = evaluation.accuracy(), "evaluation complete");

    Ok(PipelineReport {
        data_path,
        train_size: train.len(),
        test_size: test.len(),
        normalization,
        history,
        evaluation,
    })
}
