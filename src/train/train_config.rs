use serde::{Serialize, Deserialize};

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`       — number of full-batch updates; the only stopping rule
/// - `report_every` — log the loss every this many epochs (0 disables it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub report_every: usize,
}

impl TrainConfig {
    pub fn new(epochs: usize, report_every: usize) -> Self {
        TrainConfig { epochs, report_every }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(1000, 100)
    }
}
