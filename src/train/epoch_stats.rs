use serde::{Serialize, Deserialize};

/// Training statistics for one completed epoch.
///
/// `train_loop` returns one of these per epoch, and hands each to the
/// listener passed to `train_loop_with` as soon as it is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 0-based iteration index; one full-batch update per epoch.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean negative log-likelihood plus the L2 penalty, measured before
    /// this epoch's update.
    pub loss: f64,
}
