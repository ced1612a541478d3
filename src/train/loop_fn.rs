use tracing::info;

use crate::error::ConfigError;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Trains `network` for exactly `config.epochs` full-batch epochs and returns
/// the per-epoch loss history.
///
/// # Arguments
/// - `network`   — modified in place
/// - `features`  — training batch, one row per sample
/// - `labels`    — one-hot targets, same row count as `features`
/// - `optimizer` — SGD (learning rate and L2 coefficient)
/// - `config`    — epoch count and reporting interval
pub fn train_loop(
    network: &mut Network,
    features: &Matrix,
    labels: &Matrix,
    optimizer: &Sgd,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>, ConfigError> {
    train_loop_with(network, features, labels, optimizer, config, |_| {})
}

/// [`train_loop`] that also calls `listener` after every epoch. The
/// listener only observes; it cannot stop training.
pub fn train_loop_with<F>(
    network: &mut Network,
    features: &Matrix,
    labels: &Matrix,
    optimizer: &Sgd,
    config: &TrainConfig,
    mut listener: F,
) -> Result<Vec<EpochStats>, ConfigError>
where
    F: FnMut(&EpochStats),
{
    check_shapes(network, features, labels)?;

    let mut history = Vec::with_capacity(config.epochs);
    for epoch in 0..config.epochs {
        let loss = run_one_epoch(network, features, labels, optimizer);

        if config.report_every > 0 && epoch % config.report_every == 0 {
            info!("Score at iteration {epoch} is {loss}");
        }

        let stats = EpochStats { epoch, total_epochs: config.epochs, loss };
        listener(&stats);
        history.push(stats);
    }

    Ok(history)
}

/// One forward pass, one backward pass, one SGD step per layer.
/// Returns the loss measured before the update.
fn run_one_epoch(network: &mut Network, features: &Matrix, labels: &Matrix, optimizer: &Sgd) -> f64 {
    network.forward(features);
    let loss = network.score(labels, optimizer.l2);
    network.backward(labels);
    for layer in &mut network.layers {
        optimizer.step(layer);
    }
    loss
}

fn check_shapes(network: &Network, features: &Matrix, labels: &Matrix) -> Result<(), ConfigError> {
    if features.rows == 0 {
        return Err(ConfigError::EmptyDataset("train on"));
    }
    if features.cols != network.input_size() {
        return Err(ConfigError::FeatureCountMismatch {
            expected: network.input_size(),
            got: features.cols,
        });
    }
    if labels.rows != features.rows {
        return Err(ConfigError::RowCountMismatch {
            features: features.rows,
            labels: labels.rows,
        });
    }
    if labels.cols != network.num_outputs() {
        return Err(ConfigError::FeatureCountMismatch {
            expected: network.num_outputs(),
            got: labels.cols,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::network::spec::NetworkSpec;
    use rand::{rngs::StdRng, SeedableRng};

    fn blobs() -> (Matrix, Matrix) {
        let features = Matrix::from_data(vec![
            vec![-1.0, -1.2], vec![-0.8, -1.0], vec![-1.1, -0.7],
            vec![1.0, 1.1], vec![0.9, 1.3], vec![1.2, 0.8],
        ]);
        let labels = Matrix::from_data(vec![
            vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0],
            vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 1.0],
        ]);
        (features, labels)
    }

    fn net() -> Network {
        let spec = NetworkSpec::mlp(2, &[3], ActivationFunction::Tanh, 2);
        Network::new(&spec, &mut StdRng::seed_from_u64(6)).unwrap()
    }

    #[test]
    fn runs_exactly_the_requested_epochs_and_loss_falls() {
        let (x, y) = blobs();
        let mut network = net();
        let mut seen = 0;
        let history = train_loop_with(
            &mut network, &x, &y, &Sgd::new(0.1, 1e-4), &TrainConfig::new(200, 50),
            |_| seen += 1,
        ).unwrap();

        assert_eq!(history.len(), 200);
        assert_eq!(seen, 200);
        assert_eq!(history[199].epoch, 199);
        assert!(history[199].loss < history[0].loss);
    }

    #[test]
    fn training_is_deterministic() {
        let (x, y) = blobs();
        let config = TrainConfig::new(20, 0);
        let mut a = net();
        let mut b = net();
        let ha = train_loop(&mut a, &x, &y, &Sgd::new(0.1, 1e-4), &config).unwrap();
        let hb = train_loop(&mut b, &x, &y, &Sgd::new(0.1, 1e-4), &config).unwrap();
        assert_eq!(ha, hb);
    }

    #[test]
    fn rejects_mismatched_batches() {
        let (x, _) = blobs();
        let mut network = net();
        let narrow = Matrix::from_data(vec![vec![1.0]]);
        let bad_labels = Matrix::zeros(6, 3);
        let sgd = Sgd::new(0.1, 0.0);
        let config = TrainConfig::default();

        assert_eq!(
            train_loop(&mut network, &narrow, &Matrix::zeros(1, 2), &sgd, &config),
            Err(ConfigError::FeatureCountMismatch { expected: 2, got: 1 })
        );
        assert_eq!(
            train_loop(&mut network, &x, &bad_labels, &sgd, &config),
            Err(ConfigError::FeatureCountMismatch { expected: 2, got: 3 })
        );
        assert_eq!(
            train_loop(&mut network, &x, &Matrix::zeros(4, 2), &sgd, &config),
            Err(ConfigError::RowCountMismatch { features: 6, labels: 4 })
        );
        assert_eq!(
            train_loop(&mut network, &Matrix::default(), &Matrix::default(), &sgd, &config),
            Err(ConfigError::EmptyDataset("train on"))
        );
    }
}
