use rand::Rng;
use tracing::debug;

use crate::error::ConfigError;
use crate::layers::{DenseLayer, Layer, OutputLayer};
use crate::math::matrix::Matrix;
use crate::network::spec::{LayerKind, NetworkSpec};

/// A strict chain of layers ending in a softmax output layer.
#[derive(Debug, Clone)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds and initializes a network from `spec`, drawing every weight
    /// from `rng` in layer order.
    pub fn new<R: Rng + ?Sized>(spec: &NetworkSpec, rng: &mut R) -> Result<Network, ConfigError> {
        spec.validate()?;
        let layers = spec.layers.iter()
            .map(|l| match l.kind {
                LayerKind::Dense { activation } => {
                    Layer::Dense(DenseLayer::new(l.input_size, l.size, activation, &mut *rng))
                }
                LayerKind::Output => Layer::Output(OutputLayer::new(l.input_size, l.size, &mut *rng)),
            })
            .collect();
        let params: usize = spec.layers.iter().map(|l| (l.input_size + 1) * l.size).sum();
        debug!(layers = spec.layers.len(), params, "network initialized");
        Ok(Network { layers })
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::input_size)
    }

    pub fn num_outputs(&self) -> usize {
        self.layers.last().map_or(0, Layer::size)
    }

    /// Training-mode forward pass; stores activations in each layer for backprop.
    pub fn forward(&mut self, features: &Matrix) -> Matrix {
        let mut current = features.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current);
        }
        current
    }

    /// Class probabilities for every row of `features`. Leaves the network untouched.
    pub fn output(&self, features: &Matrix) -> Matrix {
        let mut current = features.clone();
        for layer in &self.layers {
            current = layer.output(&current);
        }
        current
    }

    /// Backpropagates one-hot `labels` through the batch cached by the last
    /// `forward` call, leaving parameter gradients in every layer.
    pub fn backward(&mut self, labels: &Matrix) {
        let mut grad = labels.clone();
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad);
        }
    }

    /// `0.5 · l2 · Σ W²` over every weight matrix; biases are not penalized.
    pub fn l2_penalty(&self, l2: f64) -> f64 {
        0.5 * l2 * self.layers.iter().map(|l| l.weights().sum_squares()).sum::<f64>()
    }

    /// Negative log-likelihood of the last forward pass plus the L2 penalty.
    pub fn score(&self, labels: &Matrix, l2: f64) -> f64 {
        let data_loss = match self.layers.last() {
            Some(Layer::Output(output)) => output.score(labels),
            _ => 0.0,
        };
        data_loss + self.l2_penalty(l2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn iris_net(seed: u64) -> Network {
        let spec = NetworkSpec::mlp(4, &[3, 3], ActivationFunction::Tanh, 3);
        Network::new(&spec, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn same_seed_same_weights() {
        let a = iris_net(6);
        let b = iris_net(6);
        for (la, lb) in a.layers.iter().zip(&b.layers) {
            assert_eq!(la.weights(), lb.weights());
        }
        assert_ne!(a.layers[0].weights(), iris_net(7).layers[0].weights());
    }

    #[test]
    fn output_rows_are_probability_vectors() {
        let net = iris_net(6);
        assert_eq!((net.input_size(), net.num_outputs()), (4, 3));
        let x = Matrix::from_data(vec![vec![0.3, -1.2, 0.8, 0.0], vec![1.0, 1.0, 1.0, 1.0]]);
        let p = net.output(&x);
        assert_eq!((p.rows, p.cols), (2, 3));
        for row in &p.data {
            assert!(row.iter().all(|&v| v > 0.0));
            assert_relative_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn first_layer_gradient_matches_numeric_gradient_of_score() {
        let mut net = iris_net(9);
        let l2 = 1e-2;
        let x = Matrix::from_data(vec![vec![0.5, -0.2, 1.1, -0.7], vec![-1.0, 0.4, 0.3, 0.9]]);
        let y = Matrix::from_data(vec![vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0]]);

        net.forward(&x);
        net.backward(&y);
        let analytic = net.layers[0].gradients().0.data[2][1] + l2 * net.layers[0].weights().data[2][1];

        let score_with = |delta: f64| {
            let mut probe = net.clone();
            if let Layer::Dense(layer) = &mut probe.layers[0] {
                layer.weights.data[2][1] += delta;
            }
            probe.forward(&x);
            probe.score(&y, l2)
        };
        let h = 1e-6;
        let numeric = (score_with(h) - score_with(-h)) / (2.0 * h);
        assert_relative_eq!(analytic, numeric, epsilon = 1e-6);
    }

    #[test]
    fn rejects_invalid_spec() {
        let spec = NetworkSpec::mlp(4, &[3, 0], ActivationFunction::Tanh, 3);
        let err = Network::new(&spec, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, ConfigError::ZeroLayerSize { index: 1 });
    }
}
