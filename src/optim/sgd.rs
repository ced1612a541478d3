use crate::layers::Layer;

/// Plain gradient descent with L2 weight decay. No momentum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
    pub l2: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64, l2: f64) -> Sgd {
        Sgd { learning_rate, l2 }
    }

    /// `W ← W − lr·(∂W + l2·W)`, `b ← b − lr·∂b`, using the gradients left
    /// in `layer` by its last backward pass.
    pub fn step(&self, layer: &mut Layer) {
        let (weights_grad, biases_grad) = layer.gradients();
        let decay = layer.weights().scale(self.l2);
        let weights_update = (weights_grad + &decay).scale(self.learning_rate);
        let biases_update = biases_grad.scale(self.learning_rate);
        layer.apply_update(&weights_update, &biases_update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::DenseLayer;
    use crate::activation::activation::ActivationFunction;
    use crate::math::matrix::Matrix;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn zero_gradient_still_shrinks_weights_but_not_biases() {
        let mut dense = DenseLayer::new(2, 2, ActivationFunction::Tanh, &mut StdRng::seed_from_u64(1));
        dense.biases = Matrix::from_data(vec![vec![0.5, -0.5]]);
        let before = dense.weights.clone();
        let mut layer = Layer::Dense(dense);

        Sgd::new(0.1, 1e-2).step(&mut layer);

        for (after_row, before_row) in layer.weights().data.iter().zip(&before.data) {
            for (a, b) in after_row.iter().zip(before_row) {
                assert_relative_eq!(*a, b * (1.0 - 0.1 * 1e-2), epsilon = 1e-15);
            }
        }
        assert_eq!(layer.biases().data, vec![vec![0.5, -0.5]]);
    }

    #[test]
    fn moves_against_the_gradient() {
        let mut dense = DenseLayer::new(1, 1, ActivationFunction::Identity, &mut StdRng::seed_from_u64(1));
        dense.weights = Matrix::from_data(vec![vec![1.0]]);
        dense.weights_grad = Matrix::from_data(vec![vec![2.0]]);
        dense.biases_grad = Matrix::from_data(vec![vec![-1.0]]);
        let mut layer = Layer::Dense(dense);

        Sgd::new(0.1, 0.0).step(&mut layer);

        assert_relative_eq!(layer.weights().data[0][0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(layer.biases().data[0][0], 0.1, epsilon = 1e-12);
    }
}
