use rand::Rng;

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Fully connected hidden layer: `activation(X·W + b)`.
#[derive(Debug, Clone)]
pub struct DenseLayer {
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
    input: Matrix,
    pre_neurons: Matrix,  // pre-activation values (z = XW + b) needed for correct derivative
    pub(crate) weights_grad: Matrix,
    pub(crate) biases_grad: Matrix,
}

impl DenseLayer {
    /// Xavier-initialized weights, zero biases.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> DenseLayer {
        DenseLayer {
            weights: Matrix::xavier(input_size, size, rng),
            biases: Matrix::zeros(1, size),
            activator: activation,
            input: Matrix::default(),
            pre_neurons: Matrix::default(),
            weights_grad: Matrix::zeros(input_size, size),
            biases_grad: Matrix::zeros(1, size),
        }
    }

    pub fn forward(&mut self, input: &Matrix) -> Matrix {
        let z = (input * &self.weights).add_row(&self.biases);
        let a = z.map(|x| self.activator.function(x));
        self.input = input.clone();
        self.pre_neurons = z;
        a
    }

    pub fn output(&self, input: &Matrix) -> Matrix {
        (input * &self.weights)
            .add_row(&self.biases)
            .map(|x| self.activator.function(x))
    }

    /// `upstream` is ∂L/∂a for this layer. Stores (∂W, ∂b) and returns ∂L/∂input.
    pub fn backward(&mut self, upstream: &Matrix) -> Matrix {
        // Use pre-activation z so that derivative(z) = σ'(z) is computed correctly
        let act_derivative = self.pre_neurons.map(|x| self.activator.derivative(x));
        // δ = error ⊙ σ'(z)
        let delta = upstream.hadamard(&act_derivative);

        self.weights_grad = &self.input.transpose() * &delta;
        self.biases_grad = delta.sum_rows();

        &delta * &self.weights.transpose()
    }
}
