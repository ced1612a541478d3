pub mod dense;
pub mod output;

pub use dense::DenseLayer;
pub use output::OutputLayer;

use crate::math::matrix::Matrix;

/// One link in the network chain.
///
/// Both variants map a batch (`n × input_size`) to `n × size` on the way
/// forward and accumulate their own parameter gradients on the way back.
/// The output layer's backward pass consumes the one-hot labels directly
/// (fused softmax + NLL gradient); a dense layer's consumes `∂L/∂output`.
#[derive(Debug, Clone)]
pub enum Layer {
    Dense(DenseLayer),
    Output(OutputLayer),
}

impl Layer {
    /// Forward pass that caches what the backward pass needs.
    pub fn forward(&mut self, input: &Matrix) -> Matrix {
        match self {
            Layer::Dense(layer) => layer.forward(input),
            Layer::Output(layer) => layer.forward(input),
        }
    }

    /// Forward pass without touching any cached state.
    pub fn output(&self, input: &Matrix) -> Matrix {
        match self {
            Layer::Dense(layer) => layer.output(input),
            Layer::Output(layer) => layer.output(input),
        }
    }

    /// Returns the gradient with respect to this layer's input.
    pub fn backward(&mut self, upstream: &Matrix) -> Matrix {
        match self {
            Layer::Dense(layer) => layer.backward(upstream),
            Layer::Output(layer) => layer.backward(upstream),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights().rows
    }

    pub fn size(&self) -> usize {
        self.weights().cols
    }

    pub fn weights(&self) -> &Matrix {
        match self {
            Layer::Dense(layer) => &layer.weights,
            Layer::Output(layer) => &layer.weights,
        }
    }

    pub fn biases(&self) -> &Matrix {
        match self {
            Layer::Dense(layer) => &layer.biases,
            Layer::Output(layer) => &layer.biases,
        }
    }

    /// `(∂W, ∂b)` from the most recent backward pass.
    pub fn gradients(&self) -> (&Matrix, &Matrix) {
        match self {
            Layer::Dense(layer) => (&layer.weights_grad, &layer.biases_grad),
            Layer::Output(layer) => (&layer.weights_grad, &layer.biases_grad),
        }
    }

    /// Subtracts the given updates from the parameters.
    pub fn apply_update(&mut self, weights_update: &Matrix, biases_update: &Matrix) {
        let (weights, biases) = match self {
            Layer::Dense(layer) => (&mut layer.weights, &mut layer.biases),
            Layer::Output(layer) => (&mut layer.weights, &mut layer.biases),
        };
        *weights = &*weights - weights_update;
        *biases = &*biases - biases_update;
    }
}
