use rand::Rng;

use crate::{activation::activation::softmax, loss::nll::NegativeLogLikelihood, math::matrix::Matrix};

/// Softmax classification head trained with negative log-likelihood.
#[derive(Debug, Clone)]
pub struct OutputLayer {
    pub weights: Matrix,
    pub biases: Matrix,
    input: Matrix,
    probabilities: Matrix,
    pub(crate) weights_grad: Matrix,
    pub(crate) biases_grad: Matrix,
}

impl OutputLayer {
    pub fn new<R: Rng + ?Sized>(input_size: usize, size: usize, rng: &mut R) -> OutputLayer {
        OutputLayer {
            weights: Matrix::xavier(input_size, size, rng),
            biases: Matrix::zeros(1, size),
            input: Matrix::default(),
            probabilities: Matrix::default(),
            weights_grad: Matrix::zeros(input_size, size),
            biases_grad: Matrix::zeros(1, size),
        }
    }

    pub fn forward(&mut self, input: &Matrix) -> Matrix {
        let p = self.output(input);
        self.input = input.clone();
        self.probabilities = p.clone();
        p
    }

    pub fn output(&self, input: &Matrix) -> Matrix {
        softmax(&(input * &self.weights).add_row(&self.biases))
    }

    /// Mean NLL of the cached probabilities against `labels`.
    pub fn score(&self, labels: &Matrix) -> f64 {
        NegativeLogLikelihood::loss(&self.probabilities, labels)
    }

    /// `labels` are one-hot targets for the cached batch.
    pub fn backward(&mut self, labels: &Matrix) -> Matrix {
        let delta = NegativeLogLikelihood::derivative(&self.probabilities, labels);

        self.weights_grad = &self.input.transpose() * &delta;
        self.biases_grad = delta.sum_rows();

        &delta * &self.weights.transpose()
    }
}
