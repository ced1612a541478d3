use crate::math::matrix::Matrix;

/// Negative log-likelihood over softmax probabilities and one-hot labels.
pub struct NegativeLogLikelihood;

/// Small epsilon added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl NegativeLogLikelihood {
    /// Mean over the batch of `-sum_k y_k * ln(p_k)`.
    ///
    /// `predicted` — softmax probabilities, one row per sample
    /// `expected`  — one-hot targets, same shape
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        assert_eq!((predicted.rows, predicted.cols), (expected.rows, expected.cols));
        if predicted.rows == 0 {
            return 0.0;
        }
        let total: f64 = predicted.data.iter().zip(expected.data.iter())
            .flat_map(|(p_row, e_row)| p_row.iter().zip(e_row.iter()))
            .map(|(p, e)| -e * (p + EPS).ln())
            .sum();
        total / predicted.rows as f64
    }

    /// Gradient of the batch-mean loss with respect to the pre-softmax logits.
    ///
    /// Softmax composed with NLL simplifies to `(predicted - expected) / n`,
    /// so the output layer must not apply the softmax Jacobian again.
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Matrix {
        let n = predicted.rows.max(1) as f64;
        (predicted - expected).scale(1.0 / n)
    }
}
