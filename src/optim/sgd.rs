use crate::error::{ensure_shape, Result};
use crate::math::matrix::Matrix;

/// Plain stochastic gradient descent: `param -= learning_rate * grad`.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one update to `params`; the gradient must have the same shape.
    pub fn step(&self, params: &mut Matrix, grad: &Matrix) -> Result<()> {
        ensure_shape("gradient vs parameters", grad.shape(), params.shape())?;
        *params = params.clone() - grad.scale(self.learning_rate);
        Ok(())
    }
}
