use crate::error::{ensure_shape, Result};
use crate::loss::Loss;
use crate::math::matrix::Matrix;

/// Mean squared error over every element of the batch.
pub struct MeanSquaredError<'a> {
    predicted: &'a Matrix,
    expected: &'a Matrix,
}

impl<'a> MeanSquaredError<'a> {
    pub fn new(predicted: &'a Matrix, expected: &'a Matrix) -> Result<Self> {
        predicted.ensure_rectangular()?;
        expected.ensure_rectangular()?;
        ensure_shape("predicted vs target", predicted.shape(), expected.shape())?;
        Ok(MeanSquaredError { predicted, expected })
    }
}

impl Loss for MeanSquaredError<'_> {
    /// mean((predicted - expected)²)
    fn forward(&self) -> f64 {
        let n = self.predicted.len() as f64;
        self.predicted.zip_map(self.expected, |p, y| (p - y).powi(2)).sum() / n
    }

    /// 2·(predicted - expected) / n
    fn backward(&self) -> Matrix {
        let n = self.predicted.len() as f64;
        self.predicted.zip_map(self.expected, |p, y| 2.0 * (p - y) / n)
    }
}
