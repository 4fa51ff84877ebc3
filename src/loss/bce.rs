use crate::error::{ensure_shape, Result};
use crate::loss::Loss;
use crate::math::matrix::Matrix;

const EPS: f64 = 1e-12;

/// Binary cross-entropy; expects predictions in (0, 1), e.g. from a Sigmoid.
pub struct BinaryCrossEntropy<'a> {
    predicted: &'a Matrix,
    expected: &'a Matrix,
}

impl<'a> BinaryCrossEntropy<'a> {
    pub fn new(predicted: &'a Matrix, expected: &'a Matrix) -> Result<Self> {
        predicted.ensure_rectangular()?;
        expected.ensure_rectangular()?;
        ensure_shape("predicted vs target", predicted.shape(), expected.shape())?;
        Ok(BinaryCrossEntropy { predicted, expected })
    }
}

impl Loss for BinaryCrossEntropy<'_> {
    /// -mean(y·log(p+ε) + (1-y)·log(1-p+ε))
    fn forward(&self) -> f64 {
        let n = self.predicted.len() as f64;
        self.predicted
            .zip_map(self.expected, |p, y| -(y * (p + EPS).ln() + (1.0 - y) * (1.0 - p + EPS).ln()))
            .sum() / n
    }

    /// (p - y) / ((p + ε) · (1 - p + ε)) / n
    fn backward(&self) -> Matrix {
        let n = self.predicted.len() as f64;
        self.predicted
            .zip_map(self.expected, |p, y| (p - y) / ((p + EPS) * (1.0 - p + EPS)) / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confident_correct_prediction_has_near_zero_loss() {
        let p = Matrix::from_data(vec![vec![1.0], vec![0.0]]);
        let y = Matrix::from_data(vec![vec![1.0], vec![0.0]]);
        let bce = BinaryCrossEntropy::new(&p, &y).unwrap();
        assert!(bce.forward().abs() < 1e-9);
    }

    #[test]
    fn half_prediction_costs_ln2() {
        let p = Matrix::from_data(vec![vec![0.5, 0.5]]);
        let y = Matrix::from_data(vec![vec![1.0, 0.0]]);
        let bce = BinaryCrossEntropy::new(&p, &y).unwrap();
        assert!((bce.forward() - std::f64::consts::LN_2).abs() < 1e-9);

        // d/dp at p = 0.5 is (p - y) / 0.25, halved by the mean over two elements.
        let g = bce.backward();
        assert!((g.data[0][0] + 1.0).abs() < 1e-9);
        assert!((g.data[0][1] - 1.0).abs() < 1e-9);
    }
}
