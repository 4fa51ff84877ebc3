pub mod mse;
pub mod bce;
pub mod loss_type;

pub use mse::MeanSquaredError;
pub use bce::BinaryCrossEntropy;
pub use loss_type::LossType;

use crate::math::matrix::Matrix;

/// A loss unit bound to one prediction and its targets.
pub trait Loss {
    /// Scalar discrepancy between prediction and target.
    fn forward(&self) -> f64;

    /// dL/d(predicted), shaped like the prediction.
    fn backward(&self) -> Matrix;
}
