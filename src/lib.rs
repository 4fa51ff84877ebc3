pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::{Activation, Gradients, Init, Layer, Linear, ParametricLayer, PlainLayer};
pub use network::{LayerSpec, Model, ModelSpec};
pub use loss::{BinaryCrossEntropy, Loss, LossType, MeanSquaredError};
pub use optim::sgd::Sgd;
pub use train::{train_loop, EpochStats, TrainConfig};
