pub mod layer;
pub mod linear;
pub mod activation;

pub use layer::{Gradients, Layer, ParametricLayer, PlainLayer};
pub use linear::{Init, Linear};
pub use activation::Activation;
