use std::fmt;

use crate::error::Result;
use crate::math::matrix::Matrix;

/// What a parametric layer's backward pass produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    /// dL/d(input), handed to the preceding layer.
    pub input: Matrix,
    /// dL/d(weights).
    pub weights: Matrix,
    /// dL/d(biases).
    pub biases: Matrix,
}

/// A layer without learnable parameters (activations and the like).
pub trait PlainLayer {
    fn name(&self) -> &str;

    /// Computes the layer output, caching whatever `backward` needs.
    fn forward(&mut self, input: &Matrix) -> Result<Matrix>;

    /// Maps dL/d(output) to dL/d(input) for the most recent `forward`.
    fn backward(&mut self, gradient: &Matrix) -> Result<Matrix>;
}

/// A layer owning weights and biases that an optimizer step updates.
pub trait ParametricLayer {
    fn name(&self) -> &str;

    fn forward(&mut self, input: &Matrix) -> Result<Matrix>;

    /// Maps dL/d(output) to the input, weight and bias gradients.
    fn backward(&mut self, gradient: &Matrix) -> Result<Gradients>;

    /// Updates the stored parameters from their gradients.
    fn optimize(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, learning_rate: f64) -> Result<()>;
}

/// One entry in a `Model`. The variant decides the backward contract.
pub enum Layer {
    Parametric(Box<dyn ParametricLayer>),
    Plain(Box<dyn PlainLayer>),
}

impl Layer {
    pub fn parametric(layer: impl ParametricLayer + 'static) -> Layer {
        Layer::Parametric(Box::new(layer))
    }

    pub fn plain(layer: impl PlainLayer + 'static) -> Layer {
        Layer::Plain(Box::new(layer))
    }

    pub fn name(&self) -> &str {
        match self {
            Layer::Parametric(l) => l.name(),
            Layer::Plain(l) => l.name(),
        }
    }

    pub fn is_parametric(&self) -> bool {
        matches!(self, Layer::Parametric(_))
    }

    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        match self {
            Layer::Parametric(l) => l.forward(input),
            Layer::Plain(l) => l.forward(input),
        }
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Parametric(l) => f.debug_tuple("Parametric").field(&l.name()).finish(),
            Layer::Plain(l) => f.debug_tuple("Plain").field(&l.name()).finish(),
        }
    }
}
