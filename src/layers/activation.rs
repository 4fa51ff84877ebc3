use crate::activation::activation::ActivationFunction;
use crate::error::{ensure_shape, Result};
use crate::layers::layer::{Layer, PlainLayer};
use crate::math::matrix::Matrix;

/// Applies an `ActivationFunction` element-wise. Has no parameters.
#[derive(Debug, Clone)]
pub struct Activation {
    pub function: ActivationFunction,
    pre_activation: Matrix,
}

impl Activation {
    pub fn new(function: ActivationFunction) -> Activation {
        Activation {
            function,
            pre_activation: Matrix::default(),
        }
    }

    pub fn relu() -> Activation {
        Activation::new(ActivationFunction::ReLU)
    }

    pub fn sigmoid() -> Activation {
        Activation::new(ActivationFunction::Sigmoid)
    }

    pub fn tanh() -> Activation {
        Activation::new(ActivationFunction::Tanh)
    }
}

impl PlainLayer for Activation {
    fn name(&self) -> &str {
        self.function.name()
    }

    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        input.ensure_rectangular()?;
        let f = self.function;
        self.pre_activation = input.clone();
        Ok(input.map(|x| f.function(x)))
    }

    /// δ = gradient ⊙ f'(z), using the cached pre-activation z.
    fn backward(&mut self, gradient: &Matrix) -> Result<Matrix> {
        gradient.ensure_rectangular()?;
        ensure_shape("activation gradient", gradient.shape(), self.pre_activation.shape())?;
        let f = self.function;
        let derivative = self.pre_activation.map(|x| f.derivative(x));
        Ok(gradient.hadamard(&derivative))
    }
}

impl From<Activation> for Layer {
    fn from(layer: Activation) -> Layer {
        Layer::plain(layer)
    }
}
