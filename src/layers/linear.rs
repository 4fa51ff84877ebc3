use serde::{Serialize, Deserialize};

use crate::error::{ensure_shape, Error, Result};
use crate::layers::layer::{Gradients, Layer, ParametricLayer};
use crate::math::matrix::Matrix;
use crate::optim::sgd::Sgd;

/// Weight initialisation scheme for a `Linear` layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Init {
    /// Uniform in [-1, 1).
    Uniform,
    /// N(0, sqrt(1 / fan_in)); pair with Sigmoid, Tanh or Identity.
    #[default]
    Xavier,
    /// N(0, sqrt(2 / fan_in)); pair with ReLU.
    He,
}

/// Fully connected layer: `y = x·W + b`.
///
/// `W` is `(input_size, output_size)` and `b` is `(1, output_size)`, broadcast
/// over every row (sample) of `x`.
#[derive(Debug, Clone)]
pub struct Linear {
    pub input_size: usize,
    pub output_size: usize,
    weights: Matrix,
    biases: Matrix,
    input: Matrix, // last forward input, needed for dW
}

impl Linear {
    /// Xavier-initialised weights and zero biases.
    pub fn new(input_size: usize, output_size: usize) -> Linear {
        Linear::with_init(input_size, output_size, Init::Xavier)
    }

    pub fn with_init(input_size: usize, output_size: usize, init: Init) -> Linear {
        let weights = match init {
            Init::Uniform => Matrix::random(input_size, output_size),
            Init::Xavier => Matrix::xavier(input_size, output_size),
            Init::He => Matrix::he(input_size, output_size),
        };

        Linear {
            input_size,
            output_size,
            weights,
            biases: Matrix::zeros(1, output_size),
            input: Matrix::default(),
        }
    }

    /// Builds a layer from explicit parameters. `biases` must be `1 x weights.cols`.
    pub fn from_parameters(weights: Matrix, biases: Matrix) -> Result<Linear> {
        if weights.is_empty() {
            return Err(Error::InvalidConfig("linear weights must not be empty".into()));
        }
        weights.ensure_rectangular()?;
        biases.ensure_rectangular()?;
        ensure_shape("linear biases", biases.shape(), (1, weights.cols))?;

        Ok(Linear {
            input_size: weights.rows,
            output_size: weights.cols,
            weights,
            biases,
            input: Matrix::default(),
        })
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }
}

impl ParametricLayer for Linear {
    fn name(&self) -> &str {
        "Linear"
    }

    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        input.ensure_rectangular()?;
        ensure_shape("linear input", input.shape(), (input.rows, self.input_size))?;
        let z = (input.clone() * self.weights.clone()).add_row(&self.biases);
        self.input = input.clone();
        Ok(z)
    }

    fn backward(&mut self, gradient: &Matrix) -> Result<Gradients> {
        gradient.ensure_rectangular()?;
        ensure_shape("linear output gradient", gradient.shape(), (self.input.rows, self.output_size))?;

        let weights = self.input.transpose() * gradient.clone();
        let biases = gradient.sum_rows();
        let input = gradient.clone() * self.weights.transpose();

        Ok(Gradients { input, weights, biases })
    }

    fn optimize(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, learning_rate: f64) -> Result<()> {
        // Check both before touching either so a bad call leaves the layer intact.
        weights_grad.ensure_rectangular()?;
        biases_grad.ensure_rectangular()?;
        ensure_shape("weights gradient", weights_grad.shape(), self.weights.shape())?;
        ensure_shape("biases gradient", biases_grad.shape(), self.biases.shape())?;

        let sgd = Sgd::new(learning_rate);
        sgd.step(&mut self.weights, weights_grad)?;
        sgd.step(&mut self.biases, biases_grad)
    }
}

impl From<Linear> for Layer {
    fn from(layer: Linear) -> Layer {
        Layer::parametric(layer)
    }
}
