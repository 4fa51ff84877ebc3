use serde::{Serialize, Deserialize};

/// Element-wise activation functions usable by the `Activation` layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    ReLU,
    Identity,
    Tanh,
    /// ReLU with slope `alpha` for negative inputs.
    LeakyReLU { alpha: f64 },
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        use ActivationFunction::*;

        match *self {
            Sigmoid => sigmoid(x),
            ReLU => x.max(0.0),
            Identity => x,
            Tanh => x.tanh(),
            LeakyReLU { alpha } if x < 0.0 => alpha * x,
            LeakyReLU { .. } => x,
        }
    }

    /// Derivative with respect to the pre-activation value `x`.
    ///
    /// The kinks of ReLU and LeakyReLU at zero take the left-hand slope.
    pub fn derivative(&self, x: f64) -> f64 {
        use ActivationFunction::*;

        match *self {
            Sigmoid => {
                let s = sigmoid(x);
                s * (1.0 - s)
            }
            ReLU => (x > 0.0) as u8 as f64,
            Identity => 1.0,
            Tanh => 1.0 - x.tanh().powi(2),
            LeakyReLU { alpha } if x <= 0.0 => alpha,
            LeakyReLU { .. } => 1.0,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Sigmoid => "Sigmoid",
            ActivationFunction::ReLU => "ReLU",
            ActivationFunction::Identity => "Identity",
            ActivationFunction::Tanh => "Tanh",
            ActivationFunction::LeakyReLU { .. } => "LeakyReLU",
        }
    }
}
