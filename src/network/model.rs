use log::trace;

use crate::error::{Error, Result};
use crate::layers::layer::{Gradients, Layer};
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::train::loop_fn::train_loop;
use crate::train::train_config::TrainConfig;

/// A strictly sequential stack of layers plus the loss recorded per epoch.
///
/// ```no_run
/// use freya::{Activation, Linear, Matrix, Model};
///
/// # fn main() -> freya::Result<()> {
/// let x = Matrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 1.0]])?;
/// let y = Matrix::from_rows(vec![vec![1.0], vec![0.0]])?;
///
/// let mut model = Model::new();
/// model.add(Linear::new(2, 5));
/// model.add(Activation::relu());
/// model.add(Linear::new(5, 1));
/// model.add(Activation::sigmoid());
/// model.train(&x, &y, 0.05, 400, "BinaryCrossEntropy", true)?;
/// let prediction = model.predict(&x)?;
/// assert_eq!(prediction.shape(), (2, 1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Model {
    layers: Vec<Layer>,
    loss_history: Vec<f64>,
}

impl Model {
    pub fn new() -> Model {
        Model::default()
    }

    /// Appends a layer. Width compatibility with the previous layer is not
    /// checked here; a mismatch surfaces as `ShapeMismatch` on first use.
    pub fn add(&mut self, layer: impl Into<Layer>) {
        self.layers.push(layer.into());
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// One loss value per completed epoch, oldest first.
    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    /// Runs `x` through every layer in insertion order.
    pub fn predict(&mut self, x: &Matrix) -> Result<Matrix> {
        self.forward(x)
    }

    /// Trains with a loss selected by name: `"BinaryCrossEntropy"` or
    /// `"MeanSquaredError"`. An unknown name fails with `UnsupportedLoss`
    /// before any epoch runs.
    pub fn train(
        &mut self,
        x_train: &Matrix,
        y_train: &Matrix,
        learning_rate: f64,
        epochs: usize,
        loss_function: &str,
        verbose: bool,
    ) -> Result<()> {
        let loss_type: LossType = loss_function.parse()?;
        let config = TrainConfig::new(learning_rate, epochs, loss_type).verbose(verbose);
        self.fit(x_train, y_train, &config)
    }

    /// Trains according to `config`. See `train_loop`.
    pub fn fit(&mut self, x_train: &Matrix, y_train: &Matrix, config: &TrainConfig) -> Result<()> {
        train_loop(self, x_train, y_train, config)
    }

    /// Runs one epoch: forward pass, loss, then a reverse backward pass in
    /// which every parametric layer is optimized as soon as its gradients
    /// are known. Records and returns the epoch's loss.
    ///
    /// If a layer fails during the backward pass, the layers after it have
    /// already been updated and stay that way.
    pub fn run_epoch(
        &mut self,
        x: &Matrix,
        y: &Matrix,
        learning_rate: f64,
        loss_type: LossType,
    ) -> Result<f64> {
        let output = self.forward(x)?;

        let loss = loss_type.build(&output, y)?;
        let error = loss.forward();
        let mut gradient = loss.backward();
        self.loss_history.push(error);

        for (i, layer) in self.layers.iter_mut().enumerate().rev() {
            gradient = match layer {
                Layer::Plain(l) => l.backward(&gradient)?,
                Layer::Parametric(l) => {
                    let Gradients { input, weights, biases } = l.backward(&gradient)?;
                    l.optimize(&weights, &biases, learning_rate)?;
                    input
                }
            };
            trace!("backward through layer {i} ({})", layer.name());
        }

        Ok(error)
    }

    fn forward(&mut self, x: &Matrix) -> Result<Matrix> {
        let (first, rest) = self.layers.split_first_mut().ok_or(Error::EmptyModel)?;
        x.ensure_rectangular()?;
        let mut output = first.forward(x)?;
        for layer in rest {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }
}
