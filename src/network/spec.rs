use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{ensure_shape, Error, Result};
use crate::layers::{Activation, Linear};
use crate::layers::linear::Init;
use crate::loss::loss_type::LossType;
use crate::network::model::Model;

/// Describes one layer in a model specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerSpec {
    /// A fully connected layer of `input_size -> output_size`.
    Linear {
        input_size: usize,
        output_size: usize,
        #[serde(default)]
        init: Init,
    },
    /// An element-wise activation.
    Activation { function: ActivationFunction },
}

/// A serializable description of a model architecture and the loss it
/// trains against.
///
/// Only the architecture is stored: building a `ModelSpec` always yields
/// freshly initialised parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Human-readable name, used in logs.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    pub loss: LossType,
}

impl ModelSpec {
    /// Checks the architecture and builds an untrained `Model` from it.
    ///
    /// Consecutive `Linear` layers must agree on width (activations keep the
    /// width unchanged), and no `Linear` may have a zero size.
    pub fn build(&self) -> Result<Model> {
        if self.layers.is_empty() {
            return Err(Error::EmptyModel);
        }

        let mut model = Model::new();
        let mut width: Option<usize> = None;

        for layer in &self.layers {
            match *layer {
                LayerSpec::Linear { input_size, output_size, init } => {
                    if input_size == 0 || output_size == 0 {
                        return Err(Error::InvalidConfig(format!(
                            "linear layer sizes must be non-zero, got {input_size} -> {output_size}"
                        )));
                    }
                    if let Some(prev) = width {
                        ensure_shape("consecutive layer widths", (1, input_size), (1, prev))?;
                    }
                    width = Some(output_size);
                    model.add(Linear::with_init(input_size, output_size, init));
                }
                LayerSpec::Activation { function } => model.add(Activation::new(function)),
            }
        }

        Ok(model)
    }

    /// Input width expected by the first `Linear` layer, if any.
    pub fn input_size(&self) -> Option<usize> {
        self.layers.iter().find_map(|layer| match layer {
            LayerSpec::Linear { input_size, .. } => Some(*input_size),
            LayerSpec::Activation { .. } => None,
        })
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `ModelSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<ModelSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
