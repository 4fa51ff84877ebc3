// Trains XOR and prints the predictions.
//   cargo run                      built-in architecture
//   cargo run -- path/to/spec.json architecture from a ModelSpec file
//   RUST_LOG=debug cargo run       per-epoch losses
use std::process::ExitCode;

use freya::{ActivationFunction, Init, LayerSpec, LossType, Matrix, ModelSpec};
use log::error;

fn xor_spec() -> ModelSpec {
    ModelSpec {
        name: "xor".into(),
        description: Some("2-4-1 classifier for XOR".into()),
        layers: vec![
            LayerSpec::Linear { input_size: 2, output_size: 4, init: Init::Xavier },
            LayerSpec::Activation { function: ActivationFunction::Tanh },
            LayerSpec::Linear { input_size: 4, output_size: 1, init: Init::Xavier },
            LayerSpec::Activation { function: ActivationFunction::Sigmoid },
        ],
        loss: LossType::BinaryCrossEntropy,
    }
}

fn run() -> freya::Result<()> {
    let spec = match std::env::args().nth(1) {
        Some(path) => ModelSpec::load_json(&path)?,
        None => xor_spec(),
    };
    let mut model = spec.build()?;

    let inputs = Matrix::from_rows(vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ])?;
    let expected_outputs = Matrix::from_rows(vec![
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![0.0],
    ])?;

    model.train(&inputs, &expected_outputs, 0.5, 2000, spec.loss.as_str(), true)?;

    let outputs = model.predict(&inputs)?;
    for (input, output) in inputs.data.iter().zip(outputs.data.iter()) {
        println!("Input: {:?} -> Output: {:.4}", input, output[0]);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
