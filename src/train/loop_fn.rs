use std::time::Instant;

use log::{debug, info};

use crate::error::{ensure_shape, Error, Result};
use crate::math::matrix::Matrix;
use crate::network::model::Model;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Trains `model` for `config.epochs` epochs on the whole of `inputs`.
///
/// Every row of `inputs` is one sample; `labels` must have the same number of
/// rows. All checks run before the first epoch, so a rejected call leaves
/// the model untouched. Each epoch appends its loss to the model's history.
///
/// # Errors
/// - `InvalidConfig` for a non-positive learning rate, zero epochs or empty data
/// - `EmptyModel` if the model has no layers
/// - `ShapeMismatch` if either matrix has ragged rows or row counts differ,
///   or when a layer or the loss rejects a shape during an epoch (earlier
///   epochs stay applied)
pub fn train_loop(
    model: &mut Model,
    inputs: &Matrix,
    labels: &Matrix,
    config: &TrainConfig,
) -> Result<()> {
    config.validate()?;
    if model.is_empty() {
        return Err(Error::EmptyModel);
    }
    inputs.ensure_rectangular()?;
    labels.ensure_rectangular()?;
    if inputs.is_empty() || labels.is_empty() {
        return Err(Error::InvalidConfig("training data must not be empty".into()));
    }
    ensure_shape("labels vs inputs rows", labels.shape(), (inputs.rows, labels.cols))?;

    info!(
        "training {} layers on {} samples for {} epochs ({}, lr = {})",
        model.len(),
        inputs.rows,
        config.epochs,
        config.loss_type,
        config.learning_rate
    );

    for epoch in 0..config.epochs {
        let t_start = Instant::now();
        let loss = model.run_epoch(inputs, labels, config.learning_rate, config.loss_type)?;
        debug!("epoch {epoch}: loss = {loss}");

        if config.reports_at(epoch) {
            info!("Epoch: {epoch}. Loss: {loss}");

            if let Some(ref tx) = config.progress_tx {
                let stats = EpochStats {
                    epoch,
                    total_epochs: config.epochs,
                    loss,
                    elapsed_ms: t_start.elapsed().as_millis() as u64,
                };
                if tx.send(stats).is_err() {
                    debug!("progress receiver dropped at epoch {epoch}");
                }
            }
        }
    }

    if let Some(last) = model.loss_history().last() {
        info!("training finished, final loss = {last}");
    }

    Ok(())
}
