use std::sync::mpsc;

use crate::error::{Error, Result};
use crate::loss::loss_type::LossType;
use crate::train::epoch_stats::EpochStats;

/// Verbose runs report every `PROGRESS_INTERVAL` epochs, starting at epoch 0.
pub const PROGRESS_INTERVAL: usize = 50;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `learning_rate` — SGD step size; finite and positive
/// - `epochs`        — number of full passes over the training data; at least 1
/// - `loss_type`     — which loss function to train against
/// - `verbose`       — log a progress line every `PROGRESS_INTERVAL` epochs
/// - `progress_tx`   — optional channel that receives one `EpochStats` per
///                     progress report. Reports are only produced when
///                     `verbose` is set. A dropped receiver does not stop
///                     training.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub epochs: usize,
    pub loss_type: LossType,
    pub verbose: bool,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

impl TrainConfig {
    /// Creates a quiet `TrainConfig` with no progress channel.
    pub fn new(learning_rate: f64, epochs: usize, loss_type: LossType) -> Self {
        TrainConfig {
            learning_rate,
            epochs,
            loss_type,
            verbose: false,
            progress_tx: None,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be at least 1".into()));
        }
        Ok(())
    }

    /// Whether `epoch` (0-based) gets a progress report under this config.
    /// This gates both the `Epoch: {epoch}. Loss: {loss}` log line and the
    /// `EpochStats` sent on `progress_tx`.
    pub fn reports_at(&self, epoch: usize) -> bool {
        self.verbose && epoch % PROGRESS_INTERVAL == 0
    }
}
