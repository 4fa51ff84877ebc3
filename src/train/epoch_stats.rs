use serde::{Serialize, Deserialize};

/// One progress report emitted by `train_loop`.
///
/// Sent on `TrainConfig::progress_tx` at the same epochs the verbose log
/// line is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 0-based epoch index.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Loss recorded for this epoch.
    pub loss: f64,
    /// Wall-clock duration of this epoch in milliseconds.
    pub elapsed_ms: u64,
}
