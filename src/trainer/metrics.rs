use serde::{Deserialize, Serialize};

/// One point of a metric series.
///
/// `step` is the global step counter, strictly increasing across `train()`
/// invocations and reset only by an explicit model reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub step: u64,
    pub value: f64,
}

/// Per-step training statistics published on the progress channel.
///
/// When a `progress_tx` channel is configured, one `StepStats` value is sent
/// at the end of every completed step. Receivers (live charts, log sinks)
/// use this to follow a run in real time without polling trainer state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepStats {
    /// Global step counter value for this step.
    pub step: u64,
    /// 0-based step index within the current run.
    pub batch: usize,
    /// Total steps requested for this run.
    pub total_batches: usize,
    /// Training loss of this step.
    pub loss: f64,
    /// Training accuracy in [0, 1], when the model reports one.
    pub accuracy: Option<f64>,
    /// Validation loss, on steps that carried a validation batch.
    pub val_loss: Option<f64>,
    /// Validation accuracy, when available.
    pub val_accuracy: Option<f64>,
    /// Wall-clock duration of this single step in milliseconds.
    pub elapsed_ms: u64,
}
