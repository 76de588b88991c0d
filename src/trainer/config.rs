use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};

use crate::trainer::metrics::StepStats;

/// Operator-facing configuration for training runs.
///
/// # Fields
/// - `batches`         — steps per `train()` invocation
/// - `batch_size`      — examples drawn per training step
/// - `test_batch_size` — examples drawn per validation batch
/// - `test_frequency`  — a validation batch rides along every N-th step
/// - `progress_tx`     — optional channel sender; one `StepStats` is sent per
///                       completed step. If the receiver is dropped the run
///                       terminates early (clean shutdown).
/// - `stop_flag`       — optional atomic flag; when set to `true` from
///                       another thread the run terminates before the next
///                       step.
///
/// Passed in explicitly; there is no process-wide default state.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub batches: usize,
    pub batch_size: usize,
    pub test_batch_size: usize,
    pub test_frequency: usize,
    pub progress_tx: Option<mpsc::Sender<StepStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            batches: 100,
            batch_size: 64,
            test_batch_size: 1000,
            test_frequency: 100,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
