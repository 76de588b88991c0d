use std::fmt;

use crate::dataset::provider::Batch;
use crate::tensor::Tensor;

#[derive(Debug)]
pub struct ModelError(pub String);

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ModelError {}

/// Metrics produced by one fit step over one batch.
///
/// `loss` is always reported; `accuracy` only when the model computes one
/// (classification models). The `val_*` fields are filled when a validation
/// batch was passed alongside the step.
#[derive(Debug, Clone, Copy)]
pub struct FitMetrics {
    pub loss: f64,
    pub accuracy: Option<f64>,
    pub val_loss: Option<f64>,
    pub val_accuracy: Option<f64>,
}

/// A constructed, compiled model instance: the opaque handle the trainer
/// owns and drives.
///
/// One fit step updates the model's parameters from exactly one batch (an
/// epoch-step, not a pass over the dataset). `predict` runs a forward pass
/// over a block of inputs and returns one output row per input row.
pub trait TrainableModel {
    fn fit_batch(&mut self, batch: &Batch, validation: Option<&Batch>) -> Result<FitMetrics, ModelError>;

    fn predict(&mut self, input: &Tensor) -> Result<Tensor, ModelError>;
}
