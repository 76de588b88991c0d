use std::fmt;

use crate::hyperparams::store::HyperparamError;

/// Operation-scoped failures surfaced at the trainer boundary.
///
/// Collaborator failures are mapped to the kind of the operation that
/// triggered them; the underlying cause is logged, not carried (the two
/// exceptions being the shape-mismatch dimensions and the offending
/// hyperparameter, which callers need to act on).
#[derive(Debug, Clone, PartialEq)]
pub enum TrainerError {
    /// The dataset provider's one-time load failed.
    DatasetLoad,
    /// A fit step or model construction failed during `train()`.
    Training,
    /// Serializing or storing the live model failed.
    ModelSave,
    /// Retrieving or re-compiling a persisted model failed.
    ModelLoad,
    /// Removing a persisted model failed.
    ModelDelete,
    /// No model could be brought up for `predict()`, or its forward pass
    /// failed.
    PredictionNotReady,
    /// The prediction output width does not match the expected batch width.
    ShapeMismatch { expected: usize, actual: usize },
    /// Hyperparameter coercion failed before the operation could start.
    Hyperparam(HyperparamError),
}

impl fmt::Display for TrainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DatasetLoad => write!(f, "Failed to load dataset"),
            Self::Training => write!(f, "An error occurred while training"),
            Self::ModelSave => write!(f, "Failed to save model"),
            Self::ModelLoad => write!(f, "Failed to load model"),
            Self::ModelDelete => write!(f, "Failed to delete model"),
            Self::PredictionNotReady => write!(f, "Failed to initialize model for prediction"),
            Self::ShapeMismatch { expected, actual } => write!(
                f,
                "prediction output width {} does not match expected width {}",
                actual, expected
            ),
            Self::Hyperparam(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TrainerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Hyperparam(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HyperparamError> for TrainerError {
    fn from(e: HyperparamError) -> Self {
        Self::Hyperparam(e)
    }
}
