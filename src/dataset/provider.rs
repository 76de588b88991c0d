use std::fmt;

use crate::tensor::Tensor;

/// One group of paired examples.
///
/// Both sides have a leading dimension equal to the requested batch size:
/// `input` is `batch_size × feature_dim`, `expected` is
/// `batch_size × label_dim`.
#[derive(Debug, Clone)]
pub struct Batch {
    pub input: Tensor,
    pub expected: Tensor,
}

#[derive(Debug)]
pub struct DatasetError(pub String);

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for DatasetError {}

impl From<std::io::Error> for DatasetError {
    fn from(e: std::io::Error) -> Self {
        DatasetError(e.to_string())
    }
}

/// Supplies shuffled batches of (input, expected) pairs for training and
/// testing, hiding the data source behind one contract.
///
/// `load()` performs the one-time preparation (file read, decode,
/// shuffle-index construction). It is not guaranteed idempotent; callers
/// must not invoke it concurrently or redundantly — the trainer's
/// `loaded`/`loading` guards take care of that.
///
/// Batches are drawn through a pre-shuffled cyclic index cursor per
/// partition: repeated calls make a full pass over the partition in a fixed
/// shuffled order, then wrap and repeat the same order. The order is *not*
/// reshuffled across wraps; the contract only guarantees a full pass before
/// repetition.
pub trait Dataset {
    fn load(&mut self) -> Result<(), DatasetError>;

    /// Draws `batch_size` examples from the training partition.
    ///
    /// # Panics
    /// Implementations may panic if `load()` has not completed successfully
    /// or if `batch_size` is zero.
    fn next_train_batch(&mut self, batch_size: usize) -> Batch;

    /// Draws `batch_size` examples from the held-out partition,
    /// on an independent cursor.
    fn next_test_batch(&mut self, batch_size: usize) -> Batch;
}
