use rand::seq::SliceRandom;

use crate::dataset::provider::{Batch, Dataset, DatasetError};
use crate::tensor::Tensor;

/// An in-memory example pool split once into train / held-out partitions,
/// served through one pre-shuffled cyclic cursor per partition.
///
/// The split point is fixed at construction (a validation percentage or an
/// explicit train count); `load()` builds the shuffled index orders. Each
/// partition is visited in full, in its fixed shuffled order, before the
/// cursor wraps and the same order repeats.
pub struct SplitDataset {
    features: Vec<f64>,
    labels: Vec<f64>,
    feature_dim: usize,
    label_dim: usize,
    train_count: usize,
    test_count: usize,
    train_indices: Vec<usize>,
    test_indices: Vec<usize>,
    train_cursor: usize,
    test_cursor: usize,
    loaded: bool,
}

impl SplitDataset {
    /// Builds a dataset from one `Vec<f64>` per example, holding back
    /// `val_split_pct` percent of the pool (taken from the end) as the
    /// held-out partition.
    ///
    /// # Panics
    /// Panics if `inputs` is empty, the two sides differ in length, rows are
    /// ragged, or `val_split_pct > 100`.
    pub fn from_rows(inputs: Vec<Vec<f64>>, labels: Vec<Vec<f64>>, val_split_pct: u8) -> SplitDataset {
        assert!(val_split_pct <= 100, "val_split_pct must be at most 100");
        let total = inputs.len();
        let val_count = (total * val_split_pct as usize) / 100;
        Self::with_train_count(inputs, labels, total - val_count)
    }

    /// Builds a dataset with an explicit train partition size; the remaining
    /// examples form the held-out partition.
    ///
    /// # Panics
    /// Panics if `inputs` is empty, the two sides differ in length, rows are
    /// ragged, or `train_count` exceeds the pool size.
    pub fn with_train_count(
        inputs: Vec<Vec<f64>>,
        labels: Vec<Vec<f64>>,
        train_count: usize,
    ) -> SplitDataset {
        assert!(!inputs.is_empty(), "dataset must contain at least one example");
        assert_eq!(inputs.len(), labels.len(), "inputs and labels must have equal length");

        let feature_dim = inputs[0].len();
        let label_dim = labels[0].len();
        let mut features = Vec::with_capacity(inputs.len() * feature_dim);
        let mut label_buf = Vec::with_capacity(labels.len() * label_dim);
        for (row, label) in inputs.iter().zip(labels.iter()) {
            assert_eq!(row.len(), feature_dim, "all input rows must have the same width");
            assert_eq!(label.len(), label_dim, "all label rows must have the same width");
            features.extend_from_slice(row);
            label_buf.extend_from_slice(label);
        }

        Self::from_flat(features, label_buf, feature_dim, label_dim, inputs.len(), train_count)
    }

    /// Builds a dataset from flat row-major buffers (the form file loaders
    /// produce naturally).
    ///
    /// # Panics
    /// Panics on buffer/shape mismatches or `train_count > total`.
    pub fn from_flat(
        features: Vec<f64>,
        labels: Vec<f64>,
        feature_dim: usize,
        label_dim: usize,
        total: usize,
        train_count: usize,
    ) -> SplitDataset {
        assert_eq!(features.len(), total * feature_dim, "feature buffer has the wrong length");
        assert_eq!(labels.len(), total * label_dim, "label buffer has the wrong length");
        assert!(train_count <= total, "train_count exceeds the pool size");

        SplitDataset {
            features,
            labels,
            feature_dim,
            label_dim,
            train_count,
            test_count: total - train_count,
            train_indices: Vec::new(),
            test_indices: Vec::new(),
            train_cursor: 0,
            test_cursor: 0,
            loaded: false,
        }
    }

    pub fn train_len(&self) -> usize {
        self.train_count
    }

    pub fn test_len(&self) -> usize {
        self.test_count
    }

    pub fn feature_dim(&self) -> usize {
        self.feature_dim
    }

    pub fn label_dim(&self) -> usize {
        self.label_dim
    }

    /// Advances a cyclic cursor and returns the index it lands on.
    fn draw(indices: &[usize], cursor: &mut usize) -> usize {
        *cursor = (*cursor + 1) % indices.len();
        indices[*cursor]
    }

    /// Copies `batch_size` rows, chosen by the cursor, into a fresh batch.
    /// `row_offset` shifts partition-relative indices to pool rows.
    fn next_batch(&mut self, batch_size: usize, train: bool) -> Batch {
        assert!(self.loaded, "load() must complete before drawing batches");
        assert!(batch_size > 0, "batch_size must be at least 1");

        let (indices, cursor, row_offset) = if train {
            (&self.train_indices, &mut self.train_cursor, 0)
        } else {
            (&self.test_indices, &mut self.test_cursor, self.train_count)
        };
        assert!(!indices.is_empty(), "requested partition is empty");

        let mut input = Tensor::zeros(batch_size, self.feature_dim);
        let mut expected = Tensor::zeros(batch_size, self.label_dim);
        for i in 0..batch_size {
            let row = row_offset + Self::draw(indices, cursor);
            input
                .row_mut(i)
                .copy_from_slice(&self.features[row * self.feature_dim..(row + 1) * self.feature_dim]);
            expected
                .row_mut(i)
                .copy_from_slice(&self.labels[row * self.label_dim..(row + 1) * self.label_dim]);
        }

        Batch { input, expected }
    }
}

impl Dataset for SplitDataset {
    fn load(&mut self) -> Result<(), DatasetError> {
        let mut rng = rand::thread_rng();

        self.train_indices = (0..self.train_count).collect();
        self.train_indices.shuffle(&mut rng);
        self.test_indices = (0..self.test_count).collect();
        self.test_indices.shuffle(&mut rng);

        self.train_cursor = 0;
        self.test_cursor = 0;
        self.loaded = true;
        Ok(())
    }

    fn next_train_batch(&mut self, batch_size: usize) -> Batch {
        self.next_batch(batch_size, true)
    }

    fn next_test_batch(&mut self, batch_size: usize) -> Batch {
        self.next_batch(batch_size, false)
    }
}
