use std::path::PathBuf;

use log::debug;

use crate::dataset::memory::SplitDataset;
use crate::dataset::provider::{Batch, Dataset, DatasetError};

/// A set of per-class raw binary files of fixed-size examples.
///
/// File `i` holds back-to-back examples of `example_size` bytes, all
/// belonging to class `i`; the label vector is one-hot over the file count.
/// The pool keeps the files' concatenation order and is split 80/20 at load
/// time. This is the source format of the doodle-classification demo data.
pub struct ClassBinDataset {
    paths: Vec<PathBuf>,
    example_size: usize,
    inner: Option<SplitDataset>,
}

impl ClassBinDataset {
    pub fn new(paths: Vec<PathBuf>, example_size: usize) -> ClassBinDataset {
        ClassBinDataset {
            paths,
            example_size,
            inner: None,
        }
    }

    fn inner_mut(&mut self) -> &mut SplitDataset {
        self.inner
            .as_mut()
            .expect("load() must complete before drawing batches")
    }
}

impl Dataset for ClassBinDataset {
    fn load(&mut self) -> Result<(), DatasetError> {
        if self.paths.len() < 2 {
            return Err(DatasetError("need at least two class files".into()));
        }
        if self.example_size == 0 {
            return Err(DatasetError("example_size must be at least 1".into()));
        }

        let num_classes = self.paths.len();
        let mut features: Vec<f64> = Vec::new();
        let mut labels: Vec<f64> = Vec::new();
        let mut total = 0;

        for (class, path) in self.paths.iter().enumerate() {
            let bytes = std::fs::read(path)?;
            if bytes.is_empty() || bytes.len() % self.example_size != 0 {
                return Err(DatasetError(format!(
                    "class file '{}' holds {} bytes, not a positive multiple of example size {}",
                    path.display(),
                    bytes.len(),
                    self.example_size
                )));
            }
            let count = bytes.len() / self.example_size;
            features.extend(bytes.iter().map(|&b| b as f64 / 255.0));
            let mut one_hot = vec![0.0; num_classes];
            one_hot[class] = 1.0;
            for _ in 0..count {
                labels.extend_from_slice(&one_hot);
            }
            total += count;
        }

        let train_count = total * 4 / 5;
        debug!(
            "class-bin dataset ready: {} examples across {} classes, {} train",
            total, num_classes, train_count
        );

        let mut inner = SplitDataset::from_flat(
            features,
            labels,
            self.example_size,
            num_classes,
            total,
            train_count,
        );
        inner.load()?;
        self.inner = Some(inner);
        Ok(())
    }

    fn next_train_batch(&mut self, batch_size: usize) -> Batch {
        self.inner_mut().next_train_batch(batch_size)
    }

    fn next_test_batch(&mut self, batch_size: usize) -> Batch {
        self.inner_mut().next_test_batch(batch_size)
    }
}
