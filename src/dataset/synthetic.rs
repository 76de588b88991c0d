use rand::Rng;

use crate::dataset::memory::SplitDataset;
use crate::dataset::provider::{Batch, Dataset, DatasetError};
use crate::tensor::Tensor;

/// Generates XOR gate examples on demand.
///
/// Each drawn example is a fresh random bit pair `(a, b)` with expected
/// output `a ^ b`; there is no fixed pool, so the train and test "partitions"
/// are the same distribution and `load()` has nothing to prepare.
pub struct XorDataset;

impl XorDataset {
    pub fn new() -> XorDataset {
        XorDataset
    }

    fn batch(&self, batch_size: usize) -> Batch {
        assert!(batch_size > 0, "batch_size must be at least 1");
        let mut rng = rand::thread_rng();

        let mut input = Tensor::zeros(batch_size, 2);
        let mut expected = Tensor::zeros(batch_size, 1);
        for i in 0..batch_size {
            let a = rng.gen_bool(0.5) as u8;
            let b = rng.gen_bool(0.5) as u8;
            input.row_mut(i).copy_from_slice(&[a as f64, b as f64]);
            expected.row_mut(i)[0] = (a ^ b) as f64;
        }

        Batch { input, expected }
    }
}

impl Default for XorDataset {
    fn default() -> Self {
        XorDataset::new()
    }
}

impl Dataset for XorDataset {
    fn load(&mut self) -> Result<(), DatasetError> {
        Ok(())
    }

    fn next_train_batch(&mut self, batch_size: usize) -> Batch {
        self.batch(batch_size)
    }

    fn next_test_batch(&mut self, batch_size: usize) -> Batch {
        self.batch(batch_size)
    }
}

/// Generates `n` samples of 2-D "two circles" data (class 0 = inner ring,
/// class 1 = outer ring), one-hot labels, coordinates normalized to [0, 1].
pub fn circles(n: usize, val_split_pct: u8) -> SplitDataset {
    let mut rng = rand::thread_rng();
    let mut inputs = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let class = i % 2;
        let radius = if class == 0 { 0.3 } else { 0.8 };
        let angle: f64 = rng.gen::<f64>() * 2.0 * std::f64::consts::PI;
        let noise: f64 = rng.gen::<f64>() * 0.1 - 0.05;
        let x = (radius + noise) * angle.cos();
        let y = (radius + noise) * angle.sin();
        inputs.push(vec![(x + 1.0) / 2.0, (y + 1.0) / 2.0]);
        let mut one_hot = vec![0.0, 0.0];
        one_hot[class] = 1.0;
        labels.push(one_hot);
    }
    SplitDataset::from_rows(inputs, labels, val_split_pct)
}

/// Generates `n` samples of 2-D "two blobs" data around fixed centers,
/// one-hot labels.
pub fn blobs(n: usize, val_split_pct: u8) -> SplitDataset {
    let centers = [(0.3f64, 0.3f64), (0.7f64, 0.7f64)];
    let mut rng = rand::thread_rng();
    let mut inputs = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let class = i % 2;
        let (cx, cy) = centers[class];
        let angle: f64 = rng.gen::<f64>() * 2.0 * std::f64::consts::PI;
        let r: f64 = rng.gen::<f64>() * 0.12;
        let x = (cx + r * angle.cos()).clamp(0.0, 1.0);
        let y = (cy + r * angle.sin()).clamp(0.0, 1.0);
        inputs.push(vec![x, y]);
        let mut one_hot = vec![0.0, 0.0];
        one_hot[class] = 1.0;
        labels.push(one_hot);
    }
    SplitDataset::from_rows(inputs, labels, val_split_pct)
}
