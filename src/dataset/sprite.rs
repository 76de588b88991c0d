use std::path::PathBuf;

use image::ImageFormat;
use log::debug;

use crate::dataset::memory::SplitDataset;
use crate::dataset::provider::{Batch, Dataset, DatasetError};

/// A grayscale PNG sprite plus a raw label byte file.
///
/// The sprite holds one example per pixel row: a `W x H` image yields `H`
/// examples of `W` features each, pixels normalized to `[0, 1]`. The label
/// file is `H * num_classes` bytes of one-hot rows. This is the source
/// format of the sprited MNIST distribution.
pub struct SpriteDataset {
    image_path: PathBuf,
    labels_path: PathBuf,
    num_classes: usize,
    train_count: usize,
    inner: Option<SplitDataset>,
}

impl SpriteDataset {
    pub fn new(
        image_path: impl Into<PathBuf>,
        labels_path: impl Into<PathBuf>,
        num_classes: usize,
        train_count: usize,
    ) -> SpriteDataset {
        SpriteDataset {
            image_path: image_path.into(),
            labels_path: labels_path.into(),
            num_classes,
            train_count,
            inner: None,
        }
    }

    fn inner_mut(&mut self) -> &mut SplitDataset {
        self.inner
            .as_mut()
            .expect("load() must complete before drawing batches")
    }
}

impl Dataset for SpriteDataset {
    fn load(&mut self) -> Result<(), DatasetError> {
        let png = std::fs::read(&self.image_path)?;
        let sprite = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .map_err(|e| DatasetError(format!("failed to decode sprite PNG: {}", e)))?
            .into_luma8();

        let feature_dim = sprite.width() as usize;
        let count = sprite.height() as usize;
        if count == 0 || feature_dim == 0 {
            return Err(DatasetError("sprite PNG is empty".into()));
        }
        if self.train_count > count {
            return Err(DatasetError(format!(
                "train_count {} exceeds the {} examples in the sprite",
                self.train_count, count
            )));
        }

        // Luma8 raw data is already one byte per pixel, row-major.
        let features: Vec<f64> = sprite.into_raw().iter().map(|&px| px as f64 / 255.0).collect();

        let label_bytes = std::fs::read(&self.labels_path)?;
        let expected_len = count * self.num_classes;
        if label_bytes.len() < expected_len {
            return Err(DatasetError(format!(
                "label file holds {} bytes but {} examples of {} classes need {}",
                label_bytes.len(),
                count,
                self.num_classes,
                expected_len
            )));
        }
        let labels: Vec<f64> = label_bytes[..expected_len].iter().map(|&b| b as f64).collect();

        debug!(
            "sprite dataset ready: {} examples of {} features, {} train",
            count, feature_dim, self.train_count
        );

        let mut inner = SplitDataset::from_flat(
            features,
            labels,
            feature_dim,
            self.num_classes,
            count,
            self.train_count,
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

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes a 4-wide, 6-tall gradient sprite and matching one-hot labels
    /// over 2 classes to the temp directory.
    fn write_fixture() -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir();
        let image_path = dir.join(format!("crucible-sprite-{}.png", std::process::id()));
        let labels_path = dir.join(format!("crucible-labels-{}.bin", std::process::id()));

        let sprite = image::GrayImage::from_fn(4, 6, |x, y| image::Luma([(y * 4 + x) as u8 * 10]));
        sprite.save(&image_path).unwrap();

        let mut labels = Vec::new();
        for i in 0..6u8 {
            labels.extend_from_slice(if i % 2 == 0 { &[1, 0] } else { &[0, 1] });
        }
        std::fs::write(&labels_path, labels).unwrap();

        (image_path, labels_path)
    }

    #[test]
    fn loads_rows_and_one_hot_labels_from_files() {
        let (image_path, labels_path) = write_fixture();
        let mut ds = SpriteDataset::new(&image_path, &labels_path, 2, 4);
        ds.load().unwrap();

        let batch = ds.next_train_batch(4);
        assert_eq!(batch.input.rows, 4);
        assert_eq!(batch.input.cols, 4);
        assert_eq!(batch.expected.cols, 2);
        for i in 0..4 {
            // Each row is a run of 4 consecutive gradient steps, so the label
            // parity can be recovered from the first pixel.
            let first = batch.input.row(i)[0];
            let row = (first * 255.0 / 10.0).round() as usize / 4;
            let expected = if row % 2 == 0 { [1.0, 0.0] } else { [0.0, 1.0] };
            assert_eq!(batch.expected.row(i), &expected);
        }

        std::fs::remove_file(image_path).ok();
        std::fs::remove_file(labels_path).ok();
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let mut ds = SpriteDataset::new("/nonexistent/sprite.png", "/nonexistent/labels.bin", 2, 1);
        assert!(ds.load().is_err());
    }
}
