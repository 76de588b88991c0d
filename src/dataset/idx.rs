//! IDX binary loading (MNIST and its derivatives).
//!
//! IDX3 image files: 4 reserved/dtype/rank bytes (`00 00 08 03`), then three
//! big-endian u32 dimensions (count, rows, cols), then `count * rows * cols`
//! uint8 pixels, row-major. IDX1 label files: `00 00 08 01`, one big-endian
//! u32 count, then `count` uint8 class indices.

use std::path::Path;

use crate::dataset::memory::SplitDataset;
use crate::dataset::provider::DatasetError;

/// Decodes an IDX3 image file and its IDX1 label file into flat buffers:
/// pixels divided by 255.0, labels one-hot over `n_classes`.
///
/// Returns `(features, labels, feature_dim, count)`.
pub fn parse_idx_pair(
    image_bytes: &[u8],
    label_bytes: &[u8],
    n_classes: usize,
) -> Result<(Vec<f64>, Vec<f64>, usize, usize), DatasetError> {
    if n_classes < 2 {
        return Err(DatasetError(format!("n_classes must be at least 2, got {}", n_classes)));
    }

    check_magic(image_bytes, 3, "image")?;
    check_magic(label_bytes, 1, "label")?;

    let count = read_be_u32(image_bytes, 4) as usize;
    let rows = read_be_u32(image_bytes, 8) as usize;
    let cols = read_be_u32(image_bytes, 12) as usize;
    let feature_dim = rows
        .checked_mul(cols)
        .ok_or_else(|| DatasetError("IDX image dimensions overflow".into()))?;

    let pixel_bytes = count
        .checked_mul(feature_dim)
        .ok_or_else(|| DatasetError("IDX image payload size overflows".into()))?;
    if image_bytes.len() < 16 + pixel_bytes {
        return Err(DatasetError(format!(
            "IDX image file truncated: header declares {} items of {}x{} pixels but the file holds {} bytes",
            count,
            rows,
            cols,
            image_bytes.len()
        )));
    }

    let label_count = read_be_u32(label_bytes, 4) as usize;
    if label_count != count {
        return Err(DatasetError(format!(
            "IDX pair mismatch: {} images but {} labels",
            count, label_count
        )));
    }
    if label_bytes.len() < 8 + count {
        return Err(DatasetError(format!(
            "IDX label file truncated: header declares {} labels but the file holds {} bytes",
            count,
            label_bytes.len()
        )));
    }

    let features: Vec<f64> = image_bytes[16..16 + pixel_bytes]
        .iter()
        .map(|&px| px as f64 / 255.0)
        .collect();

    let mut labels = vec![0.0; count * n_classes];
    for (i, &class) in label_bytes[8..8 + count].iter().enumerate() {
        let class = class as usize;
        if class >= n_classes {
            return Err(DatasetError(format!(
                "IDX label {}: class index {} is out of range for {} classes",
                i, class, n_classes
            )));
        }
        labels[i * n_classes + class] = 1.0;
    }

    Ok((features, labels, feature_dim, count))
}

/// Reads an IDX pair from disk into a [`SplitDataset`] with an explicit
/// train partition size.
pub fn from_idx_files(
    image_path: impl AsRef<Path>,
    label_path: impl AsRef<Path>,
    n_classes: usize,
    train_count: usize,
) -> Result<SplitDataset, DatasetError> {
    let image_bytes = std::fs::read(image_path)?;
    let label_bytes = std::fs::read(label_path)?;
    let (features, labels, feature_dim, count) =
        parse_idx_pair(&image_bytes, &label_bytes, n_classes)?;
    if train_count > count {
        return Err(DatasetError(format!(
            "train_count {} exceeds the {} examples in the IDX pair",
            train_count, count
        )));
    }
    Ok(SplitDataset::from_flat(
        features,
        labels,
        feature_dim,
        n_classes,
        count,
        train_count,
    ))
}

/// Validates the four-byte IDX prefix: reserved zeros, uint8 dtype, and the
/// expected rank.
fn check_magic(bytes: &[u8], rank: u8, kind: &str) -> Result<(), DatasetError> {
    let header_len = 4 + 4 * rank as usize;
    if bytes.len() < header_len {
        return Err(DatasetError(format!(
            "IDX {} file too short: need at least {} header bytes, got {}",
            kind,
            header_len,
            bytes.len()
        )));
    }
    if bytes[0] != 0 || bytes[1] != 0 {
        return Err(DatasetError(format!(
            "IDX {} file: reserved bytes must be zero, got 0x{:02X} 0x{:02X}",
            kind, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(DatasetError(format!(
            "IDX {} file: dtype must be 0x08 (uint8), got 0x{:02X}",
            kind, bytes[2]
        )));
    }
    if bytes[3] != rank {
        return Err(DatasetError(format!(
            "IDX {} file: expected rank {}, got {}",
            kind, rank, bytes[3]
        )));
    }
    Ok(())
}

fn read_be_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}
