/// A minimal row-major 2-D block of `f64` values.
///
/// This is the interchange type between dataset providers, trainable models,
/// and the trainer: batches of examples travel as one `Tensor` per side
/// (input / expected), with the leading dimension equal to the batch size.
/// It deliberately carries no linear algebra — models bring their own.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f64>,
}

impl Tensor {
    pub fn zeros(rows: usize, cols: usize) -> Tensor {
        Tensor {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a tensor from one `Vec<f64>` per row.
    ///
    /// # Panics
    /// Panics if the rows do not all have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Tensor {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in &rows {
            assert_eq!(row.len(), cols, "all rows must have the same length");
            data.extend_from_slice(row);
        }
        Tensor {
            rows: rows.len(),
            cols,
            data,
        }
    }

    /// Wraps an existing flat row-major buffer.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn from_flat(rows: usize, cols: usize, data: Vec<f64>) -> Tensor {
        assert_eq!(data.len(), rows * cols, "buffer length must be rows * cols");
        Tensor { rows, cols, data }
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_builds_row_major_block() {
        let t = Tensor::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(t.rows, 2);
        assert_eq!(t.cols, 2);
        assert_eq!(t.row(0), &[1.0, 2.0]);
        assert_eq!(t.row(1), &[3.0, 4.0]);
        assert_eq!(t.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn zeros_has_requested_shape() {
        let t = Tensor::zeros(3, 4);
        assert_eq!(t.rows, 3);
        assert_eq!(t.cols, 4);
        assert!(t.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn row_mut_writes_in_place() {
        let mut t = Tensor::zeros(2, 2);
        t.row_mut(1).copy_from_slice(&[5.0, 6.0]);
        assert_eq!(t.row(0), &[0.0, 0.0]);
        assert_eq!(t.row(1), &[5.0, 6.0]);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn from_rows_rejects_ragged_input() {
        Tensor::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
    }
}
