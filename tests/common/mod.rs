#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crucible_nn::{
    Batch, Dataset, DatasetError, FitMetrics, HyperparamSpec, HyperparamValues, ModelDefinition,
    ModelError, Tensor, TrainableModel,
};

/// A one-layer linear model trained with mean-squared error and plain SGD.
///
/// Weights start at zero, so behavior is fully deterministic. The learning
/// rate is training configuration: it is skipped during serialization and
/// must be re-attached through `compile`, like a real optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub in_dim: usize,
    pub out_dim: usize,
    /// `out_dim x in_dim`, row-major.
    pub weights: Vec<f64>,
    pub bias: Vec<f64>,
    #[serde(skip)]
    pub learning_rate: f64,
}

impl LinearModel {
    pub fn new(in_dim: usize, out_dim: usize, learning_rate: f64) -> LinearModel {
        LinearModel {
            in_dim,
            out_dim,
            weights: vec![0.0; in_dim * out_dim],
            bias: vec![0.0; out_dim],
            learning_rate,
        }
    }

    fn forward_row(&self, x: &[f64], out: &mut [f64]) {
        for j in 0..self.out_dim {
            let mut acc = self.bias[j];
            for i in 0..self.in_dim {
                acc += self.weights[j * self.in_dim + i] * x[i];
            }
            out[j] = acc;
        }
    }

    fn check_shapes(&self, batch: &Batch) -> Result<(), ModelError> {
        if batch.input.cols != self.in_dim {
            return Err(ModelError(format!(
                "input width {} does not match model input {}",
                batch.input.cols, self.in_dim
            )));
        }
        if batch.expected.cols != self.out_dim {
            return Err(ModelError(format!(
                "label width {} does not match model output {}",
                batch.expected.cols, self.out_dim
            )));
        }
        Ok(())
    }

    /// Mean squared error and (for multi-output models) argmax accuracy.
    fn eval(&self, batch: &Batch) -> (f64, Option<f64>) {
        let n = batch.input.rows;
        let mut out = vec![0.0; self.out_dim];
        let mut total = 0.0;
        let mut correct = 0usize;
        for r in 0..n {
            self.forward_row(batch.input.row(r), &mut out);
            let t = batch.expected.row(r);
            for j in 0..self.out_dim {
                let e = out[j] - t[j];
                total += e * e;
            }
            if argmax(&out) == argmax(t) {
                correct += 1;
            }
        }
        let loss = total / (n * self.out_dim) as f64;
        let accuracy = (self.out_dim >= 2).then(|| correct as f64 / n as f64);
        (loss, accuracy)
    }
}

impl TrainableModel for LinearModel {
    fn fit_batch(&mut self, batch: &Batch, validation: Option<&Batch>) -> Result<FitMetrics, ModelError> {
        self.check_shapes(batch)?;

        let n = batch.input.rows;
        let mut w_grad = vec![0.0; self.weights.len()];
        let mut b_grad = vec![0.0; self.bias.len()];
        let mut out = vec![0.0; self.out_dim];
        let mut total = 0.0;

        for r in 0..n {
            let x = batch.input.row(r);
            let t = batch.expected.row(r);
            self.forward_row(x, &mut out);
            for j in 0..self.out_dim {
                let e = out[j] - t[j];
                total += e * e;
                b_grad[j] += e;
                for i in 0..self.in_dim {
                    w_grad[j * self.in_dim + i] += e * x[i];
                }
            }
        }

        let scale = 2.0 * self.learning_rate / n as f64;
        for (w, g) in self.weights.iter_mut().zip(&w_grad) {
            *w -= scale * g;
        }
        for (b, g) in self.bias.iter_mut().zip(&b_grad) {
            *b -= scale * g;
        }

        let loss = total / (n * self.out_dim) as f64;
        let accuracy = (self.out_dim >= 2).then(|| self.eval(batch).1).flatten();
        let (val_loss, val_accuracy) = match validation {
            Some(v) => {
                self.check_shapes(v)?;
                let (l, a) = self.eval(v);
                (Some(l), a)
            }
            None => (None, None),
        };

        Ok(FitMetrics {
            loss,
            accuracy,
            val_loss,
            val_accuracy,
        })
    }

    fn predict(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        if input.cols != self.in_dim {
            return Err(ModelError(format!(
                "input width {} does not match model input {}",
                input.cols, self.in_dim
            )));
        }
        let mut output = Tensor::zeros(input.rows, self.out_dim);
        let mut out = vec![0.0; self.out_dim];
        for r in 0..input.rows {
            self.forward_row(input.row(r), &mut out);
            output.row_mut(r).copy_from_slice(&out);
        }
        Ok(output)
    }
}

fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub struct LinearModelDef {
    pub in_dim: usize,
    pub out_dim: usize,
}

impl ModelDefinition for LinearModelDef {
    type Handle = LinearModel;

    fn label(&self) -> &str {
        "linear-mse"
    }

    fn config(&self) -> Vec<HyperparamSpec> {
        vec![HyperparamSpec::number("learning_rate", "Learning Rate", 0.1)]
    }

    fn create_and_compile(&self, values: &HyperparamValues) -> Result<LinearModel, ModelError> {
        let lr = values
            .number("learning_rate")
            .ok_or_else(|| ModelError("learning_rate is not declared".into()))?;
        Ok(LinearModel::new(self.in_dim, self.out_dim, lr))
    }

    fn compile(&self, handle: &mut LinearModel, values: &HyperparamValues) -> Result<(), ModelError> {
        handle.learning_rate = values
            .number("learning_rate")
            .ok_or_else(|| ModelError("learning_rate is not declared".into()))?;
        Ok(())
    }
}

/// Deterministic fixture dataset: row `i` of every batch is a fixed function
/// of `i`, so repeated draws are identical and predictions are comparable
/// across save/load.
pub struct ConstDataset {
    in_dim: usize,
    out_dim: usize,
    loads: Arc<AtomicUsize>,
}

impl ConstDataset {
    pub fn new(in_dim: usize, out_dim: usize) -> ConstDataset {
        Self::with_counter(in_dim, out_dim, Arc::new(AtomicUsize::new(0)))
    }

    pub fn with_counter(in_dim: usize, out_dim: usize, loads: Arc<AtomicUsize>) -> ConstDataset {
        ConstDataset {
            in_dim,
            out_dim,
            loads,
        }
    }

    fn batch(&self, batch_size: usize) -> Batch {
        let mut input = Tensor::zeros(batch_size, self.in_dim);
        let mut expected = Tensor::zeros(batch_size, self.out_dim);
        for i in 0..batch_size {
            for k in 0..self.in_dim {
                input.row_mut(i)[k] = ((i + k) % 5) as f64 * 0.2;
            }
            if self.out_dim == 1 {
                expected.row_mut(i)[0] = (i % 2) as f64;
            } else {
                expected.row_mut(i)[i % self.out_dim] = 1.0;
            }
        }
        Batch { input, expected }
    }
}

impl Dataset for ConstDataset {
    fn load(&mut self) -> Result<(), DatasetError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn next_train_batch(&mut self, batch_size: usize) -> Batch {
        self.batch(batch_size)
    }

    fn next_test_batch(&mut self, batch_size: usize) -> Batch {
        self.batch(batch_size)
    }
}

/// A dataset whose load always fails.
pub struct FailingDataset;

impl Dataset for FailingDataset {
    fn load(&mut self) -> Result<(), DatasetError> {
        Err(DatasetError("synthetic load failure".into()))
    }

    fn next_train_batch(&mut self, _batch_size: usize) -> Batch {
        unreachable!("batches are never drawn from a failed dataset")
    }

    fn next_test_batch(&mut self, _batch_size: usize) -> Batch {
        unreachable!("batches are never drawn from a failed dataset")
    }
}

/// A model whose every fit step fails.
#[derive(Debug, Clone)]
pub struct ExplodingModel;

impl TrainableModel for ExplodingModel {
    fn fit_batch(&mut self, _batch: &Batch, _validation: Option<&Batch>) -> Result<FitMetrics, ModelError> {
        Err(ModelError("fit step exploded".into()))
    }

    fn predict(&mut self, _input: &Tensor) -> Result<Tensor, ModelError> {
        Err(ModelError("forward pass exploded".into()))
    }
}

pub struct ExplodingDef;

impl ModelDefinition for ExplodingDef {
    type Handle = ExplodingModel;

    fn label(&self) -> &str {
        "exploding"
    }

    fn config(&self) -> Vec<HyperparamSpec> {
        Vec::new()
    }

    fn create_and_compile(&self, _values: &HyperparamValues) -> Result<ExplodingModel, ModelError> {
        Ok(ExplodingModel)
    }

    fn compile(&self, _handle: &mut ExplodingModel, _values: &HyperparamValues) -> Result<(), ModelError> {
        Ok(())
    }
}
