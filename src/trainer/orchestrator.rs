use std::sync::atomic::Ordering;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::dataset::provider::Dataset;
use crate::hyperparams::store::HyperparamStore;
use crate::model::definition::ModelDefinition;
use crate::model::trainable::TrainableModel;
use crate::persist::store::ModelStore;
use crate::trainer::config::TrainerConfig;
use crate::trainer::error::TrainerError;
use crate::trainer::metrics::{MetricSample, StepStats};

/// `predict()` always draws this many held-out examples.
const PREDICT_BATCH: usize = 20;

/// One per-example prediction triple, sliced out of a forward pass for
/// display. Never fed back into training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub input: Vec<f64>,
    pub output: Vec<f64>,
    pub expected: Vec<f64>,
}

/// A serializable snapshot of everything a presentation layer renders.
///
/// Consumers take a fresh snapshot after each trainer call (or follow live
/// runs through the progress channel); nothing here aliases trainer-owned
/// state.
#[derive(Debug, Clone, Serialize)]
pub struct RunState {
    pub error: Option<String>,
    pub loading_dataset: bool,
    pub loaded_dataset: bool,
    pub training: bool,
    pub has_model: bool,
    pub iteration: u64,
    pub loss: Vec<MetricSample>,
    pub accuracy: Vec<MetricSample>,
    pub saved_models: Vec<String>,
    pub predictions: Vec<Prediction>,
}

/// The training/prediction orchestrator.
///
/// Owns one model definition, one dataset provider, one persistence backend,
/// the hyperparameter store, and all mutable run state — including the at
/// most one live model handle, which no external actor may touch. Every
/// operation takes `&mut self`, so a shared trainer sits behind one
/// `Arc<Mutex<_>>` and all operations serialize; the `training` /
/// `loading_dataset` guards additionally make redundant same-operation calls
/// successful no-ops instead of queued repeats.
///
/// Collaborator failures are mapped to operation-scoped [`TrainerError`]
/// kinds, mirrored into the observable state, and logged with their cause.
/// The guards are cleared on every path, success or failure.
pub struct Trainer<M: ModelDefinition> {
    definition: M,
    dataset: Box<dyn Dataset>,
    store: Box<dyn ModelStore<M::Handle>>,
    pub config: TrainerConfig,
    hyperparams: HyperparamStore,
    model: Option<M::Handle>,
    iteration: u64,
    loading_dataset: bool,
    loaded_dataset: bool,
    training: bool,
    loss: Vec<MetricSample>,
    accuracy: Vec<MetricSample>,
    saved_models: Vec<String>,
    predictions: Vec<Prediction>,
    last_error: Option<TrainerError>,
}

impl<M: ModelDefinition> Trainer<M> {
    pub fn new(
        definition: M,
        dataset: Box<dyn Dataset>,
        store: Box<dyn ModelStore<M::Handle>>,
    ) -> Trainer<M> {
        Self::with_config(definition, dataset, store, TrainerConfig::default())
    }

    pub fn with_config(
        definition: M,
        dataset: Box<dyn Dataset>,
        store: Box<dyn ModelStore<M::Handle>>,
        config: TrainerConfig,
    ) -> Trainer<M> {
        let hyperparams = HyperparamStore::new(definition.config());
        Trainer {
            definition,
            dataset,
            store,
            config,
            hyperparams,
            model: None,
            iteration: 0,
            loading_dataset: false,
            loaded_dataset: false,
            training: false,
            loss: Vec::new(),
            accuracy: Vec::new(),
            saved_models: Vec::new(),
            predictions: Vec::new(),
            last_error: None,
        }
    }

    // ── Observable state ─────────────────────────────────────────────────

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn loss(&self) -> &[MetricSample] {
        &self.loss
    }

    pub fn accuracy(&self) -> &[MetricSample] {
        &self.accuracy
    }

    pub fn saved_models(&self) -> &[String] {
        &self.saved_models
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn last_error(&self) -> Option<&TrainerError> {
        self.last_error.as_ref()
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    pub fn is_loading_dataset(&self) -> bool {
        self.loading_dataset
    }

    pub fn dataset_loaded(&self) -> bool {
        self.loaded_dataset
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn hyperparams(&self) -> &HyperparamStore {
        &self.hyperparams
    }

    /// Overwrites one hyperparameter's string form (no validation; coercion
    /// happens when an operation reads the values).
    pub fn set_hyperparam(&mut self, name: &str, value: impl Into<String>) {
        self.hyperparams.set_value(name, value);
    }

    pub fn snapshot(&self) -> RunState {
        RunState {
            error: self.last_error.as_ref().map(|e| e.to_string()),
            loading_dataset: self.loading_dataset,
            loaded_dataset: self.loaded_dataset,
            training: self.training,
            has_model: self.model.is_some(),
            iteration: self.iteration,
            loss: self.loss.clone(),
            accuracy: self.accuracy.clone(),
            saved_models: self.saved_models.clone(),
            predictions: self.predictions.clone(),
        }
    }

    // ── Operations ───────────────────────────────────────────────────────

    /// Runs the dataset provider's one-time load.
    ///
    /// The saved-model list is refreshed from the backend on every call,
    /// even when the dataset itself is already resident. A call while
    /// loading or already loaded is a successful no-op.
    pub fn load_dataset(&mut self) -> Result<(), TrainerError> {
        match self.store.list() {
            Ok(names) => self.saved_models = names,
            Err(err) => {
                error!("listing saved models failed: {}", err);
                return self.fail(TrainerError::DatasetLoad);
            }
        }

        if self.loaded_dataset || self.loading_dataset {
            return Ok(());
        }

        self.last_error = None;
        self.loading_dataset = true;
        let result = self.dataset.load();
        self.loading_dataset = false;

        match result {
            Ok(()) => {
                self.loaded_dataset = true;
                Ok(())
            }
            Err(err) => {
                error!("dataset load failed: {}", err);
                self.fail(TrainerError::DatasetLoad)
            }
        }
    }

    /// Runs `config.batches` sequential fit steps.
    ///
    /// Constructs a model from the current hyperparameter values if none is
    /// live. Step `i` draws one training batch; every `test_frequency`-th
    /// step also draws a validation batch that rides along the fit call.
    /// Finite loss and accuracy values are appended to the metric series at
    /// global steps that continue across invocations. A call while a run is
    /// already in flight returns successfully without training again.
    ///
    /// Between steps the run yields: it publishes `StepStats` on the
    /// progress channel (stopping cleanly if the receiver is gone) and
    /// checks the cancellation flag.
    pub fn train(&mut self) -> Result<(), TrainerError> {
        if self.training {
            return Ok(());
        }

        self.last_error = None;
        self.training = true;
        let result = self.run_steps();
        self.training = false;

        if let Err(err) = &result {
            self.last_error = Some(err.clone());
        }
        result
    }

    fn run_steps(&mut self) -> Result<(), TrainerError> {
        self.ensure_model(TrainerError::Training)?;

        let batches = self.config.batches;
        let batch_size = self.config.batch_size;
        let test_batch_size = self.config.test_batch_size;
        let test_frequency = self.config.test_frequency.max(1);

        let mut completed: u64 = 0;
        for i in 0..batches {
            if let Some(flag) = &self.config.stop_flag {
                if flag.load(Ordering::Relaxed) {
                    break;
                }
            }

            let t_start = Instant::now();
            let batch = self.dataset.next_train_batch(batch_size);
            let validation = if i % test_frequency == 0 {
                Some(self.dataset.next_test_batch(test_batch_size))
            } else {
                None
            };

            let metrics = {
                let model = match self.model.as_mut() {
                    Some(m) => m,
                    None => return Err(TrainerError::Training),
                };
                match model.fit_batch(&batch, validation.as_ref()) {
                    Ok(m) => m,
                    Err(err) => {
                        error!("fit step {} failed: {}", i, err);
                        // Keep the steps already recorded monotonic for the
                        // next run.
                        self.iteration += completed;
                        return Err(TrainerError::Training);
                    }
                }
            };

            let step = self.iteration + completed;
            if metrics.loss.is_finite() {
                self.loss.push(MetricSample { step, value: metrics.loss });
            }
            if let Some(acc) = metrics.accuracy {
                if acc.is_finite() {
                    self.accuracy.push(MetricSample { step, value: acc });
                }
            }
            completed += 1;

            // Yield point between steps.
            if let Some(tx) = &self.config.progress_tx {
                let stats = StepStats {
                    step,
                    batch: i,
                    total_batches: batches,
                    loss: metrics.loss,
                    accuracy: metrics.accuracy,
                    val_loss: metrics.val_loss,
                    val_accuracy: metrics.val_accuracy,
                    elapsed_ms: t_start.elapsed().as_millis() as u64,
                };
                if tx.send(stats).is_err() {
                    // Receiver gone — stop the run cleanly.
                    break;
                }
            }
        }

        debug!("training run complete: {} of {} steps", completed, batches);
        self.iteration += completed;
        Ok(())
    }

    /// Discards the live handle, zeroes the step counter, and clears both
    /// metric series. Persisted models and the dataset are untouched.
    pub fn reset_model(&mut self) {
        self.model = None;
        self.iteration = 0;
        self.loss.clear();
        self.accuracy.clear();
    }

    /// Serializes the live model under `<label>-<date>-<time>` and refreshes
    /// the saved-model list from the backend. Without a live model this is a
    /// no-op that touches neither the backend nor the list.
    ///
    /// Returns the generated name, or `None` for the no-op case.
    pub fn save_model(&mut self) -> Result<Option<String>, TrainerError> {
        let Some(model) = &self.model else {
            return Ok(None);
        };
        self.last_error = None;

        let name = format!("{}-{}", self.definition.label(), timestamp_suffix(unix_now()));
        if let Err(err) = self.store.save(&name, model) {
            error!("saving model '{}' failed: {}", name, err);
            return self.fail(TrainerError::ModelSave);
        }

        match self.store.list() {
            Ok(names) => {
                self.saved_models = names;
                Ok(Some(name))
            }
            Err(err) => {
                error!("listing saved models failed: {}", err);
                self.fail(TrainerError::ModelSave)
            }
        }
    }

    /// Resets the current state, retrieves the named model from the backend,
    /// and re-attaches optimizer/loss configuration from the *current*
    /// hyperparameter values — serialized artifacts carry structure and
    /// weights only.
    pub fn load_model(&mut self, name: &str) -> Result<(), TrainerError> {
        self.last_error = None;
        self.reset_model();

        let mut handle = match self.store.load(name) {
            Ok(h) => h,
            Err(err) => {
                error!("loading model '{}' failed: {}", name, err);
                return self.fail(TrainerError::ModelLoad);
            }
        };

        let values = match self.hyperparams.values() {
            Ok(v) => v,
            Err(err) => return self.fail(TrainerError::Hyperparam(err)),
        };
        if let Err(err) = self.definition.compile(&mut handle, &values) {
            error!("re-compiling model '{}' failed: {}", name, err);
            return self.fail(TrainerError::ModelLoad);
        }

        self.model = Some(handle);
        Ok(())
    }

    /// Removes the named model from the backend and refreshes the
    /// saved-model list.
    pub fn delete_model(&mut self, name: &str) -> Result<(), TrainerError> {
        self.last_error = None;

        if let Err(err) = self.store.remove(name) {
            error!("deleting model '{}' failed: {}", name, err);
            return self.fail(TrainerError::ModelDelete);
        }
        match self.store.list() {
            Ok(names) => {
                self.saved_models = names;
                Ok(())
            }
            Err(err) => {
                error!("listing saved models failed: {}", err);
                self.fail(TrainerError::ModelDelete)
            }
        }
    }

    /// Draws one fixed-size held-out batch, runs a forward pass, and
    /// replaces the prediction snapshot wholesale with per-example
    /// `(input, output, expected)` triples. Constructs a model on demand if
    /// none is live, mirroring `train()`.
    ///
    /// A forward pass whose output width differs from the expected batch
    /// width is rejected with [`TrainerError::ShapeMismatch`]; the previous
    /// predictions are left in place.
    pub fn predict(&mut self) -> Result<(), TrainerError> {
        self.last_error = None;
        if let Err(err) = self.ensure_model(TrainerError::PredictionNotReady) {
            return self.fail(err);
        }

        let batch = self.dataset.next_test_batch(PREDICT_BATCH);
        let output = {
            let model = match self.model.as_mut() {
                Some(m) => m,
                None => return self.fail(TrainerError::PredictionNotReady),
            };
            match model.predict(&batch.input) {
                Ok(o) => o,
                Err(err) => {
                    error!("prediction forward pass failed: {}", err);
                    return self.fail(TrainerError::PredictionNotReady);
                }
            }
        };

        if output.cols != batch.expected.cols {
            return self.fail(TrainerError::ShapeMismatch {
                expected: batch.expected.cols,
                actual: output.cols,
            });
        }

        let mut results = Vec::with_capacity(output.rows);
        for i in 0..output.rows {
            results.push(Prediction {
                input: batch.input.row(i).to_vec(),
                output: output.row(i).to_vec(),
                expected: batch.expected.row(i).to_vec(),
            });
        }
        self.predictions = results;
        Ok(())
    }

    // ── Private helpers ──────────────────────────────────────────────────

    /// Builds a model from the current hyperparameter values if none is
    /// live. Coercion failures pass through; construction failures map to
    /// `fail_as`.
    fn ensure_model(&mut self, fail_as: TrainerError) -> Result<(), TrainerError> {
        if self.model.is_some() {
            return Ok(());
        }
        let values = self.hyperparams.values()?;
        match self.definition.create_and_compile(&values) {
            Ok(handle) => {
                self.model = Some(handle);
                Ok(())
            }
            Err(err) => {
                error!("model construction failed: {}", err);
                Err(fail_as)
            }
        }
    }

    fn fail<T>(&mut self, err: TrainerError) -> Result<T, TrainerError> {
        self.last_error = Some(err.clone());
        Err(err)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Formats a Unix timestamp as `YYYY-MM-DD-HH:MM:SS` (UTC), the suffix of
/// persisted model names.
fn timestamp_suffix(unix_secs: u64) -> String {
    let days = (unix_secs / 86_400) as i64;
    let secs = unix_secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{:04}-{:02}-{:02}-{:02}:{:02}:{:02}",
        year,
        month,
        day,
        secs / 3_600,
        (secs % 3_600) / 60,
        secs % 60
    )
}

/// Gregorian date for a day count since 1970-01-01, via the era/day-of-era
/// decomposition (400-year eras of 146097 days).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { (mp + 3) as u32 } else { (mp - 9) as u32 };
    (if month <= 2 { year + 1 } else { year }, month, day)
}
