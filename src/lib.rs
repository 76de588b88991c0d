pub mod dataset;
pub mod hyperparams;
pub mod model;
pub mod persist;
pub mod registry;
pub mod tensor;
pub mod trainer;

// Convenience re-exports
pub use dataset::{Batch, ClassBinDataset, Dataset, DatasetError, SplitDataset, SpriteDataset, XorDataset};
pub use hyperparams::{HyperparamError, HyperparamKind, HyperparamSpec, HyperparamStore, HyperparamValue, HyperparamValues};
pub use model::{FitMetrics, ModelDefinition, ModelError, TrainableModel};
pub use persist::{JsonModelStore, MemoryModelStore, ModelStore, StoreError};
pub use registry::DatasetRegistry;
pub use tensor::Tensor;
pub use trainer::{MetricSample, Prediction, RunState, StepStats, Trainer, TrainerConfig, TrainerError};
