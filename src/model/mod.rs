pub mod definition;
pub mod trainable;

pub use definition::ModelDefinition;
pub use trainable::{FitMetrics, ModelError, TrainableModel};
