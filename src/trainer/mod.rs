pub mod config;
pub mod error;
pub mod metrics;
pub mod orchestrator;

pub use config::TrainerConfig;
pub use error::TrainerError;
pub use metrics::{MetricSample, StepStats};
pub use orchestrator::{Prediction, RunState, Trainer};
