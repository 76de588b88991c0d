use crate::hyperparams::spec::HyperparamSpec;
use crate::hyperparams::store::HyperparamValues;
use crate::model::trainable::{ModelError, TrainableModel};

/// Describes a configurable architecture and how to bring it to life.
///
/// A definition declares its hyperparameters once and builds handles from
/// concrete values. `compile` re-attaches the optimizer/loss configuration
/// to an *existing* handle without touching its learned parameters — needed
/// after loading a persisted model, whose serialized form carries structure
/// and weights but no training configuration.
pub trait ModelDefinition {
    type Handle: TrainableModel;

    /// Stable human-readable identifier, used as the namespace prefix for
    /// persisted model names.
    fn label(&self) -> &str;

    /// The declared hyperparameters, in display order. Every key the build
    /// logic reads must appear here.
    fn config(&self) -> Vec<HyperparamSpec>;

    /// Builds a fresh architecture from the given values and attaches its
    /// optimizer/loss configuration. Deterministic given identical values,
    /// modulo the architecture's own random initialization.
    fn create_and_compile(&self, values: &HyperparamValues) -> Result<Self::Handle, ModelError>;

    /// Re-attaches optimizer/loss configuration to `handle`, leaving its
    /// learned parameters untouched.
    fn compile(&self, handle: &mut Self::Handle, values: &HyperparamValues) -> Result<(), ModelError>;
}
