pub mod spec;
pub mod store;

pub use spec::{HyperparamKind, HyperparamSpec, HyperparamValue};
pub use store::{HyperparamError, HyperparamStore, HyperparamValues};
