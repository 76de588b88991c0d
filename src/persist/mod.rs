pub mod json;
pub mod memory;
pub mod store;

pub use json::JsonModelStore;
pub use memory::MemoryModelStore;
pub use store::{ModelStore, StoreError};
