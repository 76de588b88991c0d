use crate::dataset::provider::Dataset;
use crate::dataset::synthetic::{self, XorDataset};

type DatasetFactory = Box<dyn Fn() -> Box<dyn Dataset>>;

/// A closed set of named dataset factories.
///
/// The built-in set covers the synthetic toy datasets; hosts register their
/// own file-backed providers alongside them. Lookup is by exact name — no
/// open-ended plugin loading, the set is known when the registry is built.
pub struct DatasetRegistry {
    entries: Vec<(String, DatasetFactory)>,
}

impl DatasetRegistry {
    pub fn new() -> DatasetRegistry {
        DatasetRegistry { entries: Vec::new() }
    }

    /// A registry pre-populated with the synthetic datasets:
    /// `xor`, `circles`, `blobs`.
    pub fn with_builtins() -> DatasetRegistry {
        let mut registry = DatasetRegistry::new();
        registry.register("xor", || Box::new(XorDataset::new()));
        // 200 samples with a 20% held-out split.
        registry.register("circles", || Box::new(synthetic::circles(200, 20)));
        registry.register("blobs", || Box::new(synthetic::blobs(200, 20)));
        registry
    }

    /// Registers a factory under `name`, replacing any existing entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Dataset> + 'static,
    {
        let name = name.into();
        self.entries.retain(|(existing, _)| *existing != name);
        self.entries.push((name, Box::new(factory)));
    }

    /// Builds a fresh, unloaded dataset for `name`.
    pub fn create(&self, name: &str) -> Option<Box<dyn Dataset>> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, factory)| factory())
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl Default for DatasetRegistry {
    fn default() -> Self {
        DatasetRegistry::new()
    }
}
