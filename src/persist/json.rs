use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::persist::store::{check_name, ModelStore, StoreError};

/// A persistence backend that keeps each model as one pretty-printed JSON
/// file (`<name>.json`) in a directory.
pub struct JsonModelStore<H> {
    dir: PathBuf,
    _handle: PhantomData<H>,
}

impl<H> JsonModelStore<H> {
    /// Opens (and creates if needed) the storage directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<JsonModelStore<H>, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(JsonModelStore {
            dir,
            _handle: PhantomData,
        })
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        check_name(name)?;
        Ok(self.dir.join(format!("{}.json", name)))
    }
}

impl<H: Serialize + DeserializeOwned> ModelStore<H> for JsonModelStore<H> {
    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn save(&mut self, name: &str, handle: &H) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, handle).map_err(|e| StoreError::Encode(e.to_string()))
    }

    fn load(&self, name: &str) -> Result<H, StoreError> {
        let path = self.path_for(name)?;
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_owned()))
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_reader(BufReader::new(file)).map_err(|e| StoreError::Encode(e.to_string()))
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
