use std::fmt;

/// All errors a persistence backend can produce.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying filesystem failure.
    Io(std::io::Error),
    /// Serialization or deserialization of a model artifact failed.
    Encode(String),
    /// No entry is stored under the requested name.
    NotFound(String),
    /// The name is empty or contains path separators / traversal segments.
    InvalidName(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {}", e),
            Self::Encode(msg) => write!(f, "encode error: {}", msg),
            Self::NotFound(name) => write!(f, "no model stored under '{}'", name),
            Self::InvalidName(name) => write!(f, "invalid model name '{}'", name),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A named key-value store for serialized trainable models.
///
/// The trainer treats the backend as the source of truth: after every save
/// or delete it re-enumerates `list()` rather than patching a local cache.
pub trait ModelStore<H> {
    fn list(&self) -> Result<Vec<String>, StoreError>;

    fn save(&mut self, name: &str, handle: &H) -> Result<(), StoreError>;

    fn load(&self, name: &str) -> Result<H, StoreError>;

    fn remove(&mut self, name: &str) -> Result<(), StoreError>;
}

/// Rejects empty names and anything that could escape a storage directory.
pub(crate) fn check_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(StoreError::InvalidName(name.to_owned()));
    }
    Ok(())
}
