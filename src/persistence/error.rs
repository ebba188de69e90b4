use std::fmt;

/// Failure of the durable key-value slot itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    LockPoisoned(&'static str),
    Io {
        key: String,
        message: String,
    },
    /// The write would push the slot past its size limit.
    QuotaExceeded {
        key: String,
        limit: usize,
        size: usize,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::LockPoisoned(operation) => {
                write!(f, "storage lock poisoned during {}", operation)
            }
            StorageError::Io { key, message } => {
                write!(f, "storage i/o error for {}: {}", key, message)
            }
            StorageError::QuotaExceeded { key, limit, size } => write!(
                f,
                "storage quota exceeded writing {} ({} bytes, limit {})",
                key, size, limit
            ),
        }
    }
}

impl std::error::Error for StorageError {}

/// Failure to turn state into a blob or back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    Json(String),
    Binary(String),
    Base64(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Json(message) => write!(f, "json codec error: {}", message),
            CodecError::Binary(message) => write!(f, "binary codec error: {}", message),
            CodecError::Base64(message) => write!(f, "base64 error: {}", message),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Json(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    Storage(StorageError),
    Codec(CodecError),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Storage(err) => write!(f, "{}", err),
            PersistenceError::Codec(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Storage(err) => Some(err),
            PersistenceError::Codec(err) => Some(err),
        }
    }
}

impl From<StorageError> for PersistenceError {
    fn from(err: StorageError) -> Self {
        PersistenceError::Storage(err)
    }
}

impl From<CodecError> for PersistenceError {
    fn from(err: CodecError) -> Self {
        PersistenceError::Codec(err)
    }
}
