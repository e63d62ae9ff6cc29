use std::path::PathBuf;

/// Fatal error classes. Recoverable conditions (missing answers, unjudged rows,
/// zero-frequency questions) live in the data model instead.
#[derive(Debug, thiserror::Error)]
pub enum ThemisError {
    #[error("cannot recover data from {}: {reason}", path.display())]
    CorruptCheckpoint { path: PathBuf, reason: String },

    #[error("{backend} backend unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    #[error("required column '{column}' missing from {file}")]
    SchemaMismatch { column: String, file: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl ThemisError {
    pub fn backend(backend: &str, reason: impl std::fmt::Display) -> Self {
        ThemisError::BackendUnavailable {
            backend: backend.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThemisError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error class.
    pub fn exit_code(&self) -> i32 {
        match self {
            ThemisError::Config(_) | ThemisError::SchemaMismatch { .. } => 2,
            ThemisError::CorruptCheckpoint { .. } => 3,
            ThemisError::BackendUnavailable { .. } => 4,
            ThemisError::Io { .. } | ThemisError::Csv { .. } => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ThemisError>;
