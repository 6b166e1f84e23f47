use slicegen_value::JsonError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Initial state object is empty")]
    EmptyState,

    #[error("Cannot serialize initial state: {0}")]
    Serialize(#[from] JsonError),

    #[error("Cannot render initial state: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Invalid slice layout for {}: {reason}", .path.display())]
    InvalidLayout { path: PathBuf, reason: String },

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type CompileResult<T> = Result<T, CompileError>;
