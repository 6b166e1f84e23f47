//! Loading and validating the default export of a state module.

use crate::error::ParseError;
use crate::parser::{parse_module, Module};
use slicegen_common::{is_reserved_keyword, FileSystem};
use slicegen_value::{Heap, ObjectId, ObjectKind, Value};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {error}", .path.display())]
    Parse {
        path: PathBuf,
        source_text: String,
        #[source]
        error: ParseError,
    },

    #[error("Init state module must export a default object")]
    MissingDefaultExport,

    #[error("Init state must be an object, found {0}")]
    NotAnObject(&'static str),

    #[error("Init state must be a plain object, not an array")]
    ArrayExport,

    #[error("Invalid property key: {0:?}")]
    InvalidKey(String),

    #[error("\"{0}\" is a reserved JavaScript keyword and cannot be used as a state property")]
    ReservedKey(String),
}

impl LoadError {
    /// Source-annotated report for parse failures, plain message otherwise
    pub fn report(&self) -> String {
        match self {
            #[cfg(feature = "pretty-errors")]
            LoadError::Parse {
                path,
                source_text,
                error,
            } => crate::error::pretty::format_error(
                error,
                &path.display().to_string(),
                source_text,
            ),
            other => other.to_string(),
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

/// The validated default export of a state module
#[derive(Debug, Clone)]
pub struct InitState {
    heap: Heap,
    root: ObjectId,
}

impl InitState {
    /// Validate an evaluated module's default export
    pub fn from_module(module: Module) -> LoadResult<Self> {
        let Module {
            heap,
            default_export,
            ..
        } = module;

        let root = match default_export {
            None => return Err(LoadError::MissingDefaultExport),
            Some(Value::Object(id)) => id,
            Some(Value::Null) => return Err(LoadError::NotAnObject("null")),
            Some(other) => return Err(LoadError::NotAnObject(other.type_of(&heap))),
        };

        match heap.get(root).map(|obj| obj.kind()) {
            Some(ObjectKind::Array(_)) => return Err(LoadError::ArrayExport),
            Some(ObjectKind::Function { .. }) => return Err(LoadError::NotAnObject("function")),
            _ => {}
        }

        for key in heap.own_keys(root) {
            if key.is_empty() {
                return Err(LoadError::InvalidKey(key.to_string()));
            }
            if is_reserved_keyword(key) {
                return Err(LoadError::ReservedKey(key.to_string()));
            }
        }

        Ok(Self { heap, root })
    }

    /// Evaluate and validate module source text
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> LoadResult<Self> {
        let module = parse_module(source).map_err(|error| LoadError::Parse {
            path: path.into(),
            source_text: source.to_string(),
            error,
        })?;
        Self::from_module(module)
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn root(&self) -> ObjectId {
        self.root
    }

    pub fn root_value(&self) -> Value {
        Value::Object(self.root)
    }

    /// Own fields in enumeration order
    pub fn fields(&self) -> Vec<(&str, &Value)> {
        self.heap
            .get(self.root)
            .map(|obj| obj.entries())
            .unwrap_or_default()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.heap.own_keys(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }
}

/// Read, evaluate and validate the state module at `path`
pub fn load_init_state(fs: &dyn FileSystem, path: &Path) -> LoadResult<InitState> {
    if !fs.exists(path) {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }
    if !fs.is_file(path) {
        return Err(LoadError::NotAFile(path.to_path_buf()));
    }

    let source = fs.read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let state = InitState::from_source(path, &source)?;
    debug!(
        path = %path.display(),
        fields = state.field_names().len(),
        "Loaded init state"
    );
    Ok(state)
}
