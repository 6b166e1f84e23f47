use crate::error::{CompileError, CompileResult};
use slicegen_common::interface_name;
use std::path::{Path, PathBuf};

/// Where a slice's files live, derived from its init-state module path.
///
/// `src/redux/<slice>/initState.ts` puts generated slice files next to the
/// init state and the store module in `src/redux/`.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceLayout {
    pub init_state_path: PathBuf,
    pub slice_dir: PathBuf,
    pub slice_name: String,
    pub redux_dir: PathBuf,
    pub state_path: PathBuf,
}

impl SliceLayout {
    pub fn from_init_state_path(path: &Path, state_file: &str) -> CompileResult<Self> {
        let invalid = |reason: &str| CompileError::InvalidLayout {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let slice_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| invalid("init state file has no parent directory"))?;
        let slice_name = slice_dir
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| invalid("slice directory has no usable name"))?;
        let redux_dir = slice_dir
            .parent()
            .ok_or_else(|| invalid("slice directory has no parent directory"))?;

        Ok(Self {
            init_state_path: path.to_path_buf(),
            slice_dir: slice_dir.to_path_buf(),
            slice_name: slice_name.to_string(),
            redux_dir: redux_dir.to_path_buf(),
            state_path: redux_dir.join(state_file),
        })
    }

    pub fn interface_name(&self) -> String {
        interface_name(&self.slice_name)
    }

    pub fn types_path(&self) -> PathBuf {
        self.slice_dir.join("types.ts")
    }

    pub fn slice_path(&self) -> PathBuf {
        self.slice_dir.join("slice.ts")
    }

    pub fn reducers_path(&self) -> PathBuf {
        self.slice_dir.join("reducers.ts")
    }
}
