use crate::error::{CompileError, CompileResult};
use slicegen_common::FileSystem;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Types,
    Slice,
    Reducers,
    Store,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Replace whatever is there
    #[default]
    Overwrite,
    /// Leave an existing file untouched
    CreateOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
    pub kind: FileKind,
    pub write_policy: WritePolicy,
}

impl GeneratedFile {
    pub fn new(path: PathBuf, contents: String, kind: FileKind) -> Self {
        Self {
            path,
            contents,
            kind,
            write_policy: WritePolicy::default(),
        }
    }

    pub fn with_write_policy(mut self, write_policy: WritePolicy) -> Self {
        self.write_policy = write_policy;
        self
    }
}

/// Outcome of an [`emit`] run. In a dry run `written` lists what would
/// have been written.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EmitReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub dry_run: bool,
}

pub fn emit(
    files: &[GeneratedFile],
    fs: &dyn FileSystem,
    dry_run: bool,
) -> CompileResult<EmitReport> {
    let mut report = EmitReport {
        dry_run,
        ..EmitReport::default()
    };

    for file in files {
        if file.write_policy == WritePolicy::CreateOnly && fs.exists(&file.path) {
            warn!(
                path = %file.path.display(),
                "File already exists, leaving it untouched"
            );
            report.skipped.push(file.path.clone());
            continue;
        }

        if dry_run {
            info!(path = %file.path.display(), bytes = file.contents.len(), "Would write");
            report.written.push(file.path.clone());
            continue;
        }

        if let Some(parent) = file.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs.create_dir_all(parent).map_err(|source| CompileError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs.write(&file.path, &file.contents)
            .map_err(|source| CompileError::Io {
                path: file.path.clone(),
                source,
            })?;

        debug!(path = %file.path.display(), kind = ?file.kind, "Wrote file");
        report.written.push(file.path.clone());
    }

    Ok(report)
}
