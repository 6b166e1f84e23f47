//! # Slicegen Redux compiler
//!
//! Turns a loaded init state into the modules of a Redux Toolkit slice:
//! `types.ts`, `slice.ts`, a `reducers.ts` placeholder and the shared store
//! module, which is only ever created, never overwritten.

pub mod compiler;
pub mod context;
pub mod emit;
pub mod error;
pub mod layout;

pub use compiler::compile_slice;
pub use context::{CompileOptions, CompilerContext};
pub use emit::{emit, EmitReport, FileKind, GeneratedFile, WritePolicy};
pub use error::{CompileError, CompileResult};
pub use layout::SliceLayout;

#[cfg(test)]
mod tests;
