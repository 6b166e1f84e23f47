//! # Slicegen Inference Engine
//!
//! Derives TypeScript type descriptors from runtime values by walking their
//! structure: primitives by runtime tag, arrays/maps/sets as unions of their
//! contents, objects field by field in enumeration order. Reference cycles
//! render as `any /* circular */` instead of recursing forever.
//!
//! ## Example
//!
//! ```rust
//! use slicegen_inference::{InferenceEngine, InferenceOptions};
//! use slicegen_parser::parse_value;
//!
//! let (heap, value) = parse_value("{ name: 'John', tags: ['a', 1] }").unwrap();
//! let engine = InferenceEngine::new(InferenceOptions::default());
//!
//! assert_eq!(
//!     engine.infer(&heap, &value),
//!     "{ name: string; tags: (string | number)[]; }"
//! );
//! ```

pub mod classify;
pub mod codegen;
pub mod describe;
pub mod inference;
pub mod options;
pub mod types;

// Re-export main types for convenience
pub use classify::{classify, PrimitiveKind, Tag};
pub use codegen::{typescript::TypeScriptGenerator, CodeGenerator};
pub use describe::describe;
pub use inference::{InferenceEngine, InferredField};
pub use options::{CycleGuard, InferenceOptions, DEFAULT_MAX_DEPTH};
pub use types::{property_key, ObjectType, OpaqueType, PrimitiveType, Type, Union};
