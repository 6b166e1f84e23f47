//! # Slicegen value model
//!
//! An arena of JavaScript-like values with object identity. State modules are
//! evaluated into a [`Heap`]; the inference engine walks it through [`Value`]
//! handles, so shared and cyclic object graphs are representable.

pub mod heap;
pub mod json;
pub mod value;

pub use heap::{
    Heap, HeapError, HeapObject, HeapResult, ObjectId, ObjectKind, MAX_ARRAY_LENGTH,
};
pub use json::{to_json, JsonError, JsonResult};
pub use value::{Symbol, Value};
