pub mod typescript;

use crate::inference::InferredField;
use crate::types::Type;

/// Renders inferred types as source code for a target language
pub trait CodeGenerator {
    /// Generate code for a single type
    fn generate_type(&self, type_: &Type) -> String;

    /// Generate a single interface member
    fn generate_property(&self, field: &InferredField) -> String;

    /// Generate a complete interface definition
    fn generate_interface(&self, name: &str, fields: &[InferredField]) -> String;
}
