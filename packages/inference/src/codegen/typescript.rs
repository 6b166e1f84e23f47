use crate::codegen::CodeGenerator;
use crate::inference::InferredField;
use crate::types::{property_key, Type};

/// TypeScript interface generator for inferred state types
pub struct TypeScriptGenerator {
    /// Emit a `/** description */` line above each member
    doc_comments: bool,
}

impl TypeScriptGenerator {
    pub fn new() -> Self {
        Self { doc_comments: true }
    }

    pub fn without_doc_comments() -> Self {
        Self {
            doc_comments: false,
        }
    }
}

impl Default for TypeScriptGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for TypeScriptGenerator {
    fn generate_type(&self, type_: &Type) -> String {
        type_.to_string()
    }

    fn generate_property(&self, field: &InferredField) -> String {
        format!(
            "{}: {}",
            property_key(&field.name),
            self.generate_type(&field.type_)
        )
    }

    fn generate_interface(&self, name: &str, fields: &[InferredField]) -> String {
        let mut lines = vec![format!("export interface {} {{", name)];

        for field in fields {
            if self.doc_comments {
                // `*/` inside the description would close the comment early
                lines.push(format!("  /** {} */", field.description.replace("*/", "*\\/")));
            }
            lines.push(format!("  {}", self.generate_property(field)));
        }

        lines.push("}".to_string());
        lines.join("\n")
    }
}
