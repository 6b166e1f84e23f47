use slicegen_inference::InferenceOptions;
use std::cell::RefCell;

/// Options for slice generation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub inference: InferenceOptions,
    /// File name of the store module in the redux directory
    pub state_file: String,
    /// Emit `/** … */` descriptions in the generated interface
    pub doc_comments: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            inference: InferenceOptions::default(),
            state_file: "state.ts".to_string(),
            doc_comments: true,
        }
    }
}

/// Output buffer with indentation tracking for generated modules
pub struct CompilerContext {
    buffer: RefCell<String>,
    indent_level: RefCell<usize>,
}

impl CompilerContext {
    pub fn new() -> Self {
        Self {
            buffer: RefCell::new(String::new()),
            indent_level: RefCell::new(0),
        }
    }

    pub fn add(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    /// Add a line at the current indentation; empty lines stay empty
    pub fn add_line(&self, text: &str) {
        if !text.is_empty() {
            self.add_indented(text);
        }
        self.add("\n");
    }

    pub fn add_indented(&self, text: &str) {
        let indent = "  ".repeat(*self.indent_level.borrow());
        let mut buffer = self.buffer.borrow_mut();
        buffer.push_str(&indent);
        buffer.push_str(text);
    }

    pub fn indent(&self) {
        *self.indent_level.borrow_mut() += 1;
    }

    pub fn dedent(&self) {
        let mut level = self.indent_level.borrow_mut();
        if *level > 0 {
            *level -= 1;
        }
    }

    pub fn get_output(&self) -> String {
        self.buffer.borrow().clone()
    }
}

impl Default for CompilerContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation() {
        let ctx = CompilerContext::new();
        ctx.add_line("reducers: {");
        ctx.indent();
        ctx.add_line("setName: () => {},");
        ctx.add_line("");
        ctx.dedent();
        ctx.dedent();
        ctx.add_line("}");

        assert_eq!(ctx.get_output(), "reducers: {\n  setName: () => {},\n\n}\n");
    }
}
