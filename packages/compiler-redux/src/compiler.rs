use crate::context::{CompileOptions, CompilerContext};
use crate::emit::{FileKind, GeneratedFile, WritePolicy};
use crate::error::{CompileError, CompileResult};
use crate::layout::SliceLayout;
use slicegen_common::{action_name, is_identifier};
use slicegen_inference::{
    property_key, CodeGenerator, InferenceEngine, InferredField, TypeScriptGenerator,
};
use slicegen_parser::InitState;
use slicegen_value::to_json;
use tracing::debug;

/// Generate the slice's types, slice, reducers and store modules
pub fn compile_slice(
    state: &InitState,
    layout: &SliceLayout,
    options: &CompileOptions,
) -> CompileResult<Vec<GeneratedFile>> {
    if state.is_empty() {
        return Err(CompileError::EmptyState);
    }

    let engine = InferenceEngine::new(options.inference.clone());
    let fields = engine.infer_fields(state.heap(), state.fields());
    let interface = layout.interface_name();

    debug!(
        slice = %layout.slice_name,
        fields = fields.len(),
        "Compiling slice"
    );

    let generator = if options.doc_comments {
        TypeScriptGenerator::new()
    } else {
        TypeScriptGenerator::without_doc_comments()
    };
    let mut types = generator.generate_interface(&interface, &fields);
    types.push('\n');

    let initial_state = render_initial_state(state)?;

    Ok(vec![
        GeneratedFile::new(layout.types_path(), types, FileKind::Types),
        GeneratedFile::new(
            layout.slice_path(),
            compile_slice_module(&layout.slice_name, &interface, &fields, &initial_state),
            FileKind::Slice,
        ),
        GeneratedFile::new(layout.reducers_path(), compile_reducers_module(), FileKind::Reducers),
        GeneratedFile::new(
            layout.state_path.clone(),
            compile_store_module(&layout.slice_name),
            FileKind::Store,
        )
        .with_write_policy(WritePolicy::CreateOnly),
    ])
}

/// Two-space indented JSON of the whole init state
fn render_initial_state(state: &InitState) -> CompileResult<String> {
    let json = to_json(state.heap(), &state.root_value())?
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
    Ok(serde_json::to_string_pretty(&json)?)
}

fn compile_slice_module(
    slice_name: &str,
    interface: &str,
    fields: &[InferredField],
    initial_state: &str,
) -> String {
    let ctx = CompilerContext::new();

    ctx.add_line("import { createSlice, type PayloadAction } from '@reduxjs/toolkit'");
    ctx.add_line(&format!("import type {{ {} }} from './types'", interface));
    ctx.add_line("");
    ctx.add_line(&format!("const initialState: {} = {}", interface, initial_state));
    ctx.add_line("");

    ctx.add_line(&format!("export const {}Slice = createSlice({{", slice_name));
    ctx.indent();
    ctx.add_line(&format!("name: '{}',", slice_name));
    ctx.add_line("initialState,");
    ctx.add_line("reducers: {");
    ctx.indent();
    for field in fields {
        let action = action_name(&field.name);
        ctx.add_line(&format!(
            "{}: (state, action: PayloadAction<{}[{}]>) => {{",
            property_key(&action),
            interface,
            single_quoted(&field.name)
        ));
        ctx.indent();
        ctx.add_line(&format!("state{} = action.payload", member_access(&field.name)));
        ctx.dedent();
        ctx.add_line("},");
    }
    ctx.dedent();
    ctx.add_line("},");
    ctx.dedent();
    ctx.add_line("})");
    ctx.add_line("");

    // Actions that aren't identifiers stay reachable through `.actions`
    let exported: Vec<String> = fields
        .iter()
        .map(|field| action_name(&field.name))
        .filter(|action| is_identifier(action))
        .collect();
    if !exported.is_empty() {
        ctx.add_line(&format!(
            "export const {{ {} }} = {}Slice.actions",
            exported.join(", "),
            slice_name
        ));
        ctx.add_line("");
    }

    ctx.add_line(&format!("export default {}Slice.reducer", slice_name));
    ctx.get_output()
}

fn compile_reducers_module() -> String {
    let ctx = CompilerContext::new();
    ctx.add_line("// Hand-written case reducers for this slice.");
    ctx.add_line("// Add them here and spread them into the `reducers` of slice.ts.");
    ctx.add_line("");
    ctx.add_line("export {}");
    ctx.get_output()
}

fn compile_store_module(slice_name: &str) -> String {
    let ctx = CompilerContext::new();
    ctx.add_line("import { configureStore } from '@reduxjs/toolkit'");
    ctx.add_line(&format!(
        "import {}Reducer from './{}/slice'",
        slice_name, slice_name
    ));
    ctx.add_line("");
    ctx.add_line("export const store = configureStore({");
    ctx.indent();
    ctx.add_line("reducer: {");
    ctx.indent();
    ctx.add_line(&format!("{}: {}Reducer,", slice_name, slice_name));
    ctx.dedent();
    ctx.add_line("},");
    ctx.dedent();
    ctx.add_line("})");
    ctx.add_line("");
    ctx.add_line("export type RootState = ReturnType<typeof store.getState>");
    ctx.add_line("export type AppDispatch = typeof store.dispatch");
    ctx.get_output()
}

fn member_access(name: &str) -> String {
    if is_identifier(name) {
        format!(".{}", name)
    } else {
        format!("[{}]", single_quoted(name))
    }
}

fn single_quoted(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}
