use crate::*;
use slicegen_common::{FileSystem, MockFileSystem};
use slicegen_parser::{load_init_state, InitState};
use std::path::{Path, PathBuf};

const INIT_STATE_PATH: &str = "/app/src/redux/user/initState.ts";

fn state(source: &str) -> InitState {
    InitState::from_source(INIT_STATE_PATH, source).unwrap()
}

fn layout() -> SliceLayout {
    SliceLayout::from_init_state_path(Path::new(INIT_STATE_PATH), "state.ts").unwrap()
}

fn compile(source: &str) -> Vec<GeneratedFile> {
    compile_slice(&state(source), &layout(), &CompileOptions::default()).unwrap()
}

fn contents(files: &[GeneratedFile], kind: FileKind) -> &str {
    &files
        .iter()
        .find(|file| file.kind == kind)
        .unwrap()
        .contents
}

#[test]
fn test_generates_four_files() {
    let files = compile("export default { name: 'Alice' }");

    let paths: Vec<PathBuf> = files.iter().map(|file| file.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("/app/src/redux/user/types.ts"),
            PathBuf::from("/app/src/redux/user/slice.ts"),
            PathBuf::from("/app/src/redux/user/reducers.ts"),
            PathBuf::from("/app/src/redux/state.ts"),
        ]
    );
    assert_eq!(files[3].write_policy, WritePolicy::CreateOnly);
    assert!(files[..3]
        .iter()
        .all(|file| file.write_policy == WritePolicy::Overwrite));
}

#[test]
fn test_types_module() {
    let files = compile("export default { name: 'Alice', age: 30, tags: ['a'], owner: null }");

    assert_eq!(
        contents(&files, FileKind::Types),
        "export interface UserState {\n  \
         /** string value */\n  name: string\n  \
         /** number value */\n  age: number\n  \
         /** Array with 1 initial items */\n  tags: string[]\n  \
         /** Nullable value */\n  owner: null\n}\n"
    );
}

#[test]
fn test_types_module_without_doc_comments() {
    let options = CompileOptions {
        doc_comments: false,
        ..CompileOptions::default()
    };
    let files = compile_slice(&state("export default { ready: false }"), &layout(), &options).unwrap();

    assert_eq!(
        contents(&files, FileKind::Types),
        "export interface UserState {\n  ready: boolean\n}\n"
    );
}

#[test]
fn test_slice_module() {
    let files = compile("export default { name: 'Alice', tags: ['a'] }");

    let expected = r#"import { createSlice, type PayloadAction } from '@reduxjs/toolkit'
import type { UserState } from './types'

const initialState: UserState = {
  "name": "Alice",
  "tags": [
    "a"
  ]
}

export const userSlice = createSlice({
  name: 'user',
  initialState,
  reducers: {
    setName: (state, action: PayloadAction<UserState['name']>) => {
      state.name = action.payload
    },
    setTags: (state, action: PayloadAction<UserState['tags']>) => {
      state.tags = action.payload
    },
  },
})

export const { setName, setTags } = userSlice.actions

export default userSlice.reducer
"#;
    assert_eq!(contents(&files, FileKind::Slice), expected);
}

#[test]
fn test_slice_module_quotes_non_identifier_fields() {
    let files = compile("export default { 'first-name': 'Ada', count: 1 }");
    let slice = contents(&files, FileKind::Slice);

    assert!(slice.contains(r#""setFirst-name": (state, action: PayloadAction<UserState['first-name']>) => {"#));
    assert!(slice.contains("state['first-name'] = action.payload"));
    assert!(slice.contains("export const { setCount } = userSlice.actions"));
}

#[test]
fn test_store_module() {
    let files = compile("export default { ready: true }");
    let store = contents(&files, FileKind::Store);

    assert!(store.contains("import userReducer from './user/slice'"));
    assert!(store.contains("    user: userReducer,\n"));
    assert!(store.contains("export type RootState = ReturnType<typeof store.getState>"));
}

#[test]
fn test_reducers_placeholder() {
    let files = compile("export default { ready: true }");
    assert!(contents(&files, FileKind::Reducers).ends_with("export {}\n"));
}

#[test]
fn test_empty_state_is_rejected() {
    let err = compile_slice(&state("export default {}"), &layout(), &CompileOptions::default())
        .unwrap_err();
    assert!(matches!(err, CompileError::EmptyState));
    assert_eq!(err.to_string(), "Initial state object is empty");
}

#[test]
fn test_cyclic_state_cannot_be_serialized() {
    let source = "const state = { name: 'loop' }\nstate.self = state\nexport default state\n";
    let err = compile_slice(&state(source), &layout(), &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::Serialize(_)));
}

#[test]
fn test_many_fields() {
    let entries: Vec<String> = (0..100).map(|i| format!("field{}: {}", i, i)).collect();
    let source = format!("export default {{ {} }}", entries.join(", "));
    let files = compile(&source);

    let types = contents(&files, FileKind::Types);
    assert_eq!(types.matches(": number\n").count(), 100);
    let slice = contents(&files, FileKind::Slice);
    assert!(slice.contains("setField0: "));
    assert!(slice.contains("setField99: "));
}

#[test]
fn test_emit_writes_files() {
    let fs = MockFileSystem::new();
    fs.add_file(INIT_STATE_PATH, "export default { ready: true }");

    let state = load_init_state(&fs, Path::new(INIT_STATE_PATH)).unwrap();
    let files = compile_slice(&state, &layout(), &CompileOptions::default()).unwrap();
    let report = emit(&files, &fs, false).unwrap();

    assert_eq!(report.written.len(), 4);
    assert!(report.skipped.is_empty());
    assert!(fs.exists(Path::new("/app/src/redux/user/slice.ts")));
    assert!(fs
        .contents("/app/src/redux/state.ts")
        .unwrap()
        .contains("configureStore"));
}

#[test]
fn test_emit_keeps_existing_store() {
    let fs = MockFileSystem::new();
    fs.add_file("/app/src/redux/state.ts", "// my store\n");
    fs.add_file("/app/src/redux/user/types.ts", "// stale\n");

    let files = compile("export default { ready: true }");
    let report = emit(&files, &fs, false).unwrap();

    assert_eq!(report.skipped, vec![PathBuf::from("/app/src/redux/state.ts")]);
    assert_eq!(fs.contents("/app/src/redux/state.ts").unwrap(), "// my store\n");
    assert_ne!(fs.contents("/app/src/redux/user/types.ts").unwrap(), "// stale\n");
}

#[test]
fn test_dry_run_writes_nothing() {
    let fs = MockFileSystem::new();
    fs.add_file(INIT_STATE_PATH, "export default { ready: true }");

    let files = compile("export default { ready: true }");
    let report = emit(&files, &fs, true).unwrap();

    assert!(report.dry_run);
    assert_eq!(report.written.len(), 4);
    assert_eq!(fs.file_paths(), vec![PathBuf::from(INIT_STATE_PATH)]);
}

#[test]
fn test_emit_to_disk() {
    use slicegen_common::RealFileSystem;

    let dir = tempfile::tempdir().unwrap();
    let slice_dir = dir.path().join("redux").join("cart");
    std::fs::create_dir_all(&slice_dir).unwrap();
    let init_state = slice_dir.join("initState.ts");
    std::fs::write(&init_state, "export default { items: [] as string[], total: 0 }\n").unwrap();

    let fs = RealFileSystem;
    let state = load_init_state(&fs, &init_state).unwrap();
    let layout = SliceLayout::from_init_state_path(&init_state, "state.ts").unwrap();
    let files = compile_slice(&state, &layout, &CompileOptions::default()).unwrap();
    emit(&files, &fs, false).unwrap();

    let types = std::fs::read_to_string(slice_dir.join("types.ts")).unwrap();
    assert!(types.starts_with("export interface CartState {"));
    assert!(types.contains("  items: any[]\n"));
    assert!(dir.path().join("redux").join("state.ts").exists());
}
