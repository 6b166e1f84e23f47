use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use slicegen_common::{FileSystem, RealFileSystem};
use slicegen_compiler_redux::{compile_slice, emit, EmitReport, SliceLayout};
use slicegen_parser::load_init_state;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Path to the slice's initState.ts or initState.js
    pub init_state_path: PathBuf,

    /// Show what would be written without touching any file
    #[arg(long)]
    pub dry_run: bool,
}

pub fn generate(args: GenerateArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let fs = RealFileSystem;
    let path = resolve_init_state_path(&fs, cwd, &args.init_state_path)?;
    debug!(path = %path.display(), dry_run = args.dry_run, "Resolved init state");

    println!("{}", "🔧 Generating Redux slice...".bright_blue().bold());

    let report = run(&fs, &path, &config, args.dry_run).context("Failed to generate files")?;
    print_report(&report, cwd);
    Ok(())
}

/// Absolute path of an existing `.ts`/`.js` init-state module
fn resolve_init_state_path(fs: &dyn FileSystem, cwd: &Path, path: &Path) -> Result<PathBuf> {
    let absolute = cwd.join(path);
    if !fs.exists(&absolute) {
        return Err(anyhow!("Init state file does not exist: {}", absolute.display()));
    }

    match absolute.extension().and_then(|ext| ext.to_str()) {
        Some("ts") | Some("js") => {}
        _ => {
            return Err(anyhow!(
                "Init state file must be a .ts or .js file: {}",
                absolute.display()
            ))
        }
    }

    fs.canonicalize(&absolute)
        .with_context(|| format!("Cannot resolve {}", absolute.display()))
}

fn run(fs: &dyn FileSystem, path: &Path, config: &Config, dry_run: bool) -> Result<EmitReport> {
    let options = config.compile_options();
    let layout = SliceLayout::from_init_state_path(path, &options.state_file)?;

    let state = load_init_state(fs, path)?;
    let files = compile_slice(&state, &layout, &options)?;
    Ok(emit(&files, fs, dry_run)?)
}

fn print_report(report: &EmitReport, cwd: &Path) {
    let verb = if report.dry_run { "Would write" } else { "Wrote" };

    for path in &report.written {
        let relative = path.strip_prefix(cwd).unwrap_or(path);
        println!("  {} {} {}", "✓".green(), verb, relative.display());
    }
    for path in &report.skipped {
        let relative = path.strip_prefix(cwd).unwrap_or(path);
        println!(
            "  {} {} already exists, left untouched",
            "⚠️".yellow(),
            relative.display()
        );
    }

    println!();
    if report.dry_run {
        println!("{} Dry run, no files written", "ℹ️".bright_blue());
    } else if let Some(slice) = report.written.iter().find(|p| p.ends_with("slice.ts")) {
        println!("{} slice.ts generated at {}", "✅".green(), slice.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicegen_parser::LoadError;
    use std::fs;

    fn project(init_state: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let slice_dir = dir.path().join("src").join("redux").join("todos");
        fs::create_dir_all(&slice_dir).unwrap();
        fs::write(slice_dir.join("initState.ts"), init_state).unwrap();
        (dir, PathBuf::from("src/redux/todos/initState.ts"))
    }

    #[test]
    fn test_generate_writes_slice() {
        let (dir, path) = project("export default { items: [] as string[], filter: 'all' }\n");
        let args = GenerateArgs {
            init_state_path: path,
            dry_run: false,
        };

        generate(args, dir.path()).unwrap();

        let slice_dir = dir.path().join("src/redux/todos");
        let types = fs::read_to_string(slice_dir.join("types.ts")).unwrap();
        assert!(types.starts_with("export interface TodosState {"));
        assert!(types.contains("  filter: string\n"));
        assert!(slice_dir.join("slice.ts").exists());
        assert!(slice_dir.join("reducers.ts").exists());
        assert!(dir.path().join("src/redux/state.ts").exists());
    }

    #[test]
    fn test_generate_dry_run() {
        let (dir, path) = project("export default { done: false }\n");
        let args = GenerateArgs {
            init_state_path: path,
            dry_run: true,
        };

        generate(args, dir.path()).unwrap();
        assert!(!dir.path().join("src/redux/todos/types.ts").exists());
        assert!(!dir.path().join("src/redux/state.ts").exists());
    }

    #[test]
    fn test_generate_respects_state_file_config() {
        let (dir, path) = project("export default { done: false }\n");
        fs::write(dir.path().join("slicegen.config.json"), r#"{ "stateFile": "store.ts" }"#)
            .unwrap();

        generate(GenerateArgs { init_state_path: path, dry_run: false }, dir.path()).unwrap();
        assert!(dir.path().join("src/redux/store.ts").exists());
        assert!(!dir.path().join("src/redux/state.ts").exists());
    }

    #[test]
    fn test_generate_without_doc_comments() {
        let (dir, path) = project("export default { done: false }\n");
        fs::write(dir.path().join("slicegen.config.json"), r#"{ "docComments": false }"#)
            .unwrap();

        generate(GenerateArgs { init_state_path: path, dry_run: false }, dir.path()).unwrap();
        let types = fs::read_to_string(dir.path().join("src/redux/todos/types.ts")).unwrap();
        assert_eq!(types, "export interface TodosState {\n  done: boolean\n}\n");
    }

    #[test]
    fn test_syntax_error_keeps_load_error() {
        let (dir, path) = project("export default { name: }\n");
        let args = GenerateArgs {
            init_state_path: path,
            dry_run: false,
        };

        let err = generate(args, dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate files");
        let load_error = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<LoadError>())
            .expect("load error in chain");
        assert!(matches!(load_error, LoadError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = GenerateArgs {
            init_state_path: PathBuf::from("redux/user/initState.ts"),
            dry_run: false,
        };

        let err = generate(args, dir.path()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("state.json"), "{}").unwrap();
        let args = GenerateArgs {
            init_state_path: PathBuf::from("state.json"),
            dry_run: false,
        };

        let err = generate(args, dir.path()).unwrap_err();
        assert!(err.to_string().contains(".ts or .js"));
    }

    #[test]
    fn test_empty_state_has_context() {
        let (dir, path) = project("export default {}\n");
        let args = GenerateArgs {
            init_state_path: path,
            dry_run: false,
        };

        let err = generate(args, dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate files");
        assert!(format!("{:#}", err).contains("Initial state object is empty"));
    }
}
