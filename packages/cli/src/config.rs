use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slicegen_compiler_redux::CompileOptions;
use slicegen_inference::{CycleGuard, InferenceOptions, DEFAULT_MAX_DEPTH};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "slicegen.config.json";

/// Slicegen configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Scope of the identity set used to detect circular references
    #[serde(default)]
    pub cycle_guard: CycleGuard,

    /// Nesting depth past which descriptors collapse to `any`
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Store module written next to the slice directories
    #[serde(default = "default_state_file")]
    pub state_file: String,

    /// Describe each field with a `/** … */` comment in types.ts
    #[serde(default = "default_doc_comments")]
    pub doc_comments: bool,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_state_file() -> String {
    "state.ts".to_string()
}

fn default_doc_comments() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Cannot read {}", config_path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid config in {}", config_path.display()))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            inference: InferenceOptions::default()
                .with_cycle_guard(self.cycle_guard)
                .with_max_depth(self.max_depth),
            state_file: self.state_file.clone(),
            doc_comments: self.doc_comments,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycle_guard: CycleGuard::default(),
            max_depth: default_max_depth(),
            state_file: default_state_file(),
            doc_comments: default_doc_comments(),
        }
    }
}
