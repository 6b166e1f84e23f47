use serde::{Deserialize, Serialize};

/// Default recursion limit for nested values
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// How long an object stays marked as entered during one inference call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleGuard {
    /// Unmarked once its subtree is done; only true cycles yield the circular marker
    #[default]
    Path,

    /// Plain objects stay marked for the whole call, so shared objects
    /// render as circular after their first occurrence
    Call,
}

/// Configuration options for type inference
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceOptions {
    pub cycle_guard: CycleGuard,

    /// Values nested deeper than this render as `any`
    pub max_depth: usize,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            cycle_guard: CycleGuard::Path,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl InferenceOptions {
    /// Options reproducing the call-scoped cycle guard of earlier generators
    pub fn compat() -> Self {
        Self {
            cycle_guard: CycleGuard::Call,
            ..Default::default()
        }
    }

    pub fn with_cycle_guard(mut self, cycle_guard: CycleGuard) -> Self {
        self.cycle_guard = cycle_guard;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = InferenceOptions::default();
        assert_eq!(options.cycle_guard, CycleGuard::Path);
        assert_eq!(options.max_depth, 256);
        assert_eq!(InferenceOptions::compat().cycle_guard, CycleGuard::Call);
    }

    #[test]
    fn test_cycle_guard_serde() {
        let guard: CycleGuard = serde_json::from_str("\"call\"").unwrap();
        assert_eq!(guard, CycleGuard::Call);
        assert_eq!(serde_json::to_string(&CycleGuard::Path).unwrap(), "\"path\"");
    }
}
