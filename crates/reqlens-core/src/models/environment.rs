use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Named target a synthesized request is aimed at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name (e.g., "local", "staging")
    pub name: String,
    /// Scheme + host + optional port (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Path prefix mounted in front of every route
    #[serde(default)]
    pub base_path: String,
    /// Default headers merged into every request
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    /// Substitution variables for report templates
    #[serde(default)]
    pub variables: IndexMap<String, String>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            base_url: "http://localhost:5000".to_string(),
            base_path: String::new(),
            headers: IndexMap::new(),
            variables: IndexMap::new(),
        }
    }
}

/// Read-side view of wherever environments are stored.
///
/// Synthesis only ever reads the current environment; persistence and
/// editing belong to the host (CLI config, editor settings).
pub trait EnvironmentStore {
    /// All known environments
    fn environments(&self) -> Vec<Environment>;

    /// The environment requests are currently aimed at
    fn current(&self) -> Option<Environment>;
}
