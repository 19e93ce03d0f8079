use anyhow::{Context, Result};
use reqlens_core::models::{Environment, EnvironmentStore};
use reqlens_core::resolve::SearchScope;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Config file name looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "reqlens.toml";

/// Tool configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub request: RequestConfig,
    pub environments: Vec<EnvironmentEntry>,
}

/// `[scan]` section
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Master switch for the scanning pipeline
    pub enabled: bool,
    /// Search scope tier: "fast", "balanced", "thorough" or "custom"
    pub scope: String,
    /// File ceiling for one resolution pass, only used when scope = "custom"
    pub max_files: Option<usize>,
}

/// `[request]` section
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Timeout handed to whatever fires the synthesized requests, in seconds
    pub timeout_secs: u64,
}

/// One `[[environments]]` record: a core environment plus the active marker
#[derive(Debug, Deserialize)]
pub struct EnvironmentEntry {
    #[serde(flatten)]
    pub environment: Environment,
    #[serde(default)]
    pub active: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            request: RequestConfig::default(),
            environments: vec![EnvironmentEntry {
                environment: Environment::default(),
                active: true,
            }],
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scope: "balanced".to_string(),
            max_files: None,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Config {
    /// Loads and validates configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the given file, or `reqlens.toml` from the working directory,
    /// or falls back to built-in defaults when neither exists.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        match self.scan.scope.to_lowercase().as_str() {
            "fast" | "balanced" | "thorough" => {}
            "custom" => {
                if self.scan.max_files.map_or(true, |n| n == 0) {
                    anyhow::bail!("scan.scope = \"custom\" requires a positive scan.max_files");
                }
            }
            other => {
                anyhow::bail!(
                    "Unknown scan.scope: {}. Supported tiers: fast, balanced, thorough, custom",
                    other
                );
            }
        }

        if self.environments.is_empty() {
            anyhow::bail!("At least one environment must be configured");
        }
        for (idx, entry) in self.environments.iter().enumerate() {
            if entry.environment.name.is_empty() {
                anyhow::bail!("Environment {}: name cannot be empty", idx);
            }
            if entry.environment.base_url.is_empty() {
                anyhow::bail!("Environment {}: base_url cannot be empty", idx);
            }
        }

        let active = self.environments.iter().filter(|e| e.active).count();
        if active != 1 {
            anyhow::bail!("Exactly one environment must be active, found {}", active);
        }

        Ok(())
    }

    /// Search scope for type resolution, as configured.
    ///
    /// `validate` has already rejected unknown tiers, so the fallback here is
    /// never reached through `load`.
    pub fn search_scope(&self) -> SearchScope {
        let tier = self.scan.scope.to_lowercase();
        if tier == "custom" {
            SearchScope::Custom(
                self.scan
                    .max_files
                    .unwrap_or_else(|| SearchScope::Balanced.file_ceiling()),
            )
        } else {
            tier.parse().unwrap_or_default()
        }
    }

    /// Timeout for whoever executes synthesized requests
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request.timeout_secs)
    }
}

impl EnvironmentStore for Config {
    fn environments(&self) -> Vec<Environment> {
        self.environments
            .iter()
            .map(|e| e.environment.clone())
            .collect()
    }

    fn current(&self) -> Option<Environment> {
        self.environments
            .iter()
            .find(|e| e.active)
            .map(|e| e.environment.clone())
    }
}
