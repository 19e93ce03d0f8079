use anyhow::Result;
use std::fs;
use std::path::Path;

/// Creates the configuration file
pub fn execute_init(path: &str) -> Result<()> {
    let config_content = r#"[scan]
# Master switch for the scanning pipeline
enabled = true
# Search scope for type resolution: fast | balanced | thorough | custom
scope = "balanced"
# File ceiling for one resolution pass, only used when scope = "custom"
# max_files = 2000

[request]
# Timeout handed to whatever fires the synthesized requests, in seconds
timeout_secs = 30

# Environments requests are aimed at. Exactly one must be active.
[[environments]]
name = "local"
base_url = "http://localhost:5000"
base_path = ""
active = true

# [[environments]]
# name = "staging"
# base_url = "https://staging.example.com"
# base_path = "/api/v2"
#
# [environments.headers]
# Authorization = "Bearer REPLACE_ME"
#
# [environments.variables]
# tenant = "acme"
"#;

    let config_path = Path::new(path);
    if config_path.exists() {
        anyhow::bail!("Config file already exists: {}", path);
    }

    fs::write(config_path, config_content)?;
    println!("Created config file: {}", path);

    Ok(())
}
