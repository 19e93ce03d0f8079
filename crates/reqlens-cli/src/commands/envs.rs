use anyhow::Result;
use colored::Colorize;
use reqlens_core::models::EnvironmentStore;

/// Lists configured environments, marking the active one
pub fn execute_envs(store: &dyn EnvironmentStore) -> Result<()> {
    let environments = store.environments();
    if environments.is_empty() {
        println!("No environments configured. Run `reqlens init` to create a config file.");
        return Ok(());
    }

    let current = store.current();
    for env in &environments {
        let is_current = current.as_ref().map_or(false, |c| c.name == env.name);
        if is_current {
            println!("{} {}", "*".green().bold(), env.name.green().bold());
        } else {
            println!("  {}", env.name);
        }
        println!("    url: {}{}", env.base_url, env.base_path);
        if !env.headers.is_empty() {
            let keys: Vec<&str> = env.headers.keys().map(String::as_str).collect();
            println!("    headers: {}", keys.join(", "));
        }
        if !env.variables.is_empty() {
            let keys: Vec<&str> = env.variables.keys().map(String::as_str).collect();
            println!("    variables: {}", keys.join(", "));
        }
    }

    Ok(())
}
