use crate::config::Config;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use reqlens_aspnet::EndpointScanner;
use reqlens_core::models::{Document, Endpoint, Environment, EnvironmentStore, HttpMethod, SynthesizedRequest};
use reqlens_core::resolve::{FsWorkspace, TypeResolver};
use reqlens_core::synth::RequestSynthesizer;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Synthesizes a request for one endpoint of a source file
pub fn execute_request(
    file: &Path,
    selector: &str,
    env_name: Option<&str>,
    resolve: bool,
    curl: bool,
    config: &Config,
) -> Result<()> {
    if !config.scan.enabled {
        bail!("Scanning is disabled in the configuration (scan.enabled = false)");
    }

    let document = Document::read(file)
        .with_context(|| format!("Failed to read source file: {}", file.display()))?;

    let mut endpoints = EndpointScanner::new().scan(&document);
    if endpoints.is_empty() {
        bail!("No endpoints found in {}", file.display());
    }

    let index = select_endpoint(&endpoints, selector)?;
    let endpoint = &mut endpoints[index];

    if resolve {
        let root = file.parent().unwrap_or_else(|| Path::new("."));
        debug!(
            root = %root.display(),
            scope = ?config.search_scope(),
            "resolving parameter types before synthesis"
        );
        let workspace = FsWorkspace::new(root).with_scope(config.search_scope());
        TypeResolver::new(workspace).resolve_parameters(endpoint, &document)?;
    }

    let environment = pick_environment(config, env_name)?;
    let request = RequestSynthesizer::new().synthesize(endpoint, &environment);

    for warning in &request.warnings {
        eprintln!(
            "{} {}: {} ({})",
            "warning:".yellow().bold(),
            warning.field,
            warning.message,
            warning.suggestion
        );
    }
    for note in &request.notes {
        eprintln!("{} {}: {}", "note:".cyan().bold(), note.field, note.text);
    }

    if curl {
        println!("{}", render_curl(&request, config.timeout()));
    } else {
        println!("{}", serde_json::to_string_pretty(&request)?);
    }

    Ok(())
}

/// Resolves `--endpoint` to an index: either a number from `scan` output or
/// a "METHOD /route" pair.
fn select_endpoint(endpoints: &[Endpoint], selector: &str) -> Result<usize> {
    let selector = selector.trim();

    if let Ok(index) = selector.parse::<usize>() {
        if index >= endpoints.len() {
            bail!(
                "Endpoint index {} out of range ({} endpoint(s) found)",
                index,
                endpoints.len()
            );
        }
        return Ok(index);
    }

    let (method_text, route) = selector.split_once(char::is_whitespace).ok_or_else(|| {
        anyhow::anyhow!(
            "Endpoint selector must be an index or \"METHOD /route\", got: {}",
            selector
        )
    })?;
    let method = HttpMethod::from_str_opt(method_text)
        .ok_or_else(|| anyhow::anyhow!("Unknown HTTP method: {}", method_text))?;
    let route = route.trim();

    endpoints
        .iter()
        .position(|e| e.http_method == method && e.route == route)
        .ok_or_else(|| {
            let known: Vec<String> = endpoints.iter().map(|e| e.signature()).collect();
            anyhow::anyhow!(
                "No endpoint matches \"{} {}\". Available: {}",
                method,
                route,
                known.join(", ")
            )
        })
}

fn pick_environment(config: &Config, name: Option<&str>) -> Result<Environment> {
    match name {
        Some(name) => config
            .environments()
            .into_iter()
            .find(|e| e.name == name)
            .ok_or_else(|| {
                let known: Vec<String> =
                    config.environments().into_iter().map(|e| e.name).collect();
                anyhow::anyhow!("Unknown environment: {}. Known: {}", name, known.join(", "))
            }),
        None => Ok(config.current().unwrap_or_default()),
    }
}

/// Renders a copy-pasteable curl command for a synthesized request
fn render_curl(request: &SynthesizedRequest, timeout: Duration) -> String {
    let mut url = request.url.clone();
    if !request.query.is_empty() {
        let pairs: Vec<String> = request
            .query
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        url.push('?');
        url.push_str(&pairs.join("&"));
    }

    let mut cmd = format!("curl -sS -X {} \"{}\"", request.method, url);
    cmd.push_str(&format!(" \\\n  --max-time {}", timeout.as_secs()));
    for (name, value) in &request.headers {
        cmd.push_str(&format!(" \\\n  -H \"{}: {}\"", name, value));
    }
    if let Some(ref body) = request.body {
        let escaped = escape_single_quotes(&body.to_string());
        cmd.push_str(" \\\n  -H 'content-type: application/json' \\\n  -d '");
        cmd.push_str(&escaped);
        cmd.push('\'');
    }
    if let Some(ref form) = request.form {
        for (field, value) in form {
            cmd.push_str(&format!(" \\\n  -F '{}={}'", field, value));
        }
    }
    cmd
}

fn escape_single_quotes(value: &str) -> String {
    value.replace('\'', "'\\''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqlens_core::models::{BindingSource, Location, Parameter};

    fn endpoints() -> Vec<Endpoint> {
        vec![
            Endpoint {
                http_method: HttpMethod::Get,
                route: "/api/users/{id}".to_string(),
                parameters: vec![Parameter::new("id", "int", BindingSource::Path, true)],
                return_type: "Task<User>".to_string(),
                method_name: "GetUser".to_string(),
                controller_name: "Users".to_string(),
                location: Location::line("UsersController.cs", 7),
            },
            Endpoint {
                http_method: HttpMethod::Post,
                route: "/api/users".to_string(),
                parameters: Vec::new(),
                return_type: "IActionResult".to_string(),
                method_name: "Create".to_string(),
                controller_name: "Users".to_string(),
                location: Location::line("UsersController.cs", 13),
            },
        ]
    }

    #[test]
    fn selector_accepts_indexes_and_method_route_pairs() {
        let eps = endpoints();

        assert_eq!(select_endpoint(&eps, "1").unwrap(), 1);
        assert_eq!(select_endpoint(&eps, "get /api/users/{id}").unwrap(), 0);
        assert_eq!(select_endpoint(&eps, "POST /api/users").unwrap(), 1);

        assert!(select_endpoint(&eps, "5").is_err());
        assert!(select_endpoint(&eps, "DELETE /api/users").is_err());
        assert!(select_endpoint(&eps, "garbage").is_err());
    }

    #[test]
    fn curl_rendering_includes_query_headers_and_body() {
        let environment = Environment {
            headers: [("Authorization".to_string(), "Bearer abc".to_string())]
                .into_iter()
                .collect(),
            ..Environment::default()
        };
        let endpoint = Endpoint {
            http_method: HttpMethod::Post,
            route: "/api/users".to_string(),
            parameters: vec![
                Parameter::new("notify", "bool", BindingSource::Query, false),
                Parameter::new("dto", "CreateUserDto", BindingSource::Body, true),
            ],
            return_type: "IActionResult".to_string(),
            method_name: "Create".to_string(),
            controller_name: "Users".to_string(),
            location: Location::line("UsersController.cs", 13),
        };
        let request = RequestSynthesizer::new().synthesize(&endpoint, &environment);

        let cmd = render_curl(&request, Duration::from_secs(9));

        assert!(cmd.starts_with("curl -sS -X POST \"http://localhost:5000/api/users?notify="));
        assert!(cmd.contains("--max-time 9"));
        assert!(cmd.contains("-H \"Authorization: Bearer abc\""));
        assert!(cmd.contains("-H 'content-type: application/json'"));
        assert!(cmd.contains("-d '"));
    }

    #[test]
    fn curl_bodies_escape_single_quotes() {
        assert_eq!(escape_single_quotes("it's"), "it'\\''s");
    }
}
