//! Final route assembly: controller template, method-level overrides,
//! method-name fallback and placeholder normalization.

use regex::Regex;
use reqlens_core::models::{BindingSource, Parameter};

/// Composes the endpoint route from its parts.
///
/// The controller template (with `[controller]` substituted) or the
/// lowercased controller name forms the base. An inline verb template always
/// appends to the base. A method-level `[Route]` appends when a controller
/// template exists but stands alone as the full route when none does. With
/// no override at all, the method name is appended only when no controller
/// template exists.
pub fn compose_route(
    controller_route: Option<&str>,
    controller_name: &str,
    inline_route: Option<&str>,
    route_attribute: Option<&str>,
    method_name: &str,
    parameters: &[Parameter],
) -> String {
    let base = match controller_route {
        Some(template) => template.replace("[controller]", &controller_name.to_lowercase()),
        None => controller_name.to_lowercase(),
    };

    let route = match (inline_route, route_attribute, controller_route) {
        (Some(inline), _, _) => join(&base, inline),
        (None, Some(attribute), Some(_)) => join(&base, attribute),
        (None, Some(attribute), None) => join("", attribute),
        (None, None, Some(_)) => join(&base, ""),
        (None, None, None) => join(&base, method_name),
    };

    normalize_placeholders(&route, parameters)
}

/// Joins two route fragments around a single `/` seam, always producing a
/// leading slash
fn join(base: &str, suffix: &str) -> String {
    let base = base.trim_matches('/');
    let suffix = suffix.trim_matches('/');
    match (base.is_empty(), suffix.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{suffix}"),
        (false, true) => format!("/{base}"),
        (false, false) => format!("/{base}/{suffix}"),
    }
}

/// Rewrites `{Name}`, `{name:constraint}` and `:name` placeholder spellings
/// to the exact-case `{name}` of the matching path parameter. Idempotent:
/// already-canonical routes pass through unchanged.
fn normalize_placeholders(route: &str, parameters: &[Parameter]) -> String {
    let mut route = route.to_string();
    for parameter in parameters {
        if parameter.source != BindingSource::Path {
            continue;
        }
        let escaped = regex::escape(&parameter.name);
        let canonical = format!("{{{}}}", parameter.name);

        let braced = Regex::new(&format!(r"(?i)\{{{escaped}(?::[^}}]*)?\}}")).unwrap();
        route = braced.replace_all(&route, canonical.as_str()).into_owned();

        let prefixed = Regex::new(&format!(r"(?i):{escaped}\b")).unwrap();
        route = prefixed.replace_all(&route, canonical.as_str()).into_owned();
    }
    route
}
