//! Single-parameter classification: explicit binding attributes when
//! present, otherwise a name/type inference ladder. One parameter text in,
//! one `Parameter` out, or `None` when the text is not user input.

use crate::attributes::{self, ParameterAnnotation};
use regex::Regex;
use reqlens_core::models::{BindingSource, Parameter};
use reqlens_core::parsers::types;
use std::sync::LazyLock;
use tracing::debug;

// UserQuery query  /  int page = 1  /  Dictionary<string, int> map
static DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+(@?[A-Za-z_]\w*)\s*(?:=\s*(.+))?$").unwrap());

/// Classifies one raw parameter declaration.
///
/// Returns `None` when the parameter should be dropped: service-injected
/// values and text that fails both declaration parses. The caller treats a
/// drop as "not an endpoint input", never as an error.
pub fn classify(text: &str) -> Option<Parameter> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let explicit = match attributes::explicit_binding(text) {
        Some(ParameterAnnotation::Services) => {
            debug!(parameter = text, "dropping service-injected parameter");
            return None;
        }
        Some(ParameterAnnotation::Bind(source)) => Some(source),
        None => None,
    };
    let wire_name = attributes::name_argument(text);

    let declaration = strip_modifiers(attributes::strip_attribute_groups(text));
    let (declared_type, variable_name, default_value) = split_declaration(declaration)?;

    let nullable = declared_type.contains('?');
    let has_default = default_value.is_some();
    let bare = types::unwrap_type(&declared_type);

    let (source, required) = match explicit {
        Some(source) => (source, explicit_required(source, nullable)),
        None => infer_source(&declared_type, &bare, &variable_name, nullable, has_default),
    };

    let name = wire_name.unwrap_or(variable_name);
    Some(Parameter::new(name, declared_type, source, required))
}

/// Strips leading `ref`/`out`/`in`/`this` modifiers. A `params` modifier is
/// detected and logged but changes nothing downstream.
fn strip_modifiers(declaration: &str) -> &str {
    let mut rest = declaration.trim_start();
    loop {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        match &rest[..end] {
            "ref" | "out" | "in" | "this" => rest = rest[end..].trim_start(),
            "params" => {
                debug!(parameter = declaration, "params array parameter");
                rest = rest[end..].trim_start();
            }
            _ => return rest,
        }
    }
}

/// Splits a bare declaration into `(type, name, default)`.
///
/// The pattern keeps the type greedy and the trailing identifier as the
/// name; when it fails, naive whitespace splitting takes the last token
/// before any `=` as the name.
fn split_declaration(declaration: &str) -> Option<(String, String, Option<String>)> {
    let declaration = declaration.trim();
    if declaration.is_empty() {
        return None;
    }

    if let Some(caps) = DECLARATION.captures(declaration) {
        let ty = caps.get(1)?.as_str().trim();
        let name = caps.get(2)?.as_str();
        let default = caps.get(3).map(|m| m.as_str().trim().to_string());
        if !ty.is_empty() {
            return Some((ty.to_string(), name.to_string(), default));
        }
    }

    let (head, default) = match declaration.find('=') {
        Some(idx) => (
            &declaration[..idx],
            Some(declaration[idx + 1..].trim().to_string()),
        ),
        None => (declaration, None),
    };
    let mut tokens: Vec<&str> = head.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    let name = tokens.pop()?.to_string();
    Some((tokens.join(" "), name, default))
}

/// Required-ness for explicitly annotated bindings: route, body and form
/// values must be supplied, query derives from nullability, headers are
/// optional.
fn explicit_required(source: BindingSource, nullable: bool) -> bool {
    match source {
        BindingSource::Path | BindingSource::Body | BindingSource::Form => true,
        BindingSource::Query => !nullable,
        BindingSource::Header => false,
    }
}

/// Inference ladder for parameters without an explicit binding attribute.
/// Order matters: earlier rules win, so a name like `apiKey` binds to the
/// path via the identifier rule before the header rule ever sees it.
fn infer_source(
    declared_type: &str,
    bare_type: &str,
    name: &str,
    nullable: bool,
    has_default: bool,
) -> (BindingSource, bool) {
    if types::is_file_like(declared_type) {
        return (BindingSource::Form, true);
    }
    if suggests_identifier(name) {
        return (BindingSource::Path, true);
    }
    if declared_type.contains("Form") {
        return (BindingSource::Form, true);
    }
    if suggests_header(name) {
        return (BindingSource::Header, false);
    }
    if types::is_simple_type(bare_type) || types::looks_like_enum(bare_type, name) {
        return (BindingSource::Query, !nullable && !has_default);
    }
    (BindingSource::Body, true)
}

/// `id`, `userId`, `orderKey`, `slug` and friends address a resource
fn suggests_identifier(name: &str) -> bool {
    if name == "id" || name == "slug" || name.ends_with("Id") || name.ends_with("ID") {
        return true;
    }
    let lowered = name.to_lowercase();
    lowered.contains("identifier") || lowered.contains("key") || lowered.contains("code")
}

/// Token/authorization-ish names travel in headers
fn suggests_header(name: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered.contains("header")
        || lowered.contains("token")
        || lowered.contains("authorization")
        || lowered == "auth"
        || lowered == "bearer"
}
