//! Attribute-shaped text recognition: verb attributes, route templates,
//! binding annotations and the controller naming convention. All matching is
//! permissive single-line pattern work; malformed attributes simply fail to
//! match.

use regex::Regex;
use reqlens_core::models::{BindingSource, HttpMethod};
use reqlens_core::parsers::csharp;
use std::sync::LazyLock;

/// Compiled patterns for ASP.NET attribute shapes
struct AttributePatterns {
    http_verb: Regex,
    route: Regex,
    controller_class: Regex,
    access_modifier: Regex,
    name_argument: Regex,
}

static PATTERNS: LazyLock<AttributePatterns> = LazyLock::new(|| AttributePatterns {
    // [HttpGet], [HttpPost("...")], [HttpDelete("{id}", Name = "Remove")]
    http_verb: Regex::new(
        r#"\[\s*Http(Get|Post|Put|Patch|Delete|Head|Options)\b\s*(?:\(\s*"([^"]*)")?"#,
    )
    .unwrap(),

    // [Route("api/[controller]")]
    route: Regex::new(r#"\[\s*Route\s*\(\s*"([^"]*)""#).unwrap(),

    // public class UsersController : ControllerBase
    controller_class: Regex::new(r"\b(?:class|record)\s+(\w*Controller\w*)").unwrap(),

    access_modifier: Regex::new(r"\b(?:public|private|protected|internal)\b").unwrap(),

    // [FromQuery(Name = "page_size")]
    name_argument: Regex::new(r#"Name\s*=\s*"([^"]*)""#).unwrap(),
});

/// Explicit binding annotation found on a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterAnnotation {
    /// A `[From...]` attribute naming a concrete binding source
    Bind(BindingSource),
    /// `[FromServices]`: injected by the container, never user input
    Services,
}

/// Extracts the HTTP verb and optional inline route template from a
/// `[HttpXxx(...)]` attribute on this line.
///
/// An empty inline template (`[HttpGet("")]`) counts as no template.
pub fn parse_verb_attribute(line: &str) -> Option<(HttpMethod, Option<String>)> {
    let caps = PATTERNS.http_verb.captures(line)?;
    let method = HttpMethod::from_str_opt(caps.get(1)?.as_str())?;
    let route = caps
        .get(2)
        .map(|m| m.as_str().to_string())
        .filter(|template| !template.is_empty());
    Some((method, route))
}

/// Extracts the template from a `[Route("...")]` attribute on this line
pub fn parse_route_attribute(line: &str) -> Option<String> {
    PATTERNS
        .route
        .captures(line)
        .map(|caps| caps[1].to_string())
}

/// Marker that pins down "this class is an API controller"; bounds the
/// backward route search
pub fn is_api_controller_marker(line: &str) -> bool {
    line.contains("[ApiController]")
}

/// Matches a controller class declaration and returns the display name with
/// the `Controller` suffix stripped.
///
/// A class named exactly `Controller` keeps its full identifier so the name
/// never comes out empty.
pub fn controller_declaration(line: &str) -> Option<String> {
    if line.trim_start().starts_with("//") {
        return None;
    }
    let caps = PATTERNS.controller_class.captures(line)?;
    let ident = caps.get(1)?.as_str();
    match ident.strip_suffix("Controller") {
        Some(stripped) if !stripped.is_empty() => Some(stripped.to_string()),
        _ => Some(ident.to_string()),
    }
}

/// Permissive scan for an explicit binding attribute in a parameter's text.
///
/// Tolerates arguments, named arguments and quotes after the attribute name.
pub fn explicit_binding(text: &str) -> Option<ParameterAnnotation> {
    if text.contains("[FromServices") {
        return Some(ParameterAnnotation::Services);
    }
    let source = if text.contains("[FromRoute") {
        BindingSource::Path
    } else if text.contains("[FromBody") {
        BindingSource::Body
    } else if text.contains("[FromQuery") {
        BindingSource::Query
    } else if text.contains("[FromHeader") {
        BindingSource::Header
    } else if text.contains("[FromForm") {
        BindingSource::Form
    } else {
        return None;
    };
    Some(ParameterAnnotation::Bind(source))
}

/// `Name = "..."` attribute argument, which overrides the variable name as
/// the wire-visible parameter name
pub fn name_argument(text: &str) -> Option<String> {
    PATTERNS
        .name_argument
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// Byte offset where a method signature starts on this line.
///
/// A signature line carries an access modifier ahead of a parameter-list
/// opener. Requiring the modifier before the first `(` keeps attribute
/// arguments like `[Authorize(Roles = "public")]` from being mistaken for
/// signatures.
pub fn signature_start(line: &str) -> Option<usize> {
    let paren = line.find('(')?;
    let modifier = PATTERNS.access_modifier.find(line)?;
    (modifier.start() < paren).then_some(modifier.start())
}

/// Removes leading `[...]` attribute groups from a parameter declaration.
///
/// Bracket matching is depth- and string-aware so `[FromQuery(Name = "a[0]")]`
/// strips cleanly. Array syntax in the declared type (`int[] ids`) survives
/// because it never leads the text.
pub fn strip_attribute_groups(text: &str) -> &str {
    let mut rest = text.trim_start();
    while rest.starts_with('[') {
        match attribute_group_end(rest) {
            Some(end) => rest = rest[end + 1..].trim_start(),
            None => break,
        }
    }
    rest
}

fn attribute_group_end(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth: i64 = 0;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i = csharp::skip_string_literal(bytes, i);
                continue;
            }
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_attribute_with_and_without_template() {
        let (method, route) = parse_verb_attribute(r#"    [HttpGet("{id}")]"#).expect("matches");
        assert_eq!(method, HttpMethod::Get);
        assert_eq!(route.as_deref(), Some("{id}"));

        let (method, route) = parse_verb_attribute("[HttpPost]").expect("matches");
        assert_eq!(method, HttpMethod::Post);
        assert_eq!(route, None);
    }

    #[test]
    fn verb_attribute_ignores_empty_template_and_lookalikes() {
        let (_, route) = parse_verb_attribute(r#"[HttpGet("")]"#).expect("matches");
        assert_eq!(route, None);

        assert!(parse_verb_attribute("[HttpGetAll]").is_none());
        assert!(parse_verb_attribute("var x = HttpGet();").is_none());
    }

    #[test]
    fn route_attribute_extracts_template() {
        assert_eq!(
            parse_route_attribute(r#"[Route("api/[controller]")]"#).as_deref(),
            Some("api/[controller]")
        );
        assert_eq!(parse_route_attribute("[HttpGet(\"x\")]"), None);
    }

    #[test]
    fn controller_declaration_strips_suffix() {
        assert_eq!(
            controller_declaration("public class UsersController : ControllerBase").as_deref(),
            Some("Users")
        );
        assert_eq!(
            controller_declaration("internal sealed class OrderController : Controller").as_deref(),
            Some("Order")
        );
        assert_eq!(controller_declaration("public class UserService").as_deref(), None);
        assert_eq!(
            controller_declaration("// public class GhostController").as_deref(),
            None
        );
    }

    #[test]
    fn controller_named_exactly_controller_keeps_identifier() {
        assert_eq!(
            controller_declaration("public class Controller : ControllerBase").as_deref(),
            Some("Controller")
        );
    }

    #[test]
    fn explicit_binding_recognizes_each_source() {
        assert_eq!(
            explicit_binding("[FromBody] CreateUserDto dto"),
            Some(ParameterAnnotation::Bind(BindingSource::Body))
        );
        assert_eq!(
            explicit_binding(r#"[FromQuery(Name = "q")] string text"#),
            Some(ParameterAnnotation::Bind(BindingSource::Query))
        );
        assert_eq!(
            explicit_binding("[FromServices] IUserService users"),
            Some(ParameterAnnotation::Services)
        );
        assert_eq!(explicit_binding("int id"), None);
    }

    #[test]
    fn name_argument_reads_attribute_override() {
        assert_eq!(
            name_argument(r#"[FromHeader(Name = "X-Api-Key")] string key"#).as_deref(),
            Some("X-Api-Key")
        );
        assert_eq!(name_argument("[FromHeader] string key"), None);
    }

    #[test]
    fn signature_start_requires_modifier_before_paren() {
        let line = "    public async Task<IActionResult> Get(int id)";
        assert_eq!(signature_start(line), Some(4));

        assert_eq!(signature_start(r#"[Authorize(Roles = "public")]"#), None);
        assert_eq!(signature_start("public int Count;"), None);
    }

    #[test]
    fn strip_attribute_groups_keeps_array_types() {
        assert_eq!(strip_attribute_groups("[FromQuery] int[] ids"), "int[] ids");
        assert_eq!(
            strip_attribute_groups(r#"[FromQuery(Name = "a[0]")] string first"#),
            "string first"
        );
        assert_eq!(
            strip_attribute_groups("[FromBody][Required] CreateUserDto dto"),
            "CreateUserDto dto"
        );
        assert_eq!(strip_attribute_groups("int id"), "int id");
    }
}
