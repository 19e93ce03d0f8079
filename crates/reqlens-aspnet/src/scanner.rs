//! Document-level endpoint discovery: controller detection, class-body
//! brace walking and per-method signature assembly.

use crate::{attributes, classifier, routes};
use reqlens_core::models::{Document, Endpoint, HttpMethod, Location, Parameter};
use reqlens_core::parsers::csharp;
use tracing::{debug, trace};

/// Scans one document's text for controller endpoints.
///
/// Purely line/regex/brace driven. Anything the scanner cannot confidently
/// parse is skipped, never reported as an error: a document full of
/// unsupported syntax just yields fewer endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointScanner;

struct ControllerContext {
    name: String,
    route: Option<String>,
}

impl EndpointScanner {
    pub fn new() -> Self {
        Self
    }

    /// All endpoints declared in `document`, in source order.
    pub fn scan(&self, document: &Document) -> Vec<Endpoint> {
        let lines = document.lines();
        let mut endpoints = Vec::new();
        let mut idx = 0;

        while idx < lines.len() {
            let Some(name) = attributes::controller_declaration(lines[idx]) else {
                idx += 1;
                continue;
            };
            let Some(body) = csharp::body_range(&lines, idx) else {
                idx += 1;
                continue;
            };
            let context = ControllerContext {
                route: controller_route(&lines, idx),
                name,
            };
            // close_line == lines.len() means the body never closed; scan to EOF
            let limit = (body.close_line + 1).min(lines.len());

            trace!(
                controller = %context.name,
                route = ?context.route,
                "controller declaration found"
            );

            for line_idx in body.open_line..limit {
                if attributes::parse_verb_attribute(lines[line_idx]).is_some() {
                    if let Some(endpoint) =
                        parse_method(&lines, line_idx, limit, &context, &document.path)
                    {
                        endpoints.push(endpoint);
                    }
                }
            }

            idx = limit;
        }

        debug!(
            file = %document.path,
            endpoints = endpoints.len(),
            "document scan complete"
        );
        endpoints
    }
}

/// Controller-level route template, searched backward from the declaration.
///
/// The search stops at the `[ApiController]` marker so templates hanging off
/// unrelated, more distant declarations are not claimed.
fn controller_route(lines: &[&str], controller_line: usize) -> Option<String> {
    if let Some(route) = attributes::parse_route_attribute(lines[controller_line]) {
        return Some(route);
    }
    for idx in (0..controller_line).rev() {
        if let Some(route) = attributes::parse_route_attribute(lines[idx]) {
            return Some(route);
        }
        if attributes::is_api_controller_marker(lines[idx]) {
            return None;
        }
    }
    None
}

/// Parses one verb-annotated action starting at `verb_line`.
///
/// Collects stacked attributes down to the signature line, reassembles
/// multi-line parameter lists, then classifies every parameter. Returns
/// `None` whenever any stage fails to parse; the action is simply not an
/// endpoint.
fn parse_method(
    lines: &[&str],
    verb_line: usize,
    limit: usize,
    context: &ControllerContext,
    file: &str,
) -> Option<Endpoint> {
    let mut method: Option<HttpMethod> = None;
    let mut inline_route: Option<String> = None;
    let mut route_attribute: Option<String> = None;
    let mut signature_at: Option<(usize, usize)> = None;

    let mut idx = verb_line;
    while idx < limit {
        let line = lines[idx];

        if let Some((verb, template)) = attributes::parse_verb_attribute(line) {
            // first verb wins when several are stacked; the later ones get
            // their own scan pass
            if method.is_none() {
                method = Some(verb);
                inline_route = template;
            }
        } else if let Some(template) = attributes::parse_route_attribute(line) {
            route_attribute = Some(template);
        }

        if let Some(start) = attributes::signature_start(line) {
            signature_at = Some((idx, start));
            break;
        }

        let trimmed = line.trim();
        let attribute_or_comment =
            trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with("//");
        if idx > verb_line && !attribute_or_comment {
            // something other than a stacked attribute before any signature:
            // the verb annotation is orphaned
            return None;
        }
        idx += 1;
    }

    let (signature_line, start) = signature_at?;
    let mut signature = lines[signature_line][start..].trim_end().to_string();
    let mut idx = signature_line;
    while !signature.contains(')') && idx + 1 < limit {
        idx += 1;
        signature.push(' ');
        signature.push_str(lines[idx].trim());
    }

    let parameter_text = csharp::parenthesized(&signature)?;
    let head = &signature[..signature.find('(')?];
    let (return_type, method_name) = csharp::parse_signature_head(head)?;

    let parameters: Vec<Parameter> = csharp::split_top_level(parameter_text)
        .into_iter()
        .filter_map(classifier::classify)
        .collect();

    let route = routes::compose_route(
        context.route.as_deref(),
        &context.name,
        inline_route.as_deref(),
        route_attribute.as_deref(),
        &method_name,
        &parameters,
    );

    Some(Endpoint {
        http_method: method?,
        route,
        parameters,
        return_type,
        method_name,
        controller_name: context.name.clone(),
        location: Location::at(
            file,
            verb_line + 1,
            lines[verb_line].find('[').unwrap_or(0),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqlens_core::models::BindingSource;

    fn scan(text: &str) -> Vec<Endpoint> {
        EndpointScanner::new().scan(&Document::new("Controllers/Test.cs", text))
    }

    #[test]
    fn attributed_controller_with_inline_template() {
        let endpoints = scan(
            r#"
[ApiController]
[Route("api/[controller]")]
public class UsersController : ControllerBase
{
    [HttpGet("{id}")]
    public async Task<User> GetUser(int id)
    {
        return await _users.Find(id);
    }
}
"#,
        );
        assert_eq!(endpoints.len(), 1);
        let endpoint = &endpoints[0];
        assert_eq!(endpoint.http_method, HttpMethod::Get);
        assert_eq!(endpoint.route, "/api/users/{id}");
        assert_eq!(endpoint.method_name, "GetUser");
        assert_eq!(endpoint.controller_name, "Users");
        assert_eq!(endpoint.return_type, "Task<User>");
        assert_eq!(endpoint.parameters.len(), 1);
        assert_eq!(endpoint.parameters[0].name, "id");
        assert_eq!(endpoint.parameters[0].source, BindingSource::Path);
        assert!(endpoint.parameters[0].required);
    }

    #[test]
    fn method_name_fallback_without_controller_route() {
        let endpoints = scan(
            r#"
public class UsersController : ControllerBase
{
    [HttpPost]
    public async Task<IActionResult> Create([FromBody] CreateUserDto dto)
    {
        return Ok();
    }
}
"#,
        );
        assert_eq!(endpoints.len(), 1);
        let endpoint = &endpoints[0];
        assert_eq!(endpoint.http_method, HttpMethod::Post);
        assert_eq!(endpoint.route, "/users/Create");
        assert_eq!(endpoint.parameters.len(), 1);
        assert_eq!(endpoint.parameters[0].name, "dto");
        assert_eq!(endpoint.parameters[0].source, BindingSource::Body);
        assert!(endpoint.parameters[0].required);
    }

    #[test]
    fn nullable_and_defaulted_parameters_are_optional_query() {
        let endpoints = scan(
            r#"
public class SearchController : ControllerBase
{
    [HttpGet]
    public IActionResult Search(string? name, int page = 1)
    {
        return Ok();
    }
}
"#,
        );
        assert_eq!(endpoints.len(), 1);
        let parameters = &endpoints[0].parameters;
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].source, BindingSource::Query);
        assert!(!parameters[0].required);
        assert_eq!(parameters[1].source, BindingSource::Query);
        assert!(!parameters[1].required);
    }

    #[test]
    fn multi_line_signatures_reassemble() {
        let endpoints = scan(
            r#"
[ApiController]
[Route("api/[controller]")]
public class UsersController : ControllerBase
{
    [HttpPost("bulk")]
    public async Task<IActionResult> BulkCreate(
        [FromBody] List<CreateUserDto> items,
        CancellationToken cancellationToken)
    {
        return Ok();
    }
}
"#,
        );
        assert_eq!(endpoints.len(), 1);
        let endpoint = &endpoints[0];
        assert_eq!(endpoint.route, "/api/users/bulk");
        assert_eq!(endpoint.method_name, "BulkCreate");
        assert_eq!(endpoint.parameters.len(), 2);
        assert_eq!(endpoint.parameters[0].name, "items");
        assert_eq!(endpoint.parameters[0].declared_type, "List<CreateUserDto>");
        assert_eq!(endpoint.parameters[0].source, BindingSource::Body);
    }

    #[test]
    fn method_level_route_attribute_stands_alone() {
        let endpoints = scan(
            r#"
public class LegacyController
{
    [HttpGet]
    [Route("api/legacy/ping")]
    public IActionResult Ping()
    {
        return Ok();
    }
}
"#,
        );
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].route, "/api/legacy/ping");
    }

    #[test]
    fn stacked_verbs_produce_one_endpoint_each() {
        let endpoints = scan(
            r#"
[ApiController]
[Route("api/[controller]")]
public class HealthController : ControllerBase
{
    [HttpGet]
    [HttpHead]
    public IActionResult Check()
    {
        return Ok();
    }
}
"#,
        );
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].http_method, HttpMethod::Get);
        assert_eq!(endpoints[1].http_method, HttpMethod::Head);
        assert_eq!(endpoints[0].route, "/api/health");
        assert_eq!(endpoints[1].route, "/api/health");
    }

    #[test]
    fn placeholder_spellings_normalize_to_parameter_case() {
        let endpoints = scan(
            r#"
[ApiController]
[Route("api/[controller]")]
public class ItemsController : ControllerBase
{
    [HttpGet("{Id}/details")]
    public IActionResult Details(int id)
    {
        return Ok();
    }

    [HttpGet("legacy/:id")]
    public IActionResult Legacy(int id)
    {
        return Ok();
    }

    [HttpGet("{id:int}/typed")]
    public IActionResult Typed(int id)
    {
        return Ok();
    }
}
"#,
        );
        assert_eq!(endpoints.len(), 3);
        assert_eq!(endpoints[0].route, "/api/items/{id}/details");
        assert_eq!(endpoints[1].route, "/api/items/legacy/{id}");
        assert_eq!(endpoints[2].route, "/api/items/{id}/typed");
    }

    #[test]
    fn multiple_controllers_in_one_document() {
        let endpoints = scan(
            r#"
[ApiController]
[Route("api/[controller]")]
public class UsersController : ControllerBase
{
    [HttpGet]
    public IActionResult List() { return Ok(); }
}

[ApiController]
[Route("api/[controller]")]
public class OrdersController : ControllerBase
{
    [HttpGet]
    public IActionResult List() { return Ok(); }
}
"#,
        );
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].route, "/api/users");
        assert_eq!(endpoints[1].route, "/api/orders");
    }

    #[test]
    fn orphaned_verbs_and_constructors_yield_nothing() {
        let endpoints = scan(
            r#"
public class BrokenController : ControllerBase
{
    [HttpGet]
    var stray = 1;

    [HttpDelete]
    public BrokenController()
    {
    }
}
"#,
        );
        assert!(endpoints.is_empty());
    }

    #[test]
    fn truncated_class_body_still_yields_found_endpoints() {
        let endpoints = scan(
            r#"
[ApiController]
[Route("api/[controller]")]
public class DraftController : ControllerBase
{
    [HttpGet("status")]
    public IActionResult Status()
"#,
        );
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].route, "/api/draft/status");
    }

    #[test]
    fn location_points_at_the_verb_attribute() {
        let endpoints = scan("[ApiController]\n[Route(\"api/[controller]\")]\npublic class PingController : ControllerBase\n{\n    [HttpGet]\n    public IActionResult Ping() { return Ok(); }\n}\n");
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].location.file, "Controllers/Test.cs");
        assert_eq!(endpoints[0].location.line, 5);
        assert_eq!(endpoints[0].location.column, 4);
    }

    #[test]
    fn non_controller_text_is_ignored() {
        assert!(scan("").is_empty());
        assert!(scan("public class UserService { public void Run() { } }").is_empty());
        assert!(scan("not C# at all ~~~").is_empty());
    }
}
