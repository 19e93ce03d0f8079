use reqlens_aspnet::EndpointScanner;
use reqlens_core::models::{BindingSource, Document, Environment, HttpMethod};
use reqlens_core::resolve::{FsWorkspace, TypeResolver};
use reqlens_core::synth::RequestSynthesizer;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Lays out a small ASP.NET project on disk and returns the workspace root
/// and controller path.
fn write_project(controller: &str, models: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir_all(dir.path().join("Controllers")).expect("mkdir Controllers");
    fs::create_dir_all(dir.path().join("Models")).expect("mkdir Models");

    let controller_path = dir.path().join("Controllers/OrdersController.cs");
    fs::write(&controller_path, controller).expect("write controller");
    for (name, text) in models {
        fs::write(dir.path().join("Models").join(name), text).expect("write model");
    }
    (dir, controller_path)
}

#[test]
fn scanned_endpoint_resolves_and_synthesizes_a_full_request() {
    let controller = r#"
using Microsoft.AspNetCore.Mvc;

namespace Shop.Controllers
{
    [ApiController]
    [Route("api/[controller]")]
    public class OrdersController : ControllerBase
    {
        [HttpGet("{id}")]
        public async Task<ActionResult<Order>> GetOrder(Guid id)
        {
            return Ok();
        }

        [HttpPost]
        public async Task<IActionResult> Create([FromBody] CreateOrder request)
        {
            return Ok();
        }
    }
}
"#;
    let create_order = r#"
namespace Shop.Models
{
    /// <summary>Payload for creating an order.</summary>
    public class CreateOrder
    {
        public Guid CustomerId { get; set; }
        public OrderStatus Status { get; set; }
        public List<OrderItem> Items { get; set; }
        public string? Note { get; set; }
    }
}
"#;
    let order_item = r#"
namespace Shop.Models
{
    public class OrderItem
    {
        public string Sku { get; set; }
        public int Quantity { get; set; }
    }
}
"#;
    let order_status = r#"
namespace Shop.Models
{
    public enum OrderStatus
    {
        Draft,
        Submitted,
        Shipped
    }
}
"#;
    let (dir, controller_path) = write_project(
        controller,
        &[
            ("CreateOrder.cs", create_order),
            ("OrderItem.cs", order_item),
            ("OrderStatus.cs", order_status),
        ],
    );

    // 1. Scan the controller document
    let document = Document::read(&controller_path).expect("read controller");
    let mut endpoints = EndpointScanner::new().scan(&document);
    assert_eq!(endpoints.len(), 2, "expected GET and POST endpoints");

    let get = endpoints
        .iter()
        .find(|e| e.http_method == HttpMethod::Get)
        .expect("GET endpoint");
    assert_eq!(get.route, "/api/orders/{id}");
    assert_eq!(get.parameters[0].source, BindingSource::Path);

    // 2. Resolve the POST body parameter across the workspace
    let mut resolver = TypeResolver::new(FsWorkspace::new(dir.path()));
    let create = endpoints
        .iter_mut()
        .find(|e| e.http_method == HttpMethod::Post)
        .expect("POST endpoint");
    resolver
        .resolve_parameters(create, &document)
        .expect("resolution should not be cancelled");

    let body_param = &create.parameters[0];
    let properties = body_param
        .resolution
        .properties()
        .expect("CreateOrder should resolve");
    assert_eq!(properties.len(), 4);
    let status = properties.iter().find(|p| p.name == "Status").expect("Status");
    assert_eq!(
        status.enum_info.as_ref().map(|i| i.first_value.as_str()),
        Some("Draft")
    );
    let items = properties.iter().find(|p| p.name == "Items").expect("Items");
    assert_eq!(items.properties.len(), 2, "OrderItem fields expand inline");
    assert!(
        body_param
            .definition_text
            .as_deref()
            .expect("definition text")
            .contains("Payload for creating an order"),
        "doc comment window should ride along"
    );

    // 3. Synthesize the request against the default environment
    let request = RequestSynthesizer::new().synthesize(create, &Environment::default());
    assert_eq!(request.url, "http://localhost:5000/api/orders");
    assert_eq!(
        request.body,
        Some(serde_json::json!({
            "CustomerId": "00000000-0000-0000-0000-000000000000",
            "Status": "Draft",
            "Items": [{ "Sku": "string", "Quantity": 1 }],
            "Note": "string"
        }))
    );
    assert!(request.warnings.is_empty());
    let status_note = request
        .notes
        .iter()
        .find(|n| n.field == "Status")
        .expect("enum field should carry a note");
    assert_eq!(status_note.text, "allowed values: Draft, Submitted, Shipped");
}

#[test]
fn missing_body_type_degrades_to_placeholder_and_warning() {
    let controller = r#"
[ApiController]
[Route("api/[controller]")]
public class GhostsController : ControllerBase
{
    [HttpPost]
    public IActionResult Create([FromBody] GhostDto ghost)
    {
        return Ok();
    }
}
"#;
    let (dir, controller_path) = write_project(controller, &[]);

    let document = Document::read(&controller_path).expect("read controller");
    let mut endpoints = EndpointScanner::new().scan(&document);
    assert_eq!(endpoints.len(), 1);

    let mut resolver = TypeResolver::new(FsWorkspace::new(dir.path()));
    resolver
        .resolve_parameters(&mut endpoints[0], &document)
        .expect("failure is not an error");
    assert!(endpoints[0].parameters[0].resolution.is_failed());

    let request = RequestSynthesizer::new().synthesize(&endpoints[0], &Environment::default());
    assert_eq!(
        request.body,
        Some(serde_json::json!("<unresolved type: GhostDto>"))
    );
    assert_eq!(request.warnings.len(), 1);
    assert_eq!(request.warnings[0].field, "ghost");
    assert!(!request.warnings[0].suggestion.is_empty());
}
