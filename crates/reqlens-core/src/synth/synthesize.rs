use crate::models::{
    as_enum_sentinel, BindingSource, ClassProperty, Endpoint, Environment, EnumInfo, FieldNote,
    RequestWarning, ResolutionState, SynthesizedRequest,
};
use crate::parsers::types::{is_collection, is_file_like, is_simple_type, unwrap_type};
use crate::synth::values::{sample_json_value, sample_text_value};
use indexmap::IndexMap;
use serde_json::{json, Value};

/// Placeholder for file-typed form fields the user must attach themselves
pub const FILE_SENTINEL: &str = "<file>";

/// Builds concrete requests out of endpoints and environments.
///
/// Synthesis is pure and deterministic: no I/O, no randomness, so the same
/// endpoint against the same environment always yields the same request and
/// regeneration never churns a saved collection.
pub struct RequestSynthesizer;

impl RequestSynthesizer {
    /// Creates a new synthesizer
    pub fn new() -> Self {
        Self
    }

    /// Builds a request for `endpoint` aimed at `environment`
    pub fn synthesize(&self, endpoint: &Endpoint, environment: &Environment) -> SynthesizedRequest {
        let mut warnings = Vec::new();
        let mut notes = Vec::new();

        let mut route = endpoint.route.clone();
        for param in &endpoint.parameters {
            if param.source == BindingSource::Path {
                let placeholder = format!("{{{}}}", param.name);
                let sample = sample_text_value(&unwrap_type(&param.declared_type));
                route = route.replace(&placeholder, &sample);
            }
        }
        let url = join_url(&environment.base_url, &environment.base_path, &route);

        let mut query = IndexMap::new();
        for param in &endpoint.parameters {
            if param.source == BindingSource::Query {
                query.insert(
                    param.name.clone(),
                    sample_text_value(&unwrap_type(&param.declared_type)),
                );
            }
        }

        let mut headers = environment.headers.clone();
        for param in &endpoint.parameters {
            if param.source == BindingSource::Header {
                headers.insert(
                    param.name.clone(),
                    sample_text_value(&unwrap_type(&param.declared_type)),
                );
            }
        }

        let body = self.build_body(endpoint, &mut warnings, &mut notes);
        let form = self.build_form(endpoint, &mut warnings);

        SynthesizedRequest {
            method: endpoint.http_method,
            url,
            headers,
            query,
            body,
            form,
            warnings,
            notes,
        }
    }

    /// JSON skeleton for the first body-bound parameter, if any.
    ///
    /// Enum-valued fields get the enum's first member as the sample and a
    /// note listing every allowed value, since the body itself stays plain
    /// JSON.
    fn build_body(
        &self,
        endpoint: &Endpoint,
        warnings: &mut Vec<RequestWarning>,
        notes: &mut Vec<FieldNote>,
    ) -> Option<Value> {
        let param = endpoint
            .parameters
            .iter()
            .find(|p| p.source == BindingSource::Body)?;
        let bare = unwrap_type(&param.declared_type);

        // [FromBody] string raw and friends: a bare typed sample, no
        // resolution involved
        if is_simple_type(&bare) {
            let value = sample_json_value(&bare);
            return Some(wrap_if_collection(&param.declared_type, value));
        }

        match &param.resolution {
            ResolutionState::Resolved(props) => {
                let value = match as_enum_sentinel(props) {
                    Some(info) => {
                        notes.push(allowed_values_note(&param.name, info));
                        json!(info.first_value)
                    }
                    None => {
                        let mut object = serde_json::Map::new();
                        for prop in props {
                            object.insert(prop.name.clone(), property_value(prop, &prop.name, notes));
                        }
                        Value::Object(object)
                    }
                };
                Some(wrap_if_collection(&param.declared_type, value))
            }
            ResolutionState::Failed => {
                warnings.push(RequestWarning {
                    field: param.name.clone(),
                    message: format!(
                        "type '{}' was not found in the searched workspace",
                        param.declared_type
                    ),
                    suggestion: "define the type in the workspace or edit the body by hand"
                        .to_string(),
                });
                Some(json!(format!("<unresolved type: {}>", param.declared_type)))
            }
            ResolutionState::NotAttempted => {
                warnings.push(RequestWarning {
                    field: param.name.clone(),
                    message: format!("type '{}' has not been resolved yet", param.declared_type),
                    suggestion: "run type resolution, then regenerate the request".to_string(),
                });
                Some(json!(format!("<unresolved type: {}>", param.declared_type)))
            }
        }
    }

    /// Flattened form fields for form-bound parameters, if any
    fn build_form(
        &self,
        endpoint: &Endpoint,
        warnings: &mut Vec<RequestWarning>,
    ) -> Option<IndexMap<String, String>> {
        let mut form: Option<IndexMap<String, String>> = None;

        for param in &endpoint.parameters {
            if param.source != BindingSource::Form {
                continue;
            }
            let fields = form.get_or_insert_with(IndexMap::new);

            if is_file_like(&param.declared_type) {
                fields.insert(param.name.clone(), FILE_SENTINEL.to_string());
                continue;
            }

            let bare = unwrap_type(&param.declared_type);
            if is_simple_type(&bare) {
                fields.insert(param.name.clone(), sample_text_value(&bare));
                continue;
            }

            match &param.resolution {
                ResolutionState::Resolved(props) => match as_enum_sentinel(props) {
                    Some(info) => {
                        fields.insert(param.name.clone(), info.first_value.clone());
                    }
                    None => {
                        for prop in props {
                            flatten_property(prop, None, fields);
                        }
                    }
                },
                _ => {
                    warnings.push(RequestWarning {
                        field: param.name.clone(),
                        message: format!(
                            "type '{}' is not resolved, form fields are incomplete",
                            param.declared_type
                        ),
                        suggestion: "resolve the type or fill the form fields by hand".to_string(),
                    });
                    fields.insert(param.name.clone(), "<unresolved>".to_string());
                }
            }
        }

        form
    }
}

impl Default for RequestSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample JSON for one resolved property, recursing into children
fn property_value(prop: &ClassProperty, path: &str, notes: &mut Vec<FieldNote>) -> Value {
    if let Some(info) = &prop.enum_info {
        notes.push(allowed_values_note(path, info));
        return wrap_if_collection(&prop.declared_type, json!(info.first_value));
    }

    let value = if prop.properties.is_empty() {
        sample_json_value(&unwrap_type(&prop.declared_type))
    } else {
        let mut object = serde_json::Map::new();
        for child in &prop.properties {
            let child_path = format!("{}.{}", path, child.name);
            object.insert(child.name.clone(), property_value(child, &child_path, notes));
        }
        Value::Object(object)
    };

    wrap_if_collection(&prop.declared_type, value)
}

fn allowed_values_note(path: &str, info: &EnumInfo) -> FieldNote {
    FieldNote {
        field: path.to_string(),
        text: format!("allowed values: {}", info.values.join(", ")),
    }
}

fn wrap_if_collection(declared: &str, value: Value) -> Value {
    if is_collection(declared) {
        json!([value])
    } else {
        value
    }
}

/// Dotted-key flattening for form payloads ("Address.City")
fn flatten_property(prop: &ClassProperty, prefix: Option<&str>, fields: &mut IndexMap<String, String>) {
    let key = match prefix {
        Some(p) => format!("{}.{}", p, prop.name),
        None => prop.name.clone(),
    };

    if let Some(info) = &prop.enum_info {
        fields.insert(key, info.first_value.clone());
        return;
    }
    if !prop.properties.is_empty() {
        for child in &prop.properties {
            flatten_property(child, Some(&key), fields);
        }
        return;
    }
    if is_file_like(&prop.declared_type) {
        fields.insert(key, FILE_SENTINEL.to_string());
    } else {
        fields.insert(key, sample_text_value(&unwrap_type(&prop.declared_type)));
    }
}

/// Joins base URL, base path and route with single slashes at each seam
fn join_url(base_url: &str, base_path: &str, route: &str) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();
    for part in [base_path, route] {
        let part = part.trim_matches('/');
        if !part.is_empty() {
            url.push('/');
            url.push_str(part);
        }
    }
    collapse_duplicate_slashes(&url)
}

/// Collapses runs of slashes, leaving the scheme's "//" alone
fn collapse_duplicate_slashes(url: &str) -> String {
    let (scheme, rest) = match url.find("://") {
        Some(i) => url.split_at(i + 3),
        None => ("", url),
    };

    let mut out = String::with_capacity(url.len());
    out.push_str(scheme);
    let mut previous_was_slash = false;
    for ch in rest.chars() {
        if ch == '/' {
            if previous_was_slash {
                continue;
            }
            previous_was_slash = true;
        } else {
            previous_was_slash = false;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnumInfo, HttpMethod, Location, Parameter};

    fn endpoint(method: HttpMethod, route: &str, parameters: Vec<Parameter>) -> Endpoint {
        Endpoint {
            http_method: method,
            route: route.to_string(),
            parameters,
            return_type: "IActionResult".to_string(),
            method_name: "Action".to_string(),
            controller_name: "Tests".to_string(),
            location: Location::line("Tests.cs", 1),
        }
    }

    fn environment() -> Environment {
        let mut env = Environment::default();
        env.headers.insert("X-Api-Key".to_string(), "secret".to_string());
        env
    }

    #[test]
    fn substitutes_path_placeholders_and_orders_query() {
        let ep = endpoint(
            HttpMethod::Get,
            "/api/users/{id}",
            vec![
                Parameter::new("id", "int", BindingSource::Path, true),
                Parameter::new("page", "int?", BindingSource::Query, false),
                Parameter::new("filter", "string", BindingSource::Query, true),
            ],
        );

        let request = RequestSynthesizer::new().synthesize(&ep, &environment());

        assert_eq!(request.url, "http://localhost:5000/api/users/1");
        let entries: Vec<(&str, &str)> = request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(entries, vec![("page", "1"), ("filter", "string")]);
        assert!(request.body.is_none());
    }

    #[test]
    fn merges_environment_headers_with_header_parameters() {
        let ep = endpoint(
            HttpMethod::Get,
            "/api/ping",
            vec![Parameter::new("tenant", "string", BindingSource::Header, false)],
        );

        let request = RequestSynthesizer::new().synthesize(&ep, &environment());

        assert_eq!(request.headers.get("X-Api-Key").map(String::as_str), Some("secret"));
        assert_eq!(request.headers.get("tenant").map(String::as_str), Some("string"));
    }

    #[test]
    fn base_path_is_inserted_between_host_and_route() {
        let mut env = environment();
        env.base_url = "http://localhost:5000/".to_string();
        env.base_path = "/service/".to_string();

        let ep = endpoint(HttpMethod::Get, "/api/ping", vec![]);
        let request = RequestSynthesizer::new().synthesize(&ep, &env);

        assert_eq!(request.url, "http://localhost:5000/service/api/ping");
    }

    #[test]
    fn body_skeleton_follows_the_resolved_property_tree() {
        let mut param = Parameter::new("request", "CreateOrder", BindingSource::Body, true);
        param.resolution = ResolutionState::Resolved(vec![
            ClassProperty::leaf("CustomerId", "Guid", true),
            ClassProperty {
                name: "Status".to_string(),
                declared_type: "OrderStatus".to_string(),
                required: true,
                enum_info: Some(EnumInfo {
                    first_value: "Draft".to_string(),
                    values: vec!["Draft".to_string(), "Submitted".to_string()],
                }),
                properties: Vec::new(),
            },
            ClassProperty {
                name: "Items".to_string(),
                declared_type: "List<OrderItem>".to_string(),
                required: true,
                enum_info: None,
                properties: vec![ClassProperty::leaf("Sku", "string", true)],
            },
        ]);

        let ep = endpoint(HttpMethod::Post, "/api/orders", vec![param]);
        let request = RequestSynthesizer::new().synthesize(&ep, &environment());

        assert_eq!(
            request.body,
            Some(serde_json::json!({
                "CustomerId": "00000000-0000-0000-0000-000000000000",
                "Status": "Draft",
                "Items": [{ "Sku": "string" }]
            }))
        );
        assert!(request.warnings.is_empty());
        assert_eq!(request.notes.len(), 1);
        assert_eq!(request.notes[0].field, "Status");
        assert_eq!(request.notes[0].text, "allowed values: Draft, Submitted");
    }

    #[test]
    fn enum_typed_bodies_carry_an_allowed_values_note() {
        let mut param = Parameter::new("status", "OrderStatus", BindingSource::Body, true);
        param.resolution = ResolutionState::Resolved(vec![ClassProperty::enum_sentinel(
            "OrderStatus",
            EnumInfo {
                first_value: "Draft".to_string(),
                values: vec!["Draft".to_string(), "Submitted".to_string(), "Paid".to_string()],
            },
        )]);

        let ep = endpoint(HttpMethod::Post, "/api/orders/status", vec![param]);
        let request = RequestSynthesizer::new().synthesize(&ep, &environment());

        assert_eq!(request.body, Some(serde_json::json!("Draft")));
        assert_eq!(request.notes.len(), 1);
        assert_eq!(request.notes[0].field, "status");
        assert_eq!(request.notes[0].text, "allowed values: Draft, Submitted, Paid");
    }

    #[test]
    fn failed_resolution_leaves_a_placeholder_and_a_warning() {
        let mut param = Parameter::new("request", "MysteryDto", BindingSource::Body, true);
        param.resolution = ResolutionState::Failed;

        let ep = endpoint(HttpMethod::Post, "/api/things", vec![param]);
        let request = RequestSynthesizer::new().synthesize(&ep, &environment());

        assert_eq!(request.body, Some(serde_json::json!("<unresolved type: MysteryDto>")));
        assert_eq!(request.warnings.len(), 1);
        assert_eq!(request.warnings[0].field, "request");
        assert!(request.warnings[0].message.contains("MysteryDto"));
    }

    #[test]
    fn simple_body_types_synthesize_without_resolution() {
        let ep = endpoint(
            HttpMethod::Post,
            "/api/names",
            vec![Parameter::new("name", "string", BindingSource::Body, true)],
        );
        let request = RequestSynthesizer::new().synthesize(&ep, &environment());
        assert_eq!(request.body, Some(serde_json::json!("string")));
    }

    #[test]
    fn form_flattens_nested_properties_and_marks_files() {
        let mut dto = Parameter::new("upload", "UploadRequest", BindingSource::Form, true);
        dto.resolution = ResolutionState::Resolved(vec![
            ClassProperty::leaf("Title", "string", true),
            ClassProperty {
                name: "Meta".to_string(),
                declared_type: "UploadMeta".to_string(),
                required: true,
                enum_info: None,
                properties: vec![ClassProperty::leaf("Origin", "string", true)],
            },
        ]);
        let file = Parameter::new("file", "IFormFile", BindingSource::Form, true);

        let ep = endpoint(HttpMethod::Post, "/api/uploads", vec![dto, file]);
        let request = RequestSynthesizer::new().synthesize(&ep, &environment());
        let form = request.form.expect("form fields");

        assert_eq!(form.get("Title").map(String::as_str), Some("string"));
        assert_eq!(form.get("Meta.Origin").map(String::as_str), Some("string"));
        assert_eq!(form.get("file").map(String::as_str), Some(FILE_SENTINEL));
        assert!(request.body.is_none());
    }

    #[test]
    fn synthesis_is_deterministic() {
        let ep = endpoint(
            HttpMethod::Get,
            "/api/users/{id}",
            vec![
                Parameter::new("id", "Guid", BindingSource::Path, true),
                Parameter::new("sort", "string", BindingSource::Query, false),
            ],
        );
        let synthesizer = RequestSynthesizer::new();

        let first = synthesizer.synthesize(&ep, &environment());
        let second = synthesizer.synthesize(&ep, &environment());

        assert_eq!(first, second);
    }
}
