//! Boundary to an external payload-generation service. The service itself
//! (model choice, prompting, transport) lives in the host; this module only
//! shapes what goes out and validates what comes back.

use crate::error::PayloadError;
use crate::models::{BindingSource, ClassProperty, Endpoint, SynthesizedRequest};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Everything a generation service needs to invent a realistic body
#[derive(Debug, Clone, Serialize)]
pub struct PayloadContext {
    /// HTTP method ("POST", ...)
    pub method: String,
    /// Route template with placeholders intact
    pub route: String,
    /// All parameters with their bindings
    pub parameters: Vec<ContextParameter>,
    /// Resolved property tree of the body parameter, when available
    pub properties: Vec<ClassProperty>,
    /// Raw source of the body type's definition, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition_text: Option<String>,
}

/// Parameter slice of a [`PayloadContext`]
#[derive(Debug, Clone, Serialize)]
pub struct ContextParameter {
    pub name: String,
    pub declared_type: String,
    pub source: BindingSource,
    pub required: bool,
}

/// Seam for the generation service
pub trait PayloadGenerator {
    /// Produces raw JSON text for the given context
    fn generate(&self, context: &PayloadContext) -> anyhow::Result<String>;
}

/// Builds the context object sent to a payload generator
pub fn payload_context(endpoint: &Endpoint) -> PayloadContext {
    let body = endpoint
        .parameters
        .iter()
        .find(|p| p.source == BindingSource::Body);

    PayloadContext {
        method: endpoint.http_method.to_string(),
        route: endpoint.route.clone(),
        parameters: endpoint
            .parameters
            .iter()
            .map(|p| ContextParameter {
                name: p.name.clone(),
                declared_type: p.declared_type.clone(),
                source: p.source,
                required: p.required,
            })
            .collect(),
        properties: body
            .and_then(|p| p.resolution.properties())
            .map(|props| props.to_vec())
            .unwrap_or_default(),
        definition_text: body.and_then(|p| p.definition_text.clone()),
    }
}

/// Replaces a request's body with externally generated JSON.
///
/// Generators occasionally return an array where an object was asked for;
/// the first element is taken in that case. Anything that is not an object
/// in the end is rejected so a garbage body never silently replaces a good
/// skeleton. Field notes describe the synthesized skeleton, so they are
/// dropped along with it.
pub fn apply_generated_payload(
    request: &mut SynthesizedRequest,
    raw: &str,
) -> Result<(), PayloadError> {
    let parsed: Value = serde_json::from_str(raw)?;

    let object = match parsed {
        Value::Object(map) => Value::Object(map),
        Value::Array(items) => {
            debug!(len = items.len(), "generated payload was an array, taking first element");
            match items.into_iter().next() {
                Some(Value::Object(map)) => Value::Object(map),
                _ => return Err(PayloadError::NotAnObject),
            }
        }
        _ => return Err(PayloadError::NotAnObject),
    };

    request.body = Some(object);
    request.notes.clear();
    Ok(())
}
