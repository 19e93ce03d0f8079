use crate::models::HttpMethod;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Concrete request synthesized from an endpoint and an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Full URL with path placeholders substituted
    pub url: String,
    /// Headers: environment defaults plus header-bound parameters
    pub headers: IndexMap<String, String>,
    /// Query entries for query-bound parameters, in declaration order
    pub query: IndexMap<String, String>,
    /// JSON body skeleton, when a body-bound parameter exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Flattened form fields, when form-bound parameters exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<IndexMap<String, String>>,
    /// Anything the user must fix by hand before firing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RequestWarning>,
    /// Explanatory commentary on body fields, e.g. an enum's allowed values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<FieldNote>,
}

/// Something wrong with the synthesized request, attached for inline display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestWarning {
    /// Field the warning refers to (parameter or property name)
    pub field: String,
    /// What went wrong
    pub message: String,
    /// Suggested fix
    pub suggestion: String,
}

/// Explanatory text for one body field, keyed by its dotted path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNote {
    /// Dotted path of the field inside the body ("Order.Status")
    pub field: String,
    /// What the reader should know about the generated value
    pub text: String,
}

/// Outcome of actually firing a request.
///
/// Transport failures are carried in `error`, never raised: sending is a
/// user-facing action and its failures are part of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Response status code, when a response arrived
    pub status: Option<u16>,
    /// Wall-clock duration of the exchange
    pub duration_ms: u64,
    /// Transport or timeout error text, when no response arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Response body text, when one arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Transport seam: whoever actually sends requests implements this
pub trait RequestExecutor {
    /// Fires the request and reports what happened
    fn execute(&self, request: &SynthesizedRequest, timeout: Duration) -> ExecutionReport;
}
