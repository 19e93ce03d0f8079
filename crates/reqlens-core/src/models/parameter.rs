use crate::models::ClassProperty;
use serde::{Deserialize, Serialize};

/// Where a parameter's value is read from on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingSource {
    /// Route placeholder segment
    Path,
    /// Query string entry
    Query,
    /// JSON request body
    Body,
    /// HTTP header
    Header,
    /// Form-encoded field or uploaded file
    Form,
}

impl BindingSource {
    /// Lowercase label for reports ("path", "query", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingSource::Path => "path",
            BindingSource::Query => "query",
            BindingSource::Body => "body",
            BindingSource::Header => "header",
            BindingSource::Form => "form",
        }
    }
}

/// Outcome of type resolution for a parameter.
///
/// `Failed` is distinct from `NotAttempted`: a recorded failure suppresses
/// repeat workspace searches, while an untried parameter is fair game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ResolutionState {
    /// Resolution has not been tried yet
    #[default]
    NotAttempted,
    /// Resolution ran and found no usable definition
    Failed,
    /// Resolution produced a property tree
    Resolved(Vec<ClassProperty>),
}

impl ResolutionState {
    /// Whether resolution has run at all
    pub fn is_attempted(&self) -> bool {
        !matches!(self, ResolutionState::NotAttempted)
    }

    /// Whether resolution ran and failed
    pub fn is_failed(&self) -> bool {
        matches!(self, ResolutionState::Failed)
    }

    /// Resolved properties, if any
    pub fn properties(&self) -> Option<&[ClassProperty]> {
        match self {
            ResolutionState::Resolved(props) => Some(props),
            _ => None,
        }
    }
}

/// Action parameter with its inferred binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Wire name (attribute Name= override wins over the variable name)
    pub name: String,
    /// Declared C# type, verbatim (e.g., "List<OrderItem>?")
    pub declared_type: String,
    /// Binding source (explicit attribute or inferred)
    pub source: BindingSource,
    /// Whether a value must be supplied
    pub required: bool,
    /// Type resolution outcome
    #[serde(default)]
    pub resolution: ResolutionState,
    /// Raw definition text of the resolved type, for assist prompts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition_text: Option<String>,
}

impl Parameter {
    /// Creates an unresolved parameter
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        source: BindingSource,
        required: bool,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            source,
            required,
            resolution: ResolutionState::NotAttempted,
            definition_text: None,
        }
    }
}
