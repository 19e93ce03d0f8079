use crate::models::{Location, Parameter};
use serde::{Deserialize, Serialize};

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
}

impl HttpMethod {
    const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
    ];

    /// Parse that swallows the error, for call sites that treat an unknown
    /// method as a non-match
    pub fn from_str_opt(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Uppercase wire form ("GET", "POST", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = ();

    // Case-insensitive without allocating
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| s.eq_ignore_ascii_case(method.as_str()))
            .ok_or(())
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP endpoint recovered from a controller action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// HTTP method of the action
    pub http_method: HttpMethod,
    /// Composed route template (e.g., "/api/users/{id}")
    pub route: String,
    /// Action parameters in declaration order
    pub parameters: Vec<Parameter>,
    /// Declared return type, verbatim (e.g., "Task<ActionResult<User>>")
    pub return_type: String,
    /// Action method name
    pub method_name: String,
    /// Controller name with the "Controller" suffix stripped
    pub controller_name: String,
    /// Location of the action in the originating document
    pub location: Location,
}

impl Endpoint {
    /// Short "GET /api/users/{id}" form for display
    pub fn signature(&self) -> String {
        format!("{} {}", self.http_method, self.route)
    }
}
