use serde::{Deserialize, Serialize};

/// Name of the sentinel property used when a "class" resolves to an enum
pub const ENUM_SENTINEL: &str = "__enum__";

/// Enum membership attached to a resolved property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumInfo {
    /// First declared member, used as the synthesized sample
    pub first_value: String,
    /// All declared members in source order
    pub values: Vec<String>,
}

/// One property of a resolved class, possibly with its own resolved children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProperty {
    /// Property name as declared
    pub name: String,
    /// Declared C# type, verbatim
    pub declared_type: String,
    /// Whether the property is non-nullable
    pub required: bool,
    /// Enum membership when the property type resolved to an enum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_info: Option<EnumInfo>,
    /// Recursively resolved child properties (empty for leaves)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ClassProperty>,
}

impl ClassProperty {
    /// Creates a leaf property with no children
    pub fn leaf(name: impl Into<String>, declared_type: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            required,
            enum_info: None,
            properties: Vec::new(),
        }
    }

    /// Sentinel row standing in for a type that is itself an enum
    pub fn enum_sentinel(type_name: impl Into<String>, info: EnumInfo) -> Self {
        Self {
            name: ENUM_SENTINEL.to_string(),
            declared_type: type_name.into(),
            required: true,
            enum_info: Some(info),
            properties: Vec::new(),
        }
    }
}

/// Detects the enum sentinel in a resolved property list
pub fn as_enum_sentinel(properties: &[ClassProperty]) -> Option<&EnumInfo> {
    match properties {
        [only] if only.name == ENUM_SENTINEL => only.enum_info.as_ref(),
        _ => None,
    }
}
