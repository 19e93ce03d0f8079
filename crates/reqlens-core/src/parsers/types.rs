//! Heuristics over declared C# type text: container unwrapping, the simple
//! type allow-list, file-upload detection and enum-likelihood naming rules.

/// Single-argument containers peeled off to reach the element type
const CONTAINERS: &[&str] = &[
    "List",
    "IList",
    "IEnumerable",
    "IAsyncEnumerable",
    "ICollection",
    "IReadOnlyList",
    "IReadOnlyCollection",
    "ISet",
    "HashSet",
    "Task",
    "ValueTask",
    "ActionResult",
    "Nullable",
];

/// Types bindable straight from a query string or route segment.
///
/// Lowercased C# keywords, their System names, and the SQL-flavored numeric
/// synonyms that show up in scaffolded entity code.
const SIMPLE_TYPES: &[&str] = &[
    "int", "int16", "int32", "int64", "long", "short", "byte", "sbyte", "uint", "ulong", "ushort",
    "uint16", "uint32", "uint64", "float", "single", "double", "decimal", "bool", "boolean",
    "string", "char", "guid", "datetime", "datetimeoffset", "dateonly", "timeonly", "timespan",
    "bigint", "smallint", "tinyint", "numeric", "real", "money",
];

/// Type-name suffixes that usually mean "this is an enum"
const ENUM_SUFFIXES: &[&str] = &[
    "Enum", "Type", "Status", "State", "Mode", "Level", "Category", "Kind", "Style", "Sort",
    "Order", "Direction", "Priority", "Severity",
];

/// Parameter-name fragments that usually mean "this holds an enum value"
const ENUM_NAME_HINTS: &[&str] = &[
    "status", "type", "mode", "kind", "level", "category", "sort", "order", "direction",
    "priority", "severity", "state", "format",
];

/// Peels nullability markers, array suffixes and known single-argument
/// containers until the underlying declared type is reached.
///
/// `List<OrderItem>?` and `OrderItem[]` both come out as `OrderItem`.
/// Multi-argument generics like `Dictionary<string, int>` are left alone.
pub fn unwrap_type(declared: &str) -> String {
    let mut current = declared.trim().to_string();

    loop {
        let before = current.clone();

        if let Some(stripped) = current.strip_suffix('?') {
            current = stripped.trim_end().to_string();
        }
        if let Some(stripped) = current.strip_suffix("[]") {
            current = stripped.trim_end().to_string();
        }
        if current.ends_with('>') {
            if let Some(open) = current.find('<') {
                if CONTAINERS.contains(&&current[..open]) {
                    current = current[open + 1..current.len() - 1].trim().to_string();
                }
            }
        }

        if current == before {
            return current;
        }
    }
}

/// Whether a type name is on the simple-value allow-list.
///
/// Callers are expected to pass an unwrapped name; a stray trailing `?` is
/// tolerated anyway.
pub fn is_simple_type(name: &str) -> bool {
    let bare = name.trim().trim_end_matches('?');
    SIMPLE_TYPES.iter().any(|t| bare.eq_ignore_ascii_case(t))
}

/// Whether a declared type represents an uploaded file.
///
/// Checked on the raw declaration so `List<IFormFile>` still counts.
pub fn is_file_like(declared: &str) -> bool {
    declared.contains("IFormFile") || unwrap_type(declared) == "Stream"
}

/// Generic prefixes that mean "many values", as opposed to wrappers like
/// `Task` or `Nullable` that still hold one
const COLLECTION_PREFIXES: &[&str] = &[
    "List",
    "IList",
    "IEnumerable",
    "IAsyncEnumerable",
    "ICollection",
    "IReadOnlyList",
    "IReadOnlyCollection",
    "ISet",
    "HashSet",
];

/// Whether a declaration is array-shaped (`T[]`, `List<T>`, ...), which
/// decides if a synthesized JSON value gets wrapped in a one-element array.
pub fn is_collection(declared: &str) -> bool {
    let bare = declared.trim().trim_end_matches('?').trim_end();
    if bare.ends_with("[]") {
        return true;
    }
    match (bare.find('<'), bare.ends_with('>')) {
        (Some(open), true) => COLLECTION_PREFIXES.contains(&&bare[..open]),
        _ => false,
    }
}

/// Whether a type is probably an enum, judged by naming alone.
///
/// Two signals: a PascalCase type name ending in a known enum suffix, or a
/// parameter name containing an enum-ish fragment. Either one fires. This
/// deliberately misfires on DTOs named like `PaymentType`; the resolver
/// sorts the truth out when it finds the actual declaration, and the same
/// rule gates failure-retry so mid-edit enums get a second look.
pub fn looks_like_enum(type_name: &str, param_name: &str) -> bool {
    let type_name = type_name.trim();
    let pascal = type_name.starts_with(|c: char| c.is_ascii_uppercase())
        && type_name.chars().all(|c| c.is_alphanumeric() || c == '_');

    if pascal && ENUM_SUFFIXES.iter().any(|s| type_name.ends_with(s)) {
        return true;
    }

    let lowered = param_name.to_lowercase();
    !lowered.is_empty() && ENUM_NAME_HINTS.iter().any(|h| lowered.contains(h))
}
