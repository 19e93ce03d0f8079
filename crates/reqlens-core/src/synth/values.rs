//! Deterministic sample values per declared C# type. The same declaration
//! always yields the same value, so regenerating a request is a no-op diff.

use serde_json::{json, Value};

/// Sample for a JSON body slot, typed to match the declaration
pub fn sample_json_value(ty: &str) -> Value {
    let cleaned = ty.trim().trim_end_matches('?');
    match cleaned.to_ascii_lowercase().as_str() {
        "int" | "int16" | "int32" | "int64" | "long" | "short" | "byte" | "sbyte" | "uint"
        | "ulong" | "ushort" | "uint16" | "uint32" | "uint64" | "bigint" | "smallint"
        | "tinyint" => json!(1),
        "float" | "single" | "double" | "decimal" | "numeric" | "real" | "money" => json!(1.0),
        "bool" | "boolean" => json!(true),
        "string" => json!("string"),
        "char" => json!("a"),
        "guid" => json!("00000000-0000-0000-0000-000000000000"),
        "datetime" | "datetimeoffset" => json!("2024-01-01T00:00:00Z"),
        "dateonly" => json!("2024-01-01"),
        "timeonly" | "timespan" => json!("00:00:00"),
        _ => json!("value"),
    }
}

/// Sample for a text slot (route segment, query entry, header, form field)
pub fn sample_text_value(ty: &str) -> String {
    match sample_json_value(ty) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
