//! Line-oriented C# text primitives shared by the endpoint scanner and the
//! type resolver. Everything here is heuristic string scanning: no syntax
//! tree, no compiler. Inputs are partial or mid-edit sources, so every
//! function degrades to "no result" instead of erroring.

use regex::Regex;
use std::sync::LazyLock;

/// Compiled patterns for C# declaration shapes
struct CsharpPatterns {
    auto_property: Regex,
    enum_member: Regex,
}

static PATTERNS: LazyLock<CsharpPatterns> = LazyLock::new(|| CsharpPatterns {
    // public string? Name { get; set; }  /  internal List<Item> Items { get; init; }
    auto_property: Regex::new(
        r"^\s*((?:(?:public|private|protected|internal|static|virtual|override|required|new)\s+)+)([\w<>\[\]?,. ]+?)\s+(@?\w+)\s*\{\s*(?:get|set|init)",
    )
    .unwrap(),

    // Active = 1,   Active,   Active = 1 // comment
    enum_member: Regex::new(r"^\s*(@?[A-Za-z_]\w*)\s*(?:=\s*[^,/]+?)?\s*,?\s*(?://.*)?$").unwrap(),
});

/// Modifier keywords stripped from the front of a signature head
const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "async", "virtual", "override",
    "sealed", "abstract", "extern", "new", "unsafe", "partial",
];

/// Brace-balanced region of a line slice.
///
/// `close_line == lines.len()` means the region never closed and runs to the
/// end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyRange {
    /// Line where the opening brace sits
    pub open_line: usize,
    /// Line where depth returns to zero (inclusive)
    pub close_line: usize,
}

/// Finds the brace-balanced body starting at or after `start`.
///
/// Counts raw `{`/`}` characters; braces inside string literals are counted
/// too. That is deliberate: class and enum bodies rarely carry braces in
/// strings, and raw counting keeps the walk cheap and predictable on
/// half-typed code.
pub fn body_range(lines: &[&str], start: usize) -> Option<BodyRange> {
    let mut depth: i64 = 0;
    let mut open_line: Option<usize> = None;

    for (offset, line) in lines.iter().enumerate().skip(start) {
        for ch in line.chars() {
            match ch {
                '{' => {
                    if open_line.is_none() {
                        open_line = Some(offset);
                    }
                    depth += 1;
                }
                '}' if open_line.is_some() => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(BodyRange {
                            open_line: open_line?,
                            close_line: offset,
                        });
                    }
                }
                _ => {}
            }
        }
    }

    open_line.map(|open| BodyRange {
        open_line: open,
        close_line: lines.len(),
    })
}

/// Advances past a string literal starting at the `"` at byte `i`.
///
/// Returns the byte index just after the closing quote. Handles `\"` escapes
/// in ordinary literals and `""` escapes in verbatim (`@"..."`) literals.
pub fn skip_string_literal(bytes: &[u8], i: usize) -> usize {
    let verbatim = i > 0 && bytes[i - 1] == b'@';
    let mut j = i + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'"' if verbatim => {
                if j + 1 < bytes.len() && bytes[j + 1] == b'"' {
                    j += 2;
                    continue;
                }
                return j + 1;
            }
            b'"' => return j + 1,
            b'\\' if !verbatim => j += 1,
            _ => {}
        }
        j += 1;
    }
    j
}

/// Extracts the content of the first balanced `(...)` pair in `text`,
/// skipping over string literals so a `)` inside a default value like
/// `string sep = ")"` does not close the list early.
///
/// Returns `None` when no pair closes within the text.
pub fn parenthesized(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut depth: i64 = 0;
    let mut content_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i = skip_string_literal(bytes, i);
                continue;
            }
            b'(' => {
                if depth == 0 {
                    content_start = i + 1;
                }
                depth += 1;
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[content_start..i]);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Splits a parameter list on commas at nesting depth zero.
///
/// Depth tracks `()`, `[]`, `<>` and `{}` together, and string literals are
/// skipped, so `Dictionary<string, int> map` stays one piece. Empty pieces
/// are dropped.
pub fn split_top_level(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut depth: i64 = 0;
    let mut start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i = skip_string_literal(bytes, i);
                continue;
            }
            b'(' | b'[' | b'{' | b'<' => depth += 1,
            b')' | b']' | b'}' | b'>' => depth -= 1,
            b',' if depth == 0 => {
                let piece = text[start..i].trim();
                if !piece.is_empty() {
                    parts.push(piece);
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        parts.push(tail);
    }
    parts
}

/// Parses a signature head (everything before the parameter list) into
/// `(return_type, method_name)`.
///
/// Leading modifier keywords are stripped, then the trailing identifier
/// (with any generic argument list removed) is taken as the method name and
/// the rest as the return type. Returns `None` when either part comes out
/// empty, which filters constructors and garbage heads.
pub fn parse_signature_head(head: &str) -> Option<(String, String)> {
    let mut rest = head.trim();

    loop {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if MODIFIERS.contains(&&rest[..end]) {
            rest = rest[end..].trim_start();
        } else {
            break;
        }
    }

    let mut rest = rest.trim_end();

    // GetItems<T> -> GetItems
    if rest.ends_with('>') {
        let mut depth: i64 = 0;
        let mut open = None;
        for (i, ch) in rest.char_indices().rev() {
            match ch {
                '>' => depth += 1,
                '<' => {
                    depth -= 1;
                    if depth == 0 {
                        open = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        rest = rest[..open?].trim_end();
    }

    let mut name_start = rest.len();
    for (i, ch) in rest.char_indices().rev() {
        if ch.is_alphanumeric() || ch == '_' {
            name_start = i;
        } else {
            break;
        }
    }

    let name = &rest[name_start..];
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let return_type = rest[..name_start].trim();
    if return_type.is_empty() {
        return None;
    }

    Some((return_type.to_string(), name.to_string()))
}

/// Kind of declaration a type name resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    /// class, struct or record
    ClassLike,
    /// enum
    Enum,
}

/// Located declaration of a named type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    /// Line of the declaration keyword
    pub line: usize,
}

/// Per-type-name declaration matcher.
///
/// Built once per lookup and reused across every searched file, so the
/// regexes compile once even when the workspace scan touches thousands of
/// files.
pub struct TypeDeclFinder {
    class_re: Regex,
    enum_re: Regex,
    raw_name: String,
}

impl TypeDeclFinder {
    /// Creates a matcher for `type_name`
    pub fn new(type_name: &str) -> Self {
        let escaped = regex::escape(type_name);
        Self {
            class_re: Regex::new(&format!(r"\b(?:class|struct|record)\s+{escaped}\b")).unwrap(),
            enum_re: Regex::new(&format!(r"\benum\s+{escaped}\b")).unwrap(),
            raw_name: type_name.to_string(),
        }
    }

    /// Cheap whole-text check used to filter workspace files before the
    /// per-line search
    pub fn matches_text(&self, text: &str) -> bool {
        text.contains(&self.raw_name) && (self.class_re.is_match(text) || self.enum_re.is_match(text))
    }

    /// Finds the first declaration of the type in `lines`
    pub fn find(&self, lines: &[&str]) -> Option<TypeDecl> {
        for (idx, line) in lines.iter().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("//") {
                continue;
            }
            if self.class_re.is_match(line) {
                return Some(TypeDecl {
                    kind: TypeDeclKind::ClassLike,
                    line: idx,
                });
            }
            if self.enum_re.is_match(line) {
                return Some(TypeDecl {
                    kind: TypeDeclKind::Enum,
                    line: idx,
                });
            }
        }
        None
    }
}

/// Auto-property parsed from a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoProperty {
    /// Property name as declared
    pub name: String,
    /// Declared type, verbatim
    pub declared_type: String,
}

/// Parses `public Type Name { get; set; }` shapes.
///
/// Only auto-property lines count: fields, expression-bodied members and
/// full accessor bodies spread over lines are skipped, matching how DTOs
/// are written in practice.
pub fn parse_auto_property(line: &str) -> Option<AutoProperty> {
    let caps = PATTERNS.auto_property.captures(line)?;
    Some(AutoProperty {
        name: caps.get(3)?.as_str().to_string(),
        declared_type: caps.get(2)?.as_str().trim().to_string(),
    })
}

/// Collects enum member names from the lines of an enum body, in source
/// order. Explicit `= value` assignments and trailing comments are ignored.
pub fn enum_members(body_lines: &[&str]) -> Vec<String> {
    let mut members = Vec::new();
    for line in body_lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with("//") {
            continue;
        }
        if let Some(caps) = PATTERNS.enum_member.captures(trimmed) {
            if let Some(name) = caps.get(1) {
                members.push(name.as_str().to_string());
            }
        }
    }
    members
}

/// Slice of source around a declaration: a small window of preceding lines
/// (to pick up doc comments) plus the declaration body itself.
pub fn definition_snippet(lines: &[&str], decl_line: usize, close_line: usize, context: usize) -> String {
    let start = decl_line.saturating_sub(context);
    let end = close_line.min(lines.len().saturating_sub(1));
    if start > end || lines.is_empty() {
        return String::new();
    }
    lines[start..=end].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_range_tracks_nested_braces() {
        let src = vec![
            "public class Foo",
            "{",
            "    public void Bar() { if (true) { } }",
            "}",
            "public class Baz { }",
        ];
        let range = body_range(&src, 0).expect("should find body");
        assert_eq!(range.open_line, 1);
        assert_eq!(range.close_line, 3);

        let next = body_range(&src, 4).expect("should find body");
        assert_eq!(next.open_line, 4);
        assert_eq!(next.close_line, 4);
    }

    #[test]
    fn body_range_runs_to_eof_when_unclosed() {
        let src = vec!["class Foo", "{", "    int x;"];
        let range = body_range(&src, 0).expect("should find open brace");
        assert_eq!(range.open_line, 1);
        assert_eq!(range.close_line, src.len());
    }

    #[test]
    fn parenthesized_skips_string_literals() {
        let text = r#"public IActionResult Get(string sep = ")", int n = 1)"#;
        assert_eq!(parenthesized(text), Some(r#"string sep = ")", int n = 1"#));
    }

    #[test]
    fn parenthesized_skips_verbatim_strings() {
        let text = r#"void F(string p = @"a "" ) b", int k)"#;
        assert_eq!(parenthesized(text), Some(r#"string p = @"a "" ) b", int k"#));
    }

    #[test]
    fn parenthesized_handles_nesting() {
        let text = "void F(int a = Math.Max(1, 2), bool b)";
        assert_eq!(parenthesized(text), Some("int a = Math.Max(1, 2), bool b"));
    }

    #[test]
    fn split_keeps_generic_arguments_together() {
        let parts = split_top_level("Dictionary<string, int> map, int page = 1");
        assert_eq!(parts, vec!["Dictionary<string, int> map", "int page = 1"]);
    }

    #[test]
    fn split_ignores_commas_in_defaults_and_strings() {
        let parts = split_top_level(r#"string s = "a,b", int[] xs = new[] { 1, 2 }"#);
        assert_eq!(parts, vec![r#"string s = "a,b""#, "int[] xs = new[] { 1, 2 }"]);
    }

    #[test]
    fn split_drops_empty_pieces() {
        assert!(split_top_level("   ").is_empty());
        assert_eq!(split_top_level("int a,").len(), 1);
    }

    #[test]
    fn signature_head_strips_modifiers() {
        let (ret, name) =
            parse_signature_head("public async Task<ActionResult<User>> GetUser").expect("parses");
        assert_eq!(ret, "Task<ActionResult<User>>");
        assert_eq!(name, "GetUser");
    }

    #[test]
    fn signature_head_strips_generic_method_arguments() {
        let (ret, name) = parse_signature_head("public List<T> GetItems<T>").expect("parses");
        assert_eq!(ret, "List<T>");
        assert_eq!(name, "GetItems");
    }

    #[test]
    fn signature_head_rejects_constructors() {
        // No return type survives, so this is not an action
        assert_eq!(parse_signature_head("public UsersController"), None);
    }

    #[test]
    fn type_finder_distinguishes_class_and_enum() {
        let finder = TypeDeclFinder::new("OrderStatus");
        let lines = vec!["public class Order", "{", "}", "public enum OrderStatus", "{", "}"];
        let decl = finder.find(&lines).expect("should find");
        assert_eq!(decl.kind, TypeDeclKind::Enum);
        assert_eq!(decl.line, 3);

        let class_finder = TypeDeclFinder::new("Order");
        let decl = class_finder.find(&lines).expect("should find");
        assert_eq!(decl.kind, TypeDeclKind::ClassLike);
        assert_eq!(decl.line, 0);
    }

    #[test]
    fn type_finder_requires_whole_word() {
        let finder = TypeDeclFinder::new("User");
        let lines = vec!["public class UserProfile { }"];
        assert!(finder.find(&lines).is_none());
    }

    #[test]
    fn auto_property_parses_nullable_and_generic_types() {
        let p = parse_auto_property("    public string? Name { get; set; }").expect("parses");
        assert_eq!(p.name, "Name");
        assert_eq!(p.declared_type, "string?");

        let p = parse_auto_property("public List<OrderItem> Items { get; init; }").expect("parses");
        assert_eq!(p.name, "Items");
        assert_eq!(p.declared_type, "List<OrderItem>");
    }

    #[test]
    fn auto_property_ignores_fields_and_methods() {
        assert!(parse_auto_property("private int _count;").is_none());
        assert!(parse_auto_property("public int Count() { return 1; }").is_none());
    }

    #[test]
    fn enum_members_keep_source_order_and_drop_values() {
        let body = vec!["    Active = 1,", "    Inactive,", "    [Obsolete]", "    Banned = 99 // legacy"];
        assert_eq!(enum_members(&body), vec!["Active", "Inactive", "Banned"]);
    }

    #[test]
    fn definition_snippet_includes_preceding_window() {
        let lines = vec!["// summary", "public class A", "{", "}", "trailing"];
        let snippet = definition_snippet(&lines, 1, 3, 3);
        assert_eq!(snippet, "// summary\npublic class A\n{\n}");
    }
}
