//! Field mini-language parser.
//!
//! One line of config text describes one declared field:
//!
//! ```text
//! [Type[?]] name[=default][ // comment [(jk@ key)]]
//! ```
//!
//! Examples: `int age`, `String? nickname`, `Map<String,int> scores={}`,
//! `String token // session token (jk@ session_token)`.
//!
//! Parsing never fails. A line matching neither the full nor the short
//! grammar degrades to a best-effort name-only spec; required-field
//! validation happens later in the compositors.

use once_cell::sync::Lazy;
use regex::Regex;

// Full form: type token (generics allowed), optional `?`, name, raw remainder.
static FULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<clsname>(?P<cls>[\w<,>]+)(?P<optional>\??))\s+(?P<name>\w+)(?P<value>.*)$")
        .expect("valid field regex")
});

// Short form: type omitted, defaults to String.
static SHORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>\w+)(?P<value>=.*)?$").expect("valid field regex"));

// `(jk@ key)` directive inside a trailing comment overrides the wire key.
static JSON_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(jk@\s*(?P<key>.*?)\)").expect("valid field regex"));

/// Parsed representation of one declared field
///
/// Constructed once per textual line via [`FieldSpec::parse`], immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Dart type without the nullability marker; never empty (falls back to `String`)
    pub type_name: String,
    /// Whether the type carried a trailing `?`
    pub is_optional: bool,
    /// Field name; non-empty for any non-empty input line
    pub name: String,
    /// Raw default-value fragment including the leading `=`, or empty
    pub default_expr: String,
    /// Wire/storage key override from a `(jk@ key)` directive
    pub serialization_key: Option<String>,
    /// Trailing `//` comment, preserved verbatim (directive stripped)
    pub trailing_comment: String,
}

impl FieldSpec {
    /// Parse one field descriptor line. Never fails; see module docs.
    pub fn parse(line: &str) -> FieldSpec {
        // The comment comes off first so both grammars only ever see the
        // declaration itself; a short-form line may carry a comment too.
        let (decl, comment) = split_trailing_comment(line.trim());
        let decl = decl.trim();
        let mut type_name = "String".to_string();
        let mut is_optional = false;
        let mut name = String::new();
        let mut value = String::new();

        if let Some(caps) = FULL.captures(decl) {
            type_name = caps["cls"].to_string();
            is_optional = !caps["optional"].is_empty();
            name = caps["name"].to_string();
            value = caps["value"].to_string();
        } else if let Some(caps) = SHORT.captures(decl) {
            name = caps["name"].to_string();
            if let Some(v) = caps.name("value") {
                value = v.as_str().to_string();
            }
        } else {
            // Neither grammar matched: the whole declaration becomes the name.
            name = decl.to_string();
        }

        let mut trailing_comment = comment;
        let mut serialization_key = None;
        if let Some(caps) = JSON_KEY.captures(&trailing_comment) {
            serialization_key = Some(caps["key"].trim().to_string());
            trailing_comment = JSON_KEY.replace(&trailing_comment, "").trim_end().to_string();
        }

        FieldSpec {
            type_name,
            is_optional,
            name,
            default_expr: value.trim().to_string(),
            serialization_key,
            trailing_comment,
        }
    }

    /// Dart type as declared, with the `?` restored for optional fields
    pub fn declared_type(&self) -> String {
        if self.is_optional {
            format!("{}?", self.type_name)
        } else {
            self.type_name.clone()
        }
    }

    /// Whether a non-empty default fragment was supplied
    pub fn has_default(&self) -> bool {
        !self.default_expr.is_empty()
    }

    /// A constructor parameter is required unless the field has a default or is optional
    pub fn is_required(&self) -> bool {
        !self.has_default() && !self.is_optional
    }
}

/// Split `value` at the last unescaped `//`, returning (remainder, comment).
///
/// The comment keeps its `//` prefix so it can be emitted verbatim.
fn split_trailing_comment(value: &str) -> (String, String) {
    let bytes = value.as_bytes();
    let mut last = None;
    let mut from = 0;
    while let Some(pos) = value[from..].find("//") {
        let abs = from + pos;
        if abs == 0 || bytes[abs - 1] != b'\\' {
            last = Some(abs);
        }
        from = abs + 2;
    }
    match last {
        Some(idx) => (
            value[..idx].to_string(),
            value[idx..].trim_end().to_string(),
        ),
        None => (value.to_string(), String::new()),
    }
}
