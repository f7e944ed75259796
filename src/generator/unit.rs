use once_cell::sync::Lazy;
use regex::Regex;

/// The closed set of generated artifact kinds
///
/// Dispatch over unit kinds is an exhaustive `match` on this enum; there is
/// no name-based lookup of generator functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitKind {
    /// Immutable value record (bloc state class)
    Record,
    /// Closed set of event variants
    EventSet,
    /// Dispatcher reacting to events (bloc class)
    Dispatcher,
}

impl UnitKind {
    /// The config section key this kind is configured under
    pub fn config_key(&self) -> &'static str {
        match self {
            UnitKind::Record => "state",
            UnitKind::EventSet => "event",
            UnitKind::Dispatcher => "bloc",
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.config_key())
    }
}

// Structural pattern for class declarations in generated Dart text.
// This tool only ever reads files produced by the same tool family, so a
// small fixed grammar is enough; no real Dart parser.
static CLASS_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+(\w+)[^{;]*\{").expect("valid class regex"));

// `final <type> <name>;` field declarations, for parent-unit inheritance.
static FINAL_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"final\s+([\w<,>]+\??)\s+(\w+);").expect("valid field regex"));

/// A field re-exposed from a parent unit's generated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritedField {
    /// Declared Dart type, `?` suffix preserved
    pub declared_type: String,
    pub name: String,
}

impl InheritedField {
    pub fn is_optional(&self) -> bool {
        self.declared_type.ends_with('?')
    }

    /// Type without the nullability marker, for `copyWith` parameters
    pub fn bare_type(&self) -> &str {
        self.declared_type.trim_end_matches('?')
    }
}

/// All class names declared in generated Dart text, in declaration order.
pub fn find_classes(content: &str) -> Vec<String> {
    CLASS_DECL
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect()
}

/// The first class name declared in generated Dart text, if any.
pub fn first_class(content: &str) -> Option<String> {
    find_classes(content).into_iter().next()
}

/// `final` field declarations found in a parent unit's generated text.
pub fn find_final_fields(content: &str) -> Vec<InheritedField> {
    FINAL_FIELD
        .captures_iter(content)
        .map(|c| InheritedField {
            declared_type: c[1].to_string(),
            name: c[2].to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_classes() {
        let content = "abstract class UserEvent {}\n\nclass UserEventCreated extends UserEvent {}\n";
        assert_eq!(find_classes(content), vec!["UserEvent", "UserEventCreated"]);
        assert_eq!(first_class(content).as_deref(), Some("UserEvent"));
    }

    #[test]
    fn test_find_final_fields() {
        let content = "  final int age;\n  final String? nickname;\n  final Map<String,int> scores;\n";
        let fields = find_final_fields(content);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "age");
        assert!(!fields[0].is_optional());
        assert!(fields[1].is_optional());
        assert_eq!(fields[1].bare_type(), "String");
        assert_eq!(fields[2].declared_type, "Map<String,int>");
    }

    #[test]
    fn test_no_classes() {
        assert!(first_class("// just a comment\n").is_none());
    }
}
