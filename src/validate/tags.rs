//! Rule annotation parsing
//!
//! A field's annotation is a single string holding a comma-separated,
//! ordered list of rule names, e.g. `"long,proper"`. The token `struct`
//! is reserved and means "validate this field as a nested record".

/// Reserved rule name that triggers nested record validation.
pub const STRUCT_RULE: &str = "struct";

/// Separator between rule names in an annotation.
pub const RULE_SEPARATOR: char = ',';

/// Splits an annotation into its ordered rule names.
///
/// A blank annotation yields no rules. Otherwise every segment is kept,
/// trimmed of surrounding whitespace; empty segments such as the middle
/// of `"long,,long"` become a rule named `""`, which no registry defines.
pub fn parse_rules(tag: &str) -> Vec<String> {
    if tag.trim().is_empty() {
        return Vec::new();
    }
    tag.split(RULE_SEPARATOR)
        .map(|name| name.trim().to_string())
        .collect()
}

/// Returns true if `name` is the reserved nested-record rule.
pub fn is_struct_rule(name: &str) -> bool {
    name == STRUCT_RULE
}
