//! Identifier helpers.

/// Replace every character that cannot appear in a C++ identifier with `_`.
pub fn safe_ident(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Flatten a qualified name (`ns::Class::Inner` → `ns_Class_Inner`).
pub fn collapse_name(name: &str) -> String {
    safe_ident(&name.replace("::", "_"))
}

/// Operator and conversion function names (`operator=`, `operator bool`).
pub fn is_operator_name(name: &str) -> bool {
    name.strip_prefix("operator")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| !(c.is_ascii_alphanumeric() || c == '_'))
}
