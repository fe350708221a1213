//! Built-in primitive knowledge.

/// Domain typedefs and builtin spellings mapped to the canonical C++
/// primitive they stand for.
///
/// Discovered typedefs take precedence over these entries; they only fill
/// in names the headers never declared.
pub const BUILTIN_PRIMITIVES: &[(&str, &str)] = &[
    // OCCT
    ("Standard_Integer", "int"),
    ("Standard_Real", "double"),
    ("Standard_Boolean", "bool"),
    ("Standard_ShortReal", "float"),
    ("Standard_Character", "char"),
    ("Standard_Size", "size_t"),
    // Builtins
    ("int", "int"),
    ("unsigned int", "unsigned int"),
    ("long", "long"),
    ("unsigned long", "unsigned long"),
    ("long long", "long long"),
    ("unsigned long long", "unsigned long long"),
    ("short", "short"),
    ("unsigned short", "unsigned short"),
    ("float", "float"),
    ("double", "double"),
    ("bool", "bool"),
    ("char", "char"),
    ("unsigned char", "unsigned char"),
    ("size_t", "size_t"),
];

/// Last-resort primitive names recognized without any registry help.
const CANONICAL_PRIMITIVES: &[&str] = &["int", "float", "double", "bool", "char", "long"];

/// Canonical primitive for `name`, if it is in the built-in table.
pub fn builtin_primitive(name: &str) -> Option<&'static str> {
    BUILTIN_PRIMITIVES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, target)| *target)
}

#[inline]
pub fn is_canonical_primitive(name: &str) -> bool {
    CANONICAL_PRIMITIVES.contains(&name)
}
