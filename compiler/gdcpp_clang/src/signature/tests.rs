use pretty_assertions::assert_eq;

use super::*;

fn parsed(spelling: &str) -> Option<(&str, bool)> {
    FunctionType::parse(spelling).map(|f| (f.ret, f.is_const))
}

#[test]
fn plain_and_const_methods() {
    assert_eq!(parsed("double () const"), Some(("double", true)));
    assert_eq!(parsed("void (int, const gp_Pnt &)"), Some(("void", false)));
    assert_eq!(
        parsed("const gp_Pnt & (Standard_Integer) const noexcept"),
        Some(("const gp_Pnt &", true))
    );
}

#[test]
fn template_arguments_do_not_split() {
    assert_eq!(
        parsed("std::vector<std::function<void (int)>> (int)"),
        Some(("std::vector<std::function<void (int)>>", false))
    );
}

#[test]
fn ref_qualifiers_and_trailing_return() {
    assert_eq!(parsed("int () const &"), Some(("int", true)));
    assert_eq!(parsed("int () &&"), Some(("int", false)));
    assert_eq!(parsed("auto (int) const -> double"), Some(("double", true)));
}

#[test]
fn constness_is_a_whole_word() {
    assert_eq!(parsed("int (const char *)"), Some(("int", false)));
    assert_eq!(parsed("int () constexpr_like"), Some(("int", false)));
}

#[test]
fn no_parameter_list() {
    assert_eq!(parsed("int"), None);
    assert_eq!(parsed("std::function<void (int)>"), None);
    assert_eq!(parsed("int ("), None);
}
