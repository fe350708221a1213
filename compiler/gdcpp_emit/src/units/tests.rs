use pretty_assertions::assert_eq;

use super::*;

#[test]
fn names_follow_prefix() {
    assert_eq!(utils_file_name("ocgd"), "ocgd_utils.h");
    assert_eq!(register_header_name("ocgd"), "ocgd_register.h");
    assert_eq!(register_source_name("ocgd"), "ocgd_register.cpp");
    assert_eq!(entry_symbol("ocgd"), "ocgd_gd_library_init_bindings");
}

#[test]
fn utils_header_defines_prefixed_helpers() {
    let text = render_utils("ocgd");
    assert!(text.contains("#pragma once\n"));
    assert!(text.contains("#include <godot_cpp/core/class_db.hpp>\n"));
    assert!(text.contains("#include <type_traits>\n"));
    assert!(text.contains(
        "inline String ocgd_string_to_godot(const std::string &s) {\n    \
         return String::utf8(s.c_str());\n}\n"
    ));
    assert!(text.contains("inline std::string ocgd_string_from_godot(const String &s) {\n"));
}

#[test]
fn register_header_declares_entry_points() {
    let text = render_register_header("ocgd");
    assert!(text.starts_with("#pragma once\n#include \"ocgd_utils.h\"\n"));
    assert!(text.contains("void ocgd_initialize_types(ModuleInitializationLevel p_level);\n"));
    assert!(text.contains("void ocgd_uninitialize_types(ModuleInitializationLevel p_level);\n"));
    assert!(text.contains("GDExtensionBool GDE_EXPORT ocgd_gd_library_init_bindings("));
}

#[test]
fn register_source_registers_each_class_at_scene_level() {
    let classes = vec!["ocgd_Beta".to_owned(), "ocgd_ns_Alpha".to_owned()];
    let text = render_register_source("ocgd", &classes);

    let expected_init = r#"void ocgd_initialize_types(ModuleInitializationLevel p_level) {
    if (p_level != MODULE_INITIALIZATION_LEVEL_SCENE) {
        return;
    }
    GDREGISTER_CLASS(ocgd_Beta);
    GDREGISTER_CLASS(ocgd_ns_Alpha);
}
"#;
    assert!(text.contains(expected_init), "{text}");
    assert!(text.contains("#include \"ocgd_Beta.hpp\"\n#include \"ocgd_ns_Alpha.hpp\"\n"));
    assert!(text.contains("    init_obj.register_initializer(ocgd_initialize_types);\n"));
    assert!(text.contains("    init_obj.register_terminator(ocgd_uninitialize_types);\n"));
    assert!(text.contains(
        "init_obj.set_minimum_library_initialization_level(MODULE_INITIALIZATION_LEVEL_SCENE);"
    ));
    assert!(text.contains("        return init_obj.init();\n"));
}

#[test]
fn register_source_with_no_classes_still_compiles() {
    let text = render_register_source("x", &[]);
    assert_eq!(text.matches("GDREGISTER_CLASS").count(), 0);
    assert!(text.starts_with("#include \"x_register.h\"\n\nusing namespace godot;\n"));
}
