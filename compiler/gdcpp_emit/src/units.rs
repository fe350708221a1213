//! Shared translation units: the utility header and the registration pair.

use crate::render::header_file_name;
use crate::writer::CodeWriter;

pub fn utils_file_name(prefix: &str) -> String {
    format!("{prefix}_utils.h")
}

pub fn register_header_name(prefix: &str) -> String {
    format!("{prefix}_register.h")
}

pub fn register_source_name(prefix: &str) -> String {
    format!("{prefix}_register.cpp")
}

/// Entry point symbol the host library loader looks up.
pub fn entry_symbol(prefix: &str) -> String {
    format!("{prefix}_gd_library_init_bindings")
}

/// Includes and string helpers shared by every wrapper.
pub fn render_utils(prefix: &str) -> String {
    let mut w = CodeWriter::new();
    w.writeln(&format!(
        "// {} - generated helpers for Godot GDExtension wrappers",
        utils_file_name(prefix)
    ));
    w.writeln("#pragma once");
    w.newline();
    for include in [
        "<gdextension_interface.h>",
        "<godot_cpp/core/class_db.hpp>",
        "<godot_cpp/core/defs.hpp>",
        "<godot_cpp/godot.hpp>",
        "<godot_cpp/variant/variant.hpp>",
        "<string>",
        "<type_traits>",
        "<utility>",
    ] {
        w.writeln(&format!("#include {include}"));
    }
    w.newline();
    w.writeln("using namespace godot;");
    w.newline();
    w.open(&format!(
        "inline String {prefix}_string_to_godot(const std::string &s)"
    ));
    w.writeln("return String::utf8(s.c_str());");
    w.close("}");
    w.newline();
    w.open(&format!(
        "inline std::string {prefix}_string_from_godot(const String &s)"
    ));
    w.writeln("return std::string(s.utf8().get_data());");
    w.close("}");
    w.take_output()
}

/// Declarations of the initializer, terminator and entry point.
pub fn render_register_header(prefix: &str) -> String {
    let mut w = CodeWriter::new();
    w.writeln("#pragma once");
    w.writeln(&format!("#include \"{}\"", utils_file_name(prefix)));
    w.newline();
    w.writeln(&format!(
        "void {prefix}_initialize_types(ModuleInitializationLevel p_level);"
    ));
    w.writeln(&format!(
        "void {prefix}_uninitialize_types(ModuleInitializationLevel p_level);"
    ));
    w.newline();
    w.open("extern \"C\"");
    w.writeln(&format!(
        "GDExtensionBool GDE_EXPORT {}(GDExtensionInterfaceGetProcAddress p_get_proc_address,",
        entry_symbol(prefix)
    ));
    w.writeln("        GDExtensionClassLibraryPtr p_library,");
    w.writeln("        GDExtensionInitialization *r_initialization);");
    w.close("}");
    w.take_output()
}

/// One registration statement per wrapper class, gated on the scene level.
pub fn render_register_source(prefix: &str, classes: &[String]) -> String {
    let mut w = CodeWriter::new();
    w.writeln(&format!("#include \"{}\"", register_header_name(prefix)));
    w.newline();
    for class in classes {
        w.writeln(&format!("#include \"{}\"", header_file_name(class)));
    }
    if !classes.is_empty() {
        w.newline();
    }
    w.writeln("using namespace godot;");
    w.newline();

    w.open(&format!(
        "void {prefix}_initialize_types(ModuleInitializationLevel p_level)"
    ));
    w.open("if (p_level != MODULE_INITIALIZATION_LEVEL_SCENE)");
    w.writeln("return;");
    w.close("}");
    for class in classes {
        w.writeln(&format!("GDREGISTER_CLASS({class});"));
    }
    w.close("}");
    w.newline();

    w.open(&format!(
        "void {prefix}_uninitialize_types(ModuleInitializationLevel p_level)"
    ));
    w.writeln("(void)p_level;");
    w.close("}");
    w.newline();

    w.open("extern \"C\"");
    w.open(&format!(
        "GDExtensionBool GDE_EXPORT {}(GDExtensionInterfaceGetProcAddress p_get_proc_address, \
         GDExtensionClassLibraryPtr p_library, GDExtensionInitialization *r_initialization)",
        entry_symbol(prefix)
    ));
    w.writeln(
        "GDExtensionBinding::InitObject init_obj(p_get_proc_address, p_library, r_initialization);",
    );
    w.writeln(&format!(
        "init_obj.register_initializer({prefix}_initialize_types);"
    ));
    w.writeln(&format!(
        "init_obj.register_terminator({prefix}_uninitialize_types);"
    ));
    w.writeln("init_obj.set_minimum_library_initialization_level(MODULE_INITIALIZATION_LEVEL_SCENE);");
    w.newline();
    w.writeln("return init_obj.init();");
    w.close("}");
    w.close("}");
    w.take_output()
}

#[cfg(test)]
mod tests;
