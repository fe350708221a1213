//! Text rendering of wrapper classes.

use crate::ir::{MethodKind, Stmt, WrapperClass, WrapperMethod, WrapperParam};
use crate::writer::CodeWriter;

/// Header file name for a wrapper class.
pub fn header_file_name(class: &str) -> String {
    format!("{class}.hpp")
}

/// Implementation file name for a wrapper class.
pub fn source_file_name(class: &str) -> String {
    format!("{class}.cpp")
}

/// Render the `.hpp` declaring `class`.
pub fn render_header(class: &WrapperClass, utils_header: &str) -> String {
    let mut w = CodeWriter::new();
    w.writeln("#pragma once");
    w.writeln(&format!("#include \"{utils_header}\""));
    w.newline();

    w.open(&format!("class {} : public {}", class.name, class.base));
    w.writeln(&format!("GDCLASS({}, {})", class.name, class.base));
    w.newline();
    w.writeln_flush("public:");
    w.writeln(&format!("{}();", class.name));
    w.writeln(&format!("~{}() override;", class.name));
    w.newline();
    w.writeln(&format!("// Handle to a native {} (opaque).", class.native));
    w.writeln("void *native = nullptr;");
    w.writeln("bool owned = false;");
    w.newline();
    for method in &class.methods {
        let prefix = if method.is_static() { "static " } else { "" };
        let suffix = if method.is_const() { " const" } else { "" };
        w.writeln(&format!(
            "{prefix}{} {}({}){suffix};",
            method.ret,
            method.ident,
            param_list(&method.params)
        ));
    }
    if !class.methods.is_empty() {
        w.newline();
    }
    w.writeln("void destroy();");
    w.newline();
    w.writeln_flush("protected:");
    w.writeln("static void _bind_methods();");
    w.close("};");
    w.take_output()
}

/// Render the `.cpp` defining `class`.
pub fn render_source(class: &WrapperClass, impl_includes: &[String]) -> String {
    let mut w = CodeWriter::new();
    w.writeln(&format!("#include \"{}\"", header_file_name(&class.name)));
    w.newline();
    if !impl_includes.is_empty() {
        for include in impl_includes {
            w.writeln(&format!("#include \"{include}\""));
        }
        w.newline();
    }
    w.writeln("using namespace godot;");
    w.newline();

    render_bindings(&mut w, class);
    w.newline();

    w.writeln(&format!("{0}::{0}() {{}}", class.name));
    w.newline();
    w.open(&format!("{0}::~{0}()", class.name));
    w.open("if (this->native && this->owned)");
    w.writeln("this->destroy();");
    w.close("}");
    w.close("}");

    for method in &class.methods {
        w.newline();
        render_method(&mut w, class, method);
    }

    w.newline();
    w.open(&format!("void {}::destroy()", class.name));
    render_body(&mut w, &class.destroy);
    w.close("}");
    w.take_output()
}

fn render_bindings(w: &mut CodeWriter, class: &WrapperClass) {
    w.open(&format!("void {}::_bind_methods()", class.name));
    for method in &class.methods {
        let d_method = d_method(&method.script_name, &method.params);
        let target = format!("&{}::{}", class.name, method.ident);
        if method.is_static() {
            w.writeln(&format!(
                "ClassDB::bind_static_method(get_class_static(), {d_method}, {target});"
            ));
        } else {
            w.writeln(&format!("ClassDB::bind_method({d_method}, {target});"));
        }
    }
    w.writeln(&format!(
        "ClassDB::bind_method(D_METHOD(\"destroy\"), &{}::destroy);",
        class.name
    ));
    for nested in &class.enums {
        for enumerator in &nested.enumerators {
            w.writeln(&format!(
                "ClassDB::bind_integer_constant(get_class_static(), \"{}\", \"{}\", {});",
                nested.name, enumerator.name, enumerator.value
            ));
        }
    }
    w.close("}");
}

fn render_method(w: &mut CodeWriter, class: &WrapperClass, method: &WrapperMethod) {
    let suffix = match method.kind {
        MethodKind::Instance { is_const: true } => " const",
        _ => "",
    };
    w.open(&format!(
        "{} {}::{}({}){suffix}",
        method.ret,
        class.name,
        method.ident,
        param_list(&method.params)
    ));
    render_body(w, &method.body);
    w.close("}");
}

fn render_body(w: &mut CodeWriter, body: &[Stmt]) {
    for stmt in body {
        render_stmt(w, stmt);
    }
}

fn render_stmt(w: &mut CodeWriter, stmt: &Stmt) {
    match stmt {
        Stmt::Comment(text) => w.writeln(&format!("// {text}")),
        Stmt::Todo(text) => w.writeln(&format!("// TODO: {text}")),
        Stmt::Declare { ty, name } => w.writeln(&format!("{ty} {name}{{}};")),
        Stmt::Expr(expr) => w.writeln(&format!("{expr};")),
        Stmt::Let { name, init } => w.writeln(&format!("auto {name} = {init};")),
        Stmt::Return(None) => w.writeln("return;"),
        Stmt::Return(Some(value)) => w.writeln(&format!("return {value};")),
        Stmt::ErrPrint(message) => {
            w.writeln(&format!("ERR_PRINT(\"{}\");", escape(message)));
        }
        Stmt::If { cond, then } => {
            w.open(&format!("if ({cond})"));
            render_body(w, then);
            w.close("}");
        }
    }
}

fn param_list(params: &[WrapperParam]) -> String {
    params
        .iter()
        .map(|p| match &p.note {
            Some(note) => format!("{} {} /* {} */", p.ty, p.name, note.replace("*/", "* /")),
            None => format!("{} {}", p.ty, p.name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn d_method(script_name: &str, params: &[WrapperParam]) -> String {
    let mut out = format!("D_METHOD(\"{script_name}\"");
    for param in params {
        out.push_str(", \"");
        out.push_str(&param.name);
        out.push('"');
    }
    out.push(')');
    out
}

/// Escape text for a C++ string literal.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}
