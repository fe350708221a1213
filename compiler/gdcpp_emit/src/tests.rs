use gdcpp_decl::{
    Access, DeclFlags, DeclKind, DeclNode, DeclTree, ParamDecl, ParsedHeader, TypeRef,
};
use gdcpp_scan::scan;
use gdcpp_types::{discover, OverrideTable};
use pretty_assertions::assert_eq;

use super::*;

fn public(kind: DeclKind, name: &str) -> DeclNode {
    DeclNode::new(kind, name).with_access(Access::Public)
}

/// `class Point { public: Point(double x, double y); double Norm() const;
///  void Fill(const std::vector<std::vector<int>> &grid); };`
fn point_header() -> ParsedHeader {
    let mut tree = DeclTree::new();
    let class = tree.push(
        tree.root(),
        DeclNode::new(DeclKind::Class, "Point").with_flags(DeclFlags::DEFINITION),
    );
    tree.push(
        class,
        public(DeclKind::Constructor, "Point").with_params(vec![
            ParamDecl::new("x", TypeRef::front_end("double")),
            ParamDecl::new("y", TypeRef::front_end("double")),
        ]),
    );
    tree.push(
        class,
        public(DeclKind::Method, "Norm")
            .with_type(TypeRef::front_end("double"))
            .with_flags(DeclFlags::CONST),
    );
    tree.push(
        class,
        public(DeclKind::Method, "Fill")
            .with_type(TypeRef::front_end("void"))
            .with_params(vec![ParamDecl::new(
                "grid",
                TypeRef::front_end("const std::vector<std::vector<int>> &"),
            )]),
    );
    ParsedHeader {
        path: "point.h".into(),
        tree,
    }
}

fn emit_headers(headers: &[ParsedHeader], options: &EmitOptions) -> Vec<Artifact> {
    let overrides = OverrideTable::new();
    let registry = discover(headers, &overrides);
    let api = scan(headers, &registry);
    let classifier = Classifier::new(&registry, &overrides);
    emit(&api, &classifier, options)
}

fn contents<'a>(artifacts: &'a [Artifact], name: &str) -> &'a str {
    artifacts
        .iter()
        .find(|a| a.file_name == name)
        .map_or("", |a| a.contents.as_str())
}

#[test]
fn artifact_set_and_order() {
    let artifacts = emit_headers(&[point_header()], &EmitOptions::default());
    let names: Vec<_> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "ocgd_utils.h",
            "ocgd_register.h",
            "ocgd_register.cpp",
            "ocgd_Point.hpp",
            "ocgd_Point.cpp",
        ]
    );
    assert!(contents(&artifacts, "ocgd_register.cpp").contains("GDREGISTER_CLASS(ocgd_Point);"));
}

#[test]
fn constructor_and_const_method_forward_to_native() {
    let options = EmitOptions {
        impl_includes: vec!["point.h".into()],
        ..EmitOptions::default()
    };
    let artifacts = emit_headers(&[point_header()], &options);
    let header = contents(&artifacts, "ocgd_Point.hpp");
    let source = contents(&artifacts, "ocgd_Point.cpp");

    assert!(header.contains("    void construct_99b51fbb(double x, double y);\n"));
    assert!(header.contains("    double Norm() const;\n"));
    assert!(source.contains("#include \"point.h\"\n"));

    let construct = r"void ocgd_Point::construct_99b51fbb(double x, double y) {
    this->destroy();
    this->native = new Point(x, y);
    this->owned = true;
}
";
    assert!(source.contains(construct), "{source}");

    let norm = r#"double ocgd_Point::Norm() const {
    if (!this->native) {
        ERR_PRINT("Native pointer is null for Point");
        return 0.0;
    }
    auto _ret = reinterpret_cast<const Point *>(this->native)->Norm();
    return _ret;
}
"#;
    assert!(source.contains(norm), "{source}");
}

#[test]
fn nested_template_parameter_still_compiles_with_marked_placeholder() {
    let artifacts = emit_headers(&[point_header()], &EmitOptions::default());
    let source = contents(&artifacts, "ocgd_Point.cpp");

    let fill = source
        .lines()
        .find(|line| line.starts_with("void ocgd_Point::Fill_"))
        .unwrap_or_default();
    assert!(fill.contains("(Variant grid /* unsupported type: std::vector<std::vector<int>>"));
    assert!(source.contains(
        "    // TODO: convert Variant to const std::vector<std::vector<int>> & for grid\n"
    ));
    assert!(source.contains(
        "    std::remove_cv_t<std::remove_reference_t<const std::vector<std::vector<int>> &>> \
         converted_grid{};\n"
    ));
    assert!(source.contains("->Fill(converted_grid);\n"));
    assert!(source.contains("D_METHOD(\"Fill\", \"grid\")"));
}

#[test]
fn forward_declared_class_emits_diagnostic_stubs() {
    let mut tree = DeclTree::new();
    let class = tree.push(tree.root(), DeclNode::new(DeclKind::Class, "Later"));
    tree.push(
        class,
        public(DeclKind::Method, "Count").with_type(TypeRef::front_end("int")),
    );
    let headers = [ParsedHeader {
        path: "later.h".into(),
        tree,
    }];

    let artifacts = emit_headers(&headers, &EmitOptions::default());
    let source = contents(&artifacts, "ocgd_Later.cpp");
    assert!(source.contains(
        "int ocgd_Later::Count() {\n    \
         ERR_PRINT(\"Automatic forwarding not available for Later::Count\");\n    \
         return 0;\n}\n"
    ));
    assert!(!source.contains("delete "));
}

#[test]
fn emission_is_deterministic() {
    let headers = [point_header()];
    let options = EmitOptions {
        prefix: "geo".into(),
        godot_base: "RefCounted".into(),
        impl_includes: Vec::new(),
    };
    let first = emit_headers(&headers, &options);
    assert_eq!(first, emit_headers(&headers, &options));
    assert!(contents(&first, "geo_Point.hpp")
        .contains("class geo_Point : public RefCounted {\n    GDCLASS(geo_Point, RefCounted)\n"));
}
