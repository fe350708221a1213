use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn lower(ast: &Value) -> DeclTree {
    lower_ast(ast, Path::new("geo.h")).expect("valid AST")
}

/// Direct children of `parent` as (kind, spelling).
fn children(tree: &DeclTree, parent: DeclId) -> Vec<(DeclKind, String)> {
    tree.children(parent)
        .map(|id| (tree.get(id).kind, tree.get(id).spelling.clone()))
        .collect()
}

fn child(tree: &DeclTree, parent: DeclId, name: &str) -> DeclId {
    tree.children(parent)
        .find(|id| tree.get(*id).spelling == name)
        .unwrap_or_else(|| panic!("no child named {name}"))
}

/// ```cpp
/// // geo.h
/// #include <base.h>
/// namespace geo {
/// typedef double Real;
/// class Point {
/// public:
///   Point(Real x, double);
///   Real Norm() const;
///   static Point Origin();
///   Point(const Point &) = delete;
/// private:
///   int secret();
/// };
/// }
/// ```
fn point_ast() -> Value {
    json!({
        "id": "0x1",
        "kind": "TranslationUnitDecl",
        "loc": {},
        "range": { "begin": {}, "end": {} },
        "inner": [
            {
                "id": "0x2", "kind": "TypedefDecl", "isImplicit": true,
                "loc": {}, "range": { "begin": {}, "end": {} },
                "name": "__int128_t", "type": { "qualType": "__int128" }
            },
            {
                "id": "0x3", "kind": "CXXRecordDecl",
                "loc": { "offset": 20, "file": "/usr/include/base.h", "line": 2, "col": 8,
                         "includedFrom": { "file": "geo.h" } },
                "range": { "begin": { "offset": 13, "col": 1 }, "end": { "offset": 30, "col": 18 } },
                "name": "Base", "tagUsed": "struct", "completeDefinition": true
            },
            {
                "id": "0x4", "kind": "NamespaceDecl",
                "loc": { "offset": 30, "file": "geo.h", "line": 2, "col": 11 },
                "range": { "begin": { "offset": 20, "col": 1 }, "end": { "offset": 200, "line": 14, "col": 1 } },
                "name": "geo",
                "inner": [
                    {
                        "id": "0x5", "kind": "TypedefDecl",
                        "loc": { "offset": 50, "line": 3, "col": 16 },
                        "range": { "begin": { "offset": 35, "col": 1 }, "end": { "offset": 50, "col": 16 } },
                        "name": "Real", "type": { "qualType": "double" }
                    },
                    {
                        "id": "0x6", "kind": "CXXRecordDecl",
                        "loc": { "offset": 60, "line": 4, "col": 7 },
                        "range": { "begin": { "offset": 54, "col": 1 }, "end": { "offset": 190, "line": 13, "col": 1 } },
                        "name": "Point", "tagUsed": "class", "completeDefinition": true,
                        "definitionData": { "isAbstract": false },
                        "inner": [
                            { "id": "0x7", "kind": "CXXRecordDecl", "isImplicit": true,
                              "loc": { "offset": 60, "col": 7 }, "range": { "begin": {}, "end": {} },
                              "name": "Point", "tagUsed": "class" },
                            { "id": "0x8", "kind": "AccessSpecDecl",
                              "loc": { "offset": 68, "line": 5, "col": 1 },
                              "range": { "begin": {}, "end": {} }, "access": "public" },
                            {
                                "id": "0x9", "kind": "CXXConstructorDecl",
                                "loc": { "offset": 78, "line": 6, "col": 3 },
                                "range": { "begin": {}, "end": {} },
                                "name": "Point",
                                "type": { "qualType": "void (Real, double)" },
                                "inner": [
                                    { "id": "0xa", "kind": "ParmVarDecl", "loc": {}, "range": { "begin": {}, "end": {} },
                                      "name": "x",
                                      "type": { "qualType": "Real", "desugaredQualType": "double" } },
                                    { "id": "0xb", "kind": "ParmVarDecl", "loc": {}, "range": { "begin": {}, "end": {} },
                                      "type": { "qualType": "double" } }
                                ]
                            },
                            {
                                "id": "0xc", "kind": "CXXMethodDecl",
                                "loc": { "offset": 100, "line": 7, "col": 8 },
                                "range": { "begin": {}, "end": {} },
                                "name": "Norm",
                                "type": { "qualType": "Real () const", "desugaredQualType": "double () const" }
                            },
                            {
                                "id": "0xd", "kind": "CXXMethodDecl",
                                "loc": { "offset": 120, "line": 8, "col": 16 },
                                "range": { "begin": {}, "end": {} },
                                "name": "Origin", "storageClass": "static",
                                "type": { "qualType": "Point ()" }
                            },
                            {
                                "id": "0xe", "kind": "CXXConstructorDecl",
                                "loc": { "offset": 140, "line": 9, "col": 3 },
                                "range": { "begin": {}, "end": {} },
                                "name": "Point", "explicitlyDeleted": true,
                                "type": { "qualType": "void (const Point &)" },
                                "inner": [
                                    { "id": "0xf", "kind": "ParmVarDecl", "loc": {}, "range": { "begin": {}, "end": {} },
                                      "type": { "qualType": "const Point &" } }
                                ]
                            },
                            { "id": "0x10", "kind": "AccessSpecDecl",
                              "loc": { "offset": 160, "line": 10, "col": 1 },
                              "range": { "begin": {}, "end": {} }, "access": "private" },
                            {
                                "id": "0x11", "kind": "CXXMethodDecl",
                                "loc": { "offset": 170, "line": 11, "col": 7 },
                                "range": { "begin": {}, "end": {} },
                                "name": "secret", "type": { "qualType": "int ()" }
                            }
                        ]
                    }
                ]
            }
        ]
    })
}

#[test]
fn rejects_non_translation_units() {
    let error = lower_ast(&json!({ "kind": "NamespaceDecl" }), Path::new("a.h"))
        .expect_err("not a translation unit");
    assert_eq!(
        error.to_string(),
        "expected a TranslationUnitDecl at the root, found \"NamespaceDecl\""
    );
}

#[test]
fn scopes_aliases_and_records() {
    let tree = lower(&point_ast());
    assert_eq!(
        children(&tree, tree.root()),
        vec![
            (DeclKind::Struct, "Base".to_owned()),
            (DeclKind::Namespace, "geo".to_owned()),
        ]
    );

    let geo = child(&tree, tree.root(), "geo");
    assert_eq!(
        children(&tree, geo),
        vec![
            (DeclKind::Typedef, "Real".to_owned()),
            (DeclKind::Class, "Point".to_owned()),
        ]
    );
    let real = tree.get(child(&tree, geo, "Real"));
    assert_eq!(real.ty, Some(TypeRef::front_end("double")));

    let point = child(&tree, geo, "Point");
    assert_eq!(tree.qualified_name(point), "geo::Point");
    assert!(tree.get(point).is_definition());
    assert!(!tree.get(point).flags.contains(DeclFlags::ABSTRACT));
}

#[test]
fn included_declarations_are_flagged() {
    let tree = lower(&point_ast());
    let base = child(&tree, tree.root(), "Base");
    assert!(tree.get(base).flags.contains(DeclFlags::INCLUDED));

    let geo = child(&tree, tree.root(), "geo");
    assert!(!tree.get(geo).flags.contains(DeclFlags::INCLUDED));
    let point = child(&tree, geo, "Point");
    assert!(!tree.get(point).flags.contains(DeclFlags::INCLUDED));
}

#[test]
fn members_carry_access_and_qualifiers() {
    let tree = lower(&point_ast());
    let geo = child(&tree, tree.root(), "geo");
    let point = child(&tree, geo, "Point");
    let members: Vec<_> = tree.children(point).map(|id| tree.get(id)).collect();
    assert_eq!(members.len(), 5);

    let ctor = members[0];
    assert_eq!(ctor.kind, DeclKind::Constructor);
    assert_eq!(ctor.access, Access::Public);
    assert_eq!(
        ctor.params,
        vec![
            ParamDecl::new("x", TypeRef::front_end_with_canonical("Real", "double")),
            ParamDecl::new("", TypeRef::front_end("double")),
        ]
    );

    let norm = members[1];
    assert_eq!(norm.kind, DeclKind::Method);
    assert!(norm.flags.contains(DeclFlags::CONST));
    assert!(!norm.flags.contains(DeclFlags::STATIC));
    assert_eq!(norm.ty, Some(TypeRef::front_end_with_canonical("Real", "double")));

    let origin = members[2];
    assert!(origin.flags.contains(DeclFlags::STATIC));
    assert_eq!(origin.ty, Some(TypeRef::front_end("Point")));

    assert!(members[3].flags.contains(DeclFlags::DELETED));

    let secret = members[4];
    assert_eq!(secret.spelling, "secret");
    assert_eq!(secret.access, Access::Private);
}

#[test]
fn default_member_access_follows_tag() {
    let ast = json!({
        "kind": "TranslationUnitDecl",
        "inner": [
            { "id": "0x1", "kind": "CXXRecordDecl", "name": "S", "tagUsed": "struct",
              "completeDefinition": true,
              "inner": [ { "kind": "CXXMethodDecl", "name": "f", "type": { "qualType": "void ()" } } ] },
            { "id": "0x2", "kind": "CXXRecordDecl", "name": "C", "tagUsed": "class",
              "completeDefinition": true,
              "inner": [
                  { "kind": "CXXMethodDecl", "name": "g", "type": { "qualType": "void ()" } },
                  { "kind": "CXXMethodDecl", "name": "h", "access": "public",
                    "type": { "qualType": "void ()" } }
              ] },
            { "id": "0x3", "kind": "CXXRecordDecl", "name": "U", "tagUsed": "union",
              "completeDefinition": true }
        ]
    });
    let tree = lower(&ast);
    assert_eq!(children(&tree, tree.root()).len(), 2);

    let s = child(&tree, tree.root(), "S");
    assert_eq!(tree.get(child(&tree, s, "f")).access, Access::Public);
    let c = child(&tree, tree.root(), "C");
    assert_eq!(tree.get(child(&tree, c, "g")).access, Access::Private);
    assert_eq!(tree.get(child(&tree, c, "h")).access, Access::Public);
}

#[test]
fn enum_values() {
    let ast = json!({
        "kind": "TranslationUnitDecl",
        "inner": [{
            "kind": "EnumDecl", "name": "Color",
            "inner": [
                { "kind": "EnumConstantDecl", "name": "Red" },
                { "kind": "EnumConstantDecl", "name": "Green",
                  "inner": [{ "kind": "ConstantExpr", "value": "5",
                              "inner": [{ "kind": "IntegerLiteral", "value": "5" }] }] },
                { "kind": "EnumConstantDecl", "name": "Blue" },
                { "kind": "EnumConstantDecl", "name": "Neg",
                  "inner": [{ "kind": "ImplicitCastExpr",
                              "inner": [{ "kind": "ConstantExpr", "value": "-2" }] }] },
                { "kind": "EnumConstantDecl", "name": "Dependent",
                  "inner": [{ "kind": "DeclRefExpr" }] },
                { "kind": "EnumConstantDecl", "name": "After" }
            ]
        }]
    });
    let tree = lower(&ast);
    let color = child(&tree, tree.root(), "Color");
    let values: Vec<_> = tree
        .children(color)
        .map(|id| (tree.get(id).spelling.clone(), tree.get(id).enum_value))
        .collect();
    assert_eq!(
        values,
        vec![
            ("Red".to_owned(), Some(0)),
            ("Green".to_owned(), Some(5)),
            ("Blue".to_owned(), Some(6)),
            ("Neg".to_owned(), Some(-2)),
            ("Dependent".to_owned(), None),
            ("After".to_owned(), None),
        ]
    );
}

#[test]
fn class_templates_use_the_templated_record() {
    let ast = json!({
        "kind": "TranslationUnitDecl",
        "inner": [{
            "id": "0x1", "kind": "ClassTemplateDecl", "name": "Array",
            "inner": [
                { "kind": "TemplateTypeParmDecl", "name": "T" },
                { "id": "0x2", "kind": "CXXRecordDecl", "name": "Array", "tagUsed": "class",
                  "completeDefinition": true,
                  "inner": [
                      { "kind": "AccessSpecDecl", "access": "public" },
                      { "kind": "CXXMethodDecl", "name": "Size", "type": { "qualType": "int () const" } }
                  ] },
                { "kind": "ClassTemplateSpecializationDecl", "name": "Array" }
            ]
        }]
    });
    let tree = lower(&ast);
    assert_eq!(
        children(&tree, tree.root()),
        vec![(DeclKind::ClassTemplate, "Array".to_owned())]
    );
    let array = child(&tree, tree.root(), "Array");
    assert!(tree.get(array).is_definition());
    assert_eq!(children(&tree, array), vec![(DeclKind::Method, "Size".to_owned())]);
}

#[test]
fn linkage_specs_are_transparent_and_implicit_nodes_dropped() {
    let ast = json!({
        "kind": "TranslationUnitDecl",
        "inner": [{
            "kind": "LinkageSpecDecl", "language": "C",
            "inner": [
                { "kind": "TypedefDecl", "name": "handle_t", "type": { "qualType": "struct handle *" } },
                { "kind": "FunctionDecl", "name": "open_handle", "type": { "qualType": "handle_t ()" } }
            ]
        }]
    });
    let tree = lower(&ast);
    assert_eq!(
        children(&tree, tree.root()),
        vec![(DeclKind::Typedef, "handle_t".to_owned())]
    );
}

#[test]
fn out_of_line_definitions() {
    let ast = json!({
        "kind": "TranslationUnitDecl",
        "inner": [
            { "id": "0x1", "kind": "CXXRecordDecl", "name": "Outer", "tagUsed": "struct",
              "completeDefinition": true,
              "inner": [
                  { "id": "0x2", "kind": "CXXRecordDecl", "name": "Inner", "tagUsed": "struct" },
                  { "kind": "CXXMethodDecl", "name": "Run", "type": { "qualType": "void ()" } }
              ] },
            { "id": "0x3", "kind": "CXXRecordDecl", "name": "Inner", "tagUsed": "struct",
              "parentDeclContextId": "0x1", "completeDefinition": true },
            { "kind": "CXXMethodDecl", "name": "Run", "parentDeclContextId": "0x1",
              "previousDecl": "0x4", "type": { "qualType": "void ()" } }
        ]
    });
    let tree = lower(&ast);
    assert_eq!(
        children(&tree, tree.root()),
        vec![
            (DeclKind::Struct, "Outer".to_owned()),
            (DeclKind::Struct, "Inner".to_owned()),
        ]
    );
    let inner = child(&tree, tree.root(), "Inner");
    assert_eq!(tree.qualified_name(inner), "Outer::Inner");
}

#[test]
fn macro_locations_use_the_expansion_file() {
    let ast = json!({
        "kind": "TranslationUnitDecl",
        "inner": [
            { "kind": "CXXRecordDecl", "name": "FromMacro", "tagUsed": "struct",
              "loc": {
                  "spellingLoc": { "offset": 1, "file": "macros.h", "line": 1, "col": 1 },
                  "expansionLoc": { "offset": 9, "file": "geo.h", "line": 3, "col": 1 }
              },
              "completeDefinition": true },
            { "kind": "CXXRecordDecl", "name": "Plain", "tagUsed": "struct",
              "loc": { "offset": 20, "line": 4, "col": 8 },
              "completeDefinition": true }
        ]
    });
    let tree = lower(&ast);
    for name in ["FromMacro", "Plain"] {
        let id = child(&tree, tree.root(), name);
        assert!(!tree.get(id).flags.contains(DeclFlags::INCLUDED), "{name}");
    }
}

#[test]
fn dropped_subtrees_still_advance_the_current_file() {
    let ast = json!({
        "kind": "TranslationUnitDecl",
        "inner": [
            { "kind": "FunctionDecl", "name": "helper",
              "loc": { "offset": 1, "file": "geo.h", "line": 1, "col": 1 },
              "inner": [{ "kind": "CompoundStmt",
                          "range": { "begin": { "offset": 5, "file": "other.h", "line": 1, "col": 1 },
                                     "end": { "offset": 9, "col": 5 } } }] },
            { "kind": "CXXRecordDecl", "name": "Elsewhere", "tagUsed": "struct",
              "loc": { "offset": 12, "line": 2, "col": 8 },
              "completeDefinition": true }
        ]
    });
    let tree = lower(&ast);
    let elsewhere = child(&tree, tree.root(), "Elsewhere");
    assert!(tree.get(elsewhere).flags.contains(DeclFlags::INCLUDED));
}
