use gdcpp_decl::{DeclFlags, DeclNode, TypeRef};
use pretty_assertions::assert_eq;

use super::*;
use crate::registry::{TypeEntry, TypeKind};
use crate::OverrideMapping;

fn header(path: &str, tree: DeclTree) -> ParsedHeader {
    ParsedHeader {
        path: path.into(),
        tree,
    }
}

fn typedef(name: &str, underlying: &str) -> DeclNode {
    DeclNode::new(DeclKind::Typedef, name).with_type(TypeRef::front_end(underlying))
}

fn class(name: &str, definition: bool) -> DeclNode {
    let flags = if definition {
        DeclFlags::DEFINITION
    } else {
        DeclFlags::empty()
    };
    DeclNode::new(DeclKind::Class, name).with_flags(flags)
}

fn sample_tree() -> DeclTree {
    let mut tree = DeclTree::new();
    let root = tree.root();
    tree.push(root, typedef("Real", "double"));
    let ns = tree.push(root, DeclNode::new(DeclKind::Namespace, "geom"));
    let shape = tree.push(ns, class("Shape", true));
    let kind = tree.push(shape, DeclNode::new(DeclKind::Enum, "Kind"));
    tree.push(kind, DeclNode::new(DeclKind::EnumConstant, "Solid").with_enum_value(0));
    tree.push(kind, DeclNode::new(DeclKind::EnumConstant, "Shell").with_enum_value(4));
    tree.push(kind, DeclNode::new(DeclKind::EnumConstant, "Broken"));
    tree.push(ns, DeclNode::new(DeclKind::Struct, "").with_flags(DeclFlags::DEFINITION));
    tree
}

#[test]
fn collects_aliases_records_and_enums() {
    let registry = discover(&[header("a.h", sample_tree())], &OverrideTable::new());

    assert_eq!(
        registry.get("Real").map(|e| &e.kind),
        Some(&TypeKind::Alias {
            underlying: Some("double".into())
        })
    );
    assert!(registry.is_complete_record("geom::Shape"));
    assert_eq!(
        registry.get("geom::Shape::Kind").map(|e| &e.kind),
        Some(&TypeKind::Enum {
            enumerators: vec![
                Enumerator::new("Solid", 0),
                Enumerator::new("Shell", 4),
                Enumerator::new("Broken", 0),
            ]
        })
    );
}

#[test]
fn scoped_types_get_unqualified_alias() {
    let registry = discover(&[header("a.h", sample_tree())], &OverrideTable::new());

    assert_eq!(
        registry.get("Shape").and_then(TypeEntry::underlying),
        Some("geom::Shape")
    );
    assert_eq!(
        registry.get("Kind").and_then(TypeEntry::underlying),
        Some("geom::Shape::Kind")
    );
}

#[test]
fn anonymous_declarations_are_skipped() {
    let registry = discover(&[header("a.h", sample_tree())], &OverrideTable::new());

    assert!(registry.iter().all(|entry| !entry.name.is_empty()));
    assert!(!registry.contains("geom::"));
}

#[test]
fn discovery_is_idempotent() {
    let headers = [header("a.h", sample_tree())];
    let overrides = OverrideTable::new().with("gp_Pnt", OverrideMapping::with_target("Vector3"));

    assert_eq!(discover(&headers, &overrides), discover(&headers, &overrides));
}

#[test]
fn forward_declaration_completed_by_later_header() {
    let mut first = DeclTree::new();
    first.push(first.root(), class("gp_Pnt", false));
    let mut second = DeclTree::new();
    second.push(second.root(), class("gp_Pnt", true));

    let only_first = discover(&[header("a.h", first.clone())], &OverrideTable::new());
    assert!(!only_first.is_complete_record("gp_Pnt"));

    let both = discover(
        &[header("a.h", first), header("b.h", second)],
        &OverrideTable::new(),
    );
    assert!(both.is_complete_record("gp_Pnt"));
}

#[test]
fn discovered_typedefs_beat_builtins() {
    let mut tree = DeclTree::new();
    tree.push(tree.root(), typedef("Standard_Real", "float"));

    let registry = discover(&[header("a.h", tree)], &OverrideTable::new());
    assert_eq!(
        registry.get("Standard_Real").and_then(TypeEntry::underlying),
        Some("float")
    );
    assert_eq!(
        registry.get("Standard_Integer").and_then(TypeEntry::underlying),
        Some("int")
    );
    assert!(!registry.contains("double"));
}

#[test]
fn overrides_have_lowest_priority() {
    let mut tree = DeclTree::new();
    tree.push(tree.root(), class("gp_Pnt", true));
    let overrides = OverrideTable::new()
        .with("gp_Pnt", OverrideMapping::with_target("Vector3"))
        .with("gp_Dir", OverrideMapping::with_target("Vector3"))
        .with("Standard_Integer", OverrideMapping::with_target("int64_t"));

    let registry = discover(&[header("a.h", tree)], &overrides);
    assert!(registry.is_complete_record("gp_Pnt"));
    assert_eq!(
        registry.get("gp_Dir").map(|e| &e.kind),
        Some(&TypeKind::Override {
            underlying: Some("Vector3".into())
        })
    );
    assert_eq!(
        registry.get("Standard_Integer").and_then(TypeEntry::underlying),
        Some("int")
    );
}

#[test]
fn parallel_discovery_matches_sequential() {
    let mut first = DeclTree::new();
    first.push(first.root(), class("Foo", false));
    first.push(first.root(), typedef("Handle_Foo", "opencascade::handle<Foo>"));
    let mut second = DeclTree::new();
    second.push(second.root(), typedef("Handle_Foo", "Foo *"));
    second.push(second.root(), class("Foo", true));
    let headers = vec![
        header("a.h", first),
        header("b.h", second),
        header("c.h", sample_tree()),
    ];
    let overrides = OverrideTable::new().with("Bar", OverrideMapping::default());

    let sequential = discover(&headers, &overrides);
    let parallel = discover_parallel(&headers, &overrides);
    assert_eq!(parallel, sequential);
    assert_eq!(
        parallel.get("Handle_Foo").and_then(TypeEntry::underlying),
        Some("opencascade::handle<Foo>")
    );
}

/// `namespace a { class Foo {}; }` and `typedef int Foo;`, in either order.
fn scoped_and_top_level_foo(scoped_first: bool) -> DeclTree {
    let mut tree = DeclTree::new();
    let root = tree.root();
    if !scoped_first {
        tree.push(root, typedef("Foo", "int"));
    }
    let ns = tree.push(root, DeclNode::new(DeclKind::Namespace, "a"));
    tree.push(ns, class("Foo", true));
    if scoped_first {
        tree.push(root, typedef("Foo", "int"));
    }
    tree
}

#[test]
fn top_level_typedef_beats_scope_alias_in_any_order() {
    let overrides = OverrideTable::new();
    for scoped_first in [true, false] {
        let headers = [header("a.h", scoped_and_top_level_foo(scoped_first))];
        let registry = discover(&headers, &overrides);

        assert_eq!(
            registry.get("Foo").map(|e| &e.kind),
            Some(&TypeKind::Alias {
                underlying: Some("int".into())
            }),
            "scoped_first = {scoped_first}"
        );
        assert!(registry.is_complete_record("a::Foo"));

        let classifier = crate::Classifier::new(&registry, &overrides);
        assert_eq!(
            classifier.classify("Foo"),
            crate::Classification::Primitive {
                target: "int".into()
            }
        );
    }
}

#[test]
fn top_level_typedef_in_later_header_beats_scope_alias() {
    let mut scoped = DeclTree::new();
    let ns = scoped.push(scoped.root(), DeclNode::new(DeclKind::Namespace, "a"));
    scoped.push(ns, class("Foo", true));
    let mut top = DeclTree::new();
    top.push(top.root(), typedef("Foo", "int"));
    let headers = [header("a.h", scoped), header("b.h", top)];
    let overrides = OverrideTable::new();

    let sequential = discover(&headers, &overrides);
    assert_eq!(sequential.get("Foo").and_then(TypeEntry::underlying), Some("int"));
    assert_eq!(discover_parallel(&headers, &overrides), sequential);
}
