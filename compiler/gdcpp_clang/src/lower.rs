//! Lowering of the clang JSON AST into a declaration tree.
//!
//! clang writes source locations delta-encoded: a `file` key appears only
//! when the file differs from the previously printed location. Every node is
//! therefore visited in document order, including the ones that are
//! dropped, so the current file is known at each declaration.

use std::path::Path;

use gdcpp_decl::{Access, DeclFlags, DeclId, DeclKind, DeclNode, DeclTree, ParamDecl, TypeRef};
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::trace;

use crate::signature::FunctionType;

/// The JSON document is not a clang AST.
#[derive(Debug, thiserror::Error)]
pub enum AstError {
    #[error("expected a TranslationUnitDecl at the root, found {0:?}")]
    UnexpectedRoot(String),
}

/// Lower a clang JSON AST. Declarations located outside `main_file` are
/// flagged [`DeclFlags::INCLUDED`].
pub fn lower_ast(ast: &Value, main_file: &Path) -> Result<DeclTree, AstError> {
    let kind = kind_of(ast);
    if kind != "TranslationUnitDecl" {
        return Err(AstError::UnexpectedRoot(kind.to_owned()));
    }

    let mut lowering = Lowering {
        tree: DeclTree::new(),
        main_file,
        current_file: None,
        scopes: FxHashMap::default(),
    };
    lowering.locate(ast);
    let root = lowering.tree.root();
    lowering.register_scope(ast, root);
    lowering.lower_children(ast, root, Access::Unspecified);
    Ok(lowering.tree)
}

struct Lowering<'m> {
    tree: DeclTree,
    main_file: &'m Path,
    current_file: Option<String>,
    /// clang node id -> scope node, for re-linking out-of-line definitions.
    scopes: FxHashMap<String, DeclId>,
}

impl Lowering<'_> {
    /// Track the locations of `node` itself and report whether it sits in
    /// an included file.
    fn locate(&mut self, node: &Value) -> bool {
        if let Some(loc) = node.get("loc") {
            self.track(loc);
        }
        let included = self
            .current_file
            .as_deref()
            .is_some_and(|file| Path::new(file) != self.main_file);
        if let Some(range) = node.get("range") {
            for end in ["begin", "end"] {
                if let Some(loc) = range.get(end) {
                    self.track(loc);
                }
            }
        }
        included
    }

    fn track(&mut self, loc: &Value) {
        if let Some(spelling) = loc.get("spellingLoc") {
            self.track(spelling);
        }
        if let Some(expansion) = loc.get("expansionLoc") {
            self.track(expansion);
        }
        if let Some(file) = loc.get("file").and_then(Value::as_str) {
            if self.current_file.as_deref() != Some(file) {
                self.current_file = Some(file.to_owned());
            }
        }
    }

    /// Walk a dropped subtree for its locations.
    fn skip(&mut self, node: &Value) {
        self.locate(node);
        self.skip_inner(node);
    }

    fn skip_inner(&mut self, node: &Value) {
        for child in inner(node) {
            self.skip(child);
        }
    }

    fn register_scope(&mut self, node: &Value, id: DeclId) {
        if let Some(clang_id) = node.get("id").and_then(Value::as_str) {
            self.scopes.insert(clang_id.to_owned(), id);
        }
    }

    /// Re-link a definition written outside its semantic scope.
    fn relink(&mut self, node: &Value, id: DeclId) {
        let parent = node
            .get("parentDeclContextId")
            .and_then(Value::as_str)
            .and_then(|clang_id| self.scopes.get(clang_id).copied());
        if let Some(parent) = parent {
            self.tree.set_semantic_parent(id, parent);
        }
    }

    fn lower_children(&mut self, node: &Value, parent: DeclId, default_access: Access) {
        let mut access = default_access;
        for child in inner(node) {
            let included = self.locate(child);
            let kind = kind_of(child);
            if kind == "AccessSpecDecl" {
                access = access_of(child).unwrap_or(access);
                self.skip_inner(child);
                continue;
            }
            if flag(child, "isImplicit") {
                self.skip_inner(child);
                continue;
            }
            let member_access = access_of(child).unwrap_or(access);
            let mut flags = DeclFlags::empty();
            flags.set(DeclFlags::INCLUDED, included);

            match kind {
                "NamespaceDecl" => {
                    let namespace = DeclNode::new(DeclKind::Namespace, name_of(child)).with_flags(flags);
                    let id = self.tree.push(parent, namespace);
                    self.register_scope(child, id);
                    self.lower_children(child, id, Access::Unspecified);
                }
                "LinkageSpecDecl" | "ExportDecl" => {
                    self.lower_children(child, parent, access);
                }
                "TypedefDecl" | "TypeAliasDecl" => {
                    let decl_kind = if kind == "TypedefDecl" {
                        DeclKind::Typedef
                    } else {
                        DeclKind::TypeAlias
                    };
                    let mut decl = DeclNode::new(decl_kind, name_of(child))
                        .with_access(member_access)
                        .with_flags(flags);
                    if let Some(ty) = child.get("type").and_then(type_ref) {
                        decl = decl.with_type(ty);
                    }
                    self.tree.push(parent, decl);
                    self.skip_inner(child);
                }
                "CXXRecordDecl" => {
                    self.lower_record(child, parent, member_access, flags, None);
                }
                "ClassTemplateDecl" => {
                    self.lower_template(child, parent, member_access, flags);
                }
                "EnumDecl" => {
                    self.lower_enum(child, parent, member_access, flags);
                }
                "CXXMethodDecl" => {
                    self.lower_function(child, parent, DeclKind::Method, member_access, flags);
                }
                "CXXConstructorDecl" => {
                    self.lower_function(child, parent, DeclKind::Constructor, member_access, flags);
                }
                _ => {
                    trace!(kind, "dropping declaration");
                    self.skip_inner(child);
                }
            }
        }
    }

    fn lower_record(
        &mut self,
        node: &Value,
        parent: DeclId,
        access: Access,
        mut flags: DeclFlags,
        kind: Option<DeclKind>,
    ) -> Option<DeclId> {
        let tag = node.get("tagUsed").and_then(Value::as_str).unwrap_or("struct");
        if tag == "union" {
            self.skip_inner(node);
            return None;
        }
        let kind = kind.unwrap_or(if tag == "class" {
            DeclKind::Class
        } else {
            DeclKind::Struct
        });
        flags.set(DeclFlags::DEFINITION, flag(node, "completeDefinition"));
        flags.set(
            DeclFlags::ABSTRACT,
            node.pointer("/definitionData/isAbstract")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        );

        let id = self.tree.push(
            parent,
            DeclNode::new(kind, name_of(node))
                .with_access(access)
                .with_flags(flags),
        );
        self.register_scope(node, id);
        self.relink(node, id);

        let default_access = if tag == "class" {
            Access::Private
        } else {
            Access::Public
        };
        self.lower_children(node, id, default_access);
        Some(id)
    }

    /// A class template takes its members from the templated record.
    fn lower_template(&mut self, node: &Value, parent: DeclId, access: Access, flags: DeclFlags) {
        let mut lowered = false;
        for child in inner(node) {
            self.locate(child);
            if !lowered && kind_of(child) == "CXXRecordDecl" {
                lowered = true;
                let record =
                    self.lower_record(child, parent, access, flags, Some(DeclKind::ClassTemplate));
                if let Some(id) = record {
                    self.register_scope(node, id);
                }
            } else {
                self.skip_inner(child);
            }
        }
    }

    fn lower_enum(&mut self, node: &Value, parent: DeclId, access: Access, flags: DeclFlags) {
        let id = self.tree.push(
            parent,
            DeclNode::new(DeclKind::Enum, name_of(node))
                .with_access(access)
                .with_flags(flags),
        );

        let mut next = Some(0i64);
        for child in inner(node) {
            self.locate(child);
            if kind_of(child) == "EnumConstantDecl" {
                let value = if inner(child).next().is_none() {
                    next
                } else {
                    constant_value(child)
                };
                let mut constant = DeclNode::new(DeclKind::EnumConstant, name_of(child));
                if let Some(value) = value {
                    constant = constant.with_enum_value(value);
                }
                self.tree.push(id, constant);
                next = value.and_then(|v| v.checked_add(1));
            }
            self.skip_inner(child);
        }
    }

    fn lower_function(
        &mut self,
        node: &Value,
        parent: DeclId,
        kind: DeclKind,
        access: Access,
        mut flags: DeclFlags,
    ) {
        // Out-of-line definitions repeat a declaration already seen in the class.
        if node.get("parentDeclContextId").is_some() {
            self.skip_inner(node);
            return;
        }

        let mut params = Vec::new();
        for child in inner(node) {
            self.locate(child);
            if kind_of(child) == "ParmVarDecl" {
                if let Some(ty) = child.get("type").and_then(type_ref) {
                    params.push(ParamDecl::new(name_of(child), ty));
                }
            }
            self.skip_inner(child);
        }

        let ty = node.get("type");
        let spelling = ty.and_then(|t| t.get("qualType")).and_then(Value::as_str);
        let signature = spelling.and_then(FunctionType::parse);
        let canonical = ty
            .and_then(|t| t.get("desugaredQualType"))
            .and_then(Value::as_str)
            .and_then(FunctionType::parse);

        flags.set(
            DeclFlags::STATIC,
            node.get("storageClass").and_then(Value::as_str) == Some("static"),
        );
        flags.set(DeclFlags::DELETED, flag(node, "explicitlyDeleted"));
        flags.set(
            DeclFlags::CONST,
            signature.as_ref().is_some_and(|sig| sig.is_const),
        );

        let mut decl = DeclNode::new(kind, name_of(node))
            .with_access(access)
            .with_flags(flags)
            .with_params(params);
        if kind == DeclKind::Method {
            if let Some(sig) = signature {
                let ret = match canonical {
                    Some(canonical) => TypeRef::front_end_with_canonical(sig.ret, canonical.ret),
                    None => TypeRef::front_end(sig.ret),
                };
                decl = decl.with_type(ret);
            }
        }
        self.tree.push(parent, decl);
    }
}

fn inner(node: &Value) -> impl Iterator<Item = &Value> {
    node.get("inner")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn kind_of(node: &Value) -> &str {
    node.get("kind").and_then(Value::as_str).unwrap_or("")
}

fn name_of(node: &Value) -> &str {
    node.get("name").and_then(Value::as_str).unwrap_or("")
}

fn flag(node: &Value, key: &str) -> bool {
    node.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn access_of(node: &Value) -> Option<Access> {
    match node.get("access").and_then(Value::as_str)? {
        "public" => Some(Access::Public),
        "protected" => Some(Access::Protected),
        "private" => Some(Access::Private),
        _ => None,
    }
}

/// `{"qualType": ..., "desugaredQualType": ...}` as a type reference.
fn type_ref(ty: &Value) -> Option<TypeRef> {
    let spelling = ty.get("qualType").and_then(Value::as_str)?;
    Some(match ty.get("desugaredQualType").and_then(Value::as_str) {
        Some(canonical) => TypeRef::front_end_with_canonical(spelling, canonical),
        None => TypeRef::front_end(spelling),
    })
}

/// Value of the first `ConstantExpr` under an enum constant's initializer.
fn constant_value(node: &Value) -> Option<i64> {
    inner(node).find_map(|child| {
        if kind_of(child) == "ConstantExpr" {
            if let Some(value) = child.get("value").and_then(Value::as_str) {
                return value.parse().ok();
            }
        }
        constant_value(child)
    })
}

#[cfg(test)]
mod tests;
