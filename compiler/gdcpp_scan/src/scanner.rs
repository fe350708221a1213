//! API scanning pass.
//!
//! Collects, for every named record declared in the scanned header itself,
//! its public methods and constructors and its named nested enums. Public
//! nested records get their own model. Non-public members are left out of
//! the wrapper surface on purpose.
//!
//! Skipped members: deleted functions, operators and conversion functions.

use gdcpp_decl::{
    Access, DeclFlags, DeclId, DeclKind, DeclNode, DeclTree, ParamDecl, ParsedHeader, TypeRef,
};
use gdcpp_types::{enumerators_of, TypeRegistry};
use tracing::{debug, info, instrument, trace};

use crate::model::{
    ApiModel, ClassModel, ConstructorSignature, MethodFlags, MethodSignature, NestedEnum, Param,
};
use crate::naming::is_operator_name;

/// Scan every header and return the class models.
#[instrument(level = "debug", skip_all, fields(headers = headers.len()))]
pub fn scan(headers: &[ParsedHeader], registry: &TypeRegistry) -> ApiModel {
    let mut scanner = ApiScanner::new(registry);
    for header in headers {
        debug!(path = %header.path.display(), "scanning API");
        scanner.scan_tree(&header.tree);
    }
    scanner.finish()
}

/// Accumulates class models across headers.
pub struct ApiScanner<'a> {
    registry: &'a TypeRegistry,
    api: ApiModel,
}

impl<'a> ApiScanner<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        ApiScanner {
            registry,
            api: ApiModel::new(),
        }
    }

    pub fn scan_tree(&mut self, tree: &DeclTree) {
        self.walk(tree, tree.root());
    }

    pub fn finish(self) -> ApiModel {
        self.api
    }

    fn walk(&mut self, tree: &DeclTree, parent: DeclId) {
        for id in tree.children(parent) {
            let node = tree.get(id);
            match node.kind {
                DeclKind::Struct | DeclKind::Class | DeclKind::ClassTemplate => {
                    if node.is_anonymous() || node.flags.contains(DeclFlags::INCLUDED) {
                        continue;
                    }
                    self.process_record(tree, id, false);
                }
                DeclKind::Namespace | DeclKind::Other | DeclKind::TranslationUnit => {
                    self.walk(tree, id);
                }
                _ => {}
            }
        }
    }

    fn process_record(&mut self, tree: &DeclTree, id: DeclId, in_template: bool) {
        let node = tree.get(id);
        let mut model = ClassModel::new(tree.qualified_name(id));
        info!(class = %model.qualified_name, "API candidate class");

        model.is_definition = node.is_definition();
        model.is_complete = self.registry.is_complete_record(&model.qualified_name);
        model.is_abstract = node.flags.contains(DeclFlags::ABSTRACT);
        model.is_template = in_template || node.kind == DeclKind::ClassTemplate;

        let mut nested = Vec::new();
        for child_id in tree.children(id) {
            let child = tree.get(child_id);
            match child.kind {
                DeclKind::Method if is_callable(child) => {
                    if is_operator_name(&child.spelling) {
                        trace!(method = %child.spelling, "skipping operator");
                        continue;
                    }
                    model.methods.push(collect_method(child));
                }
                DeclKind::Constructor if is_callable(child) => {
                    model.constructors.push(ConstructorSignature {
                        params: collect_params(&child.params),
                        ret: TypeRef::synthesized(model.qualified_name.clone()),
                    });
                }
                DeclKind::Enum if !child.is_anonymous() => {
                    model.enums.push(NestedEnum {
                        name: child.spelling.clone(),
                        enumerators: enumerators_of(tree, child_id),
                    });
                }
                DeclKind::Struct | DeclKind::Class | DeclKind::ClassTemplate
                    if !child.is_anonymous() && child.access == Access::Public =>
                {
                    nested.push(child_id);
                }
                _ => {}
            }
        }

        let in_template = model.is_template;
        debug!(
            class = %model.qualified_name,
            methods = model.methods.len(),
            constructors = model.constructors.len(),
            enums = model.enums.len(),
            forwardable = model.is_forwardable(),
            "scanned class"
        );
        self.api.insert(model);

        for child_id in nested {
            self.process_record(tree, child_id, in_template);
        }
    }
}

/// Public and not deleted.
fn is_callable(node: &DeclNode) -> bool {
    node.access == Access::Public && !node.flags.contains(DeclFlags::DELETED)
}

fn collect_method(node: &DeclNode) -> MethodSignature {
    let mut flags = MethodFlags::empty();
    flags.set(MethodFlags::STATIC, node.flags.contains(DeclFlags::STATIC));
    flags.set(MethodFlags::CONST, node.flags.contains(DeclFlags::CONST));

    MethodSignature {
        name: node.spelling.clone(),
        ret: node
            .ty
            .clone()
            .unwrap_or_else(|| TypeRef::synthesized("void")),
        params: collect_params(&node.params),
        flags,
    }
}

/// Unnamed parameters become `arg<index>`, suffixed with `_` until the name
/// differs from every other parameter.
fn collect_params(params: &[ParamDecl]) -> Vec<Param> {
    let mut collected: Vec<Param> = Vec::with_capacity(params.len());
    for (index, param) in params.iter().enumerate() {
        let name = if param.name.is_empty() {
            let taken = |name: &str| {
                params.iter().any(|p| p.name == name) || collected.iter().any(|p| p.name == name)
            };
            let mut name = format!("arg{index}");
            while taken(&name) {
                name.push('_');
            }
            name
        } else {
            param.name.clone()
        };
        collected.push(Param::new(name, param.ty.clone()));
    }
    collected
}
