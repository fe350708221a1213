//! Discovery pass: fill the [`TypeRegistry`] from declaration trees.
//!
//! Every node is visited, including declarations that came from included
//! headers, since a type used here is often declared elsewhere.
//!
//! Types declared inside a namespace or class are registered under their
//! qualified name. Their bare name is also registered as an alias of the
//! qualified one, because members refer to sibling types without the scope
//! prefix. That scope alias is weaker than any real declaration, so a
//! top-level typedef, record or enum of the same name always wins,
//! whichever is seen first.

use gdcpp_decl::{DeclId, DeclKind, DeclTree, ParsedHeader};
use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::builtins::BUILTIN_PRIMITIVES;
use crate::overrides::OverrideTable;
use crate::registry::{Enumerator, TypeRegistry};

/// Discover every header in order, then inject builtins and overrides.
#[instrument(level = "debug", skip_all, fields(headers = headers.len()))]
pub fn discover(headers: &[ParsedHeader], overrides: &OverrideTable) -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    for header in headers {
        trace!(path = %header.path.display(), "discovering types");
        discover_tree(&mut registry, &header.tree);
    }
    finish(registry, overrides)
}

/// Like [`discover`], but each header is discovered into its own partial
/// registry on the rayon pool. Partials are merged in header order, so
/// the result equals the sequential one.
#[instrument(level = "debug", skip_all, fields(headers = headers.len()))]
pub fn discover_parallel(headers: &[ParsedHeader], overrides: &OverrideTable) -> TypeRegistry {
    let partials: Vec<TypeRegistry> = headers
        .par_iter()
        .map(|header| {
            let mut partial = TypeRegistry::new();
            discover_tree(&mut partial, &header.tree);
            partial
        })
        .collect();

    let mut registry = TypeRegistry::new();
    for partial in partials {
        registry.merge(partial);
    }
    finish(registry, overrides)
}

fn finish(mut registry: TypeRegistry, overrides: &OverrideTable) -> TypeRegistry {
    let builtins = inject_builtins(&mut registry);
    let injected = inject_overrides(&mut registry, overrides);
    debug!(types = registry.len(), builtins, injected, "discovery finished");
    registry
}

/// Collect the types declared in one tree.
pub fn discover_tree(registry: &mut TypeRegistry, tree: &DeclTree) {
    visit(registry, tree, tree.root());
}

fn visit(registry: &mut TypeRegistry, tree: &DeclTree, parent: DeclId) {
    for id in tree.children(parent) {
        let node = tree.get(id);
        match node.kind {
            DeclKind::Typedef | DeclKind::TypeAlias => {
                if node.is_anonymous() {
                    continue;
                }
                let name = tree.qualified_name(id);
                let underlying = node.ty.as_ref().map(|ty| ty.spelling().to_owned());
                registry.register_alias(&name, underlying);
                register_unqualified(registry, &node.spelling, &name);
            }
            DeclKind::Struct | DeclKind::Class | DeclKind::ClassTemplate => {
                if !node.is_anonymous() {
                    let name = tree.qualified_name(id);
                    registry.register_record(&name, node.is_definition());
                    register_unqualified(registry, &node.spelling, &name);
                }
                visit(registry, tree, id);
            }
            DeclKind::Enum => {
                if node.is_anonymous() {
                    continue;
                }
                let name = tree.qualified_name(id);
                registry.register_enum(&name, enumerators_of(tree, id));
                register_unqualified(registry, &node.spelling, &name);
            }
            DeclKind::TranslationUnit | DeclKind::Namespace | DeclKind::Other => {
                visit(registry, tree, id);
            }
            DeclKind::EnumConstant | DeclKind::Method | DeclKind::Constructor => {}
        }
    }
}

fn register_unqualified(registry: &mut TypeRegistry, spelling: &str, qualified: &str) {
    if spelling != qualified {
        registry.register_scope_alias(spelling, qualified);
    }
}

/// Enumerators of an enum node; unevaluated values become 0.
pub fn enumerators_of(tree: &DeclTree, id: DeclId) -> Vec<Enumerator> {
    tree.children(id)
        .map(|child| tree.get(child))
        .filter(|node| node.kind == DeclKind::EnumConstant)
        .map(|node| {
            let value = node.enum_value.unwrap_or_else(|| {
                trace!(enumerator = %node.spelling, "unevaluated enumerator, using 0");
                0
            });
            Enumerator::new(node.spelling.clone(), value)
        })
        .collect()
}

/// Inject the built-in primitive aliases for names discovery did not see.
///
/// Identity entries (`int` → `int`) are not stored; an absent name already
/// resolves to itself. Returns the number of entries inserted.
pub fn inject_builtins(registry: &mut TypeRegistry) -> usize {
    BUILTIN_PRIMITIVES
        .iter()
        .filter(|(alias, target)| alias != target)
        .filter(|(alias, target)| registry.inject_alias(alias, target))
        .count()
}

/// Inject override entries for names not otherwise known.
///
/// Returns the number of entries inserted.
pub fn inject_overrides(registry: &mut TypeRegistry, overrides: &OverrideTable) -> usize {
    overrides
        .iter()
        .filter(|(spelling, mapping)| registry.inject_override(spelling, mapping.target.as_deref()))
        .count()
}

#[cfg(test)]
mod tests;
