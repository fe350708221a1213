//! Type classifier.
//!
//! Maps any type spelling to the [`Classification`] the emitter uses to pick
//! a forwarding strategy. Classification is total: every spelling, including
//! empty ones and self-referential alias chains, yields exactly one variant.
//!
//! # Rules
//!
//! Evaluated in order, first match wins:
//!
//! 1. exact spelling in the override table → `Override`
//! 2. resolve the alias chain (bounded, cycle-checked) to `resolved`
//! 3. `resolved` in the built-in primitive table → `Primitive`
//! 4. registered enum → `EnumRef`
//! 5. registered record → `RecordRef` (complete) or `Opaque` (forward-declared)
//! 6. alias whose chain hit the depth limit → classify the underlying spelling
//! 7. cv-qualifiers, elaborated keywords and one declarator peeled off →
//!    classify the base
//! 8. smart-pointer template → `Opaque`
//! 9. single-argument sequence template → `VectorOf`
//! 10. canonical primitive name → `Primitive`
//! 11. anything else → `Opaque`

use std::cell::RefCell;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::builtins::{builtin_primitive, is_canonical_primitive};
use crate::overrides::{OverrideMapping, OverrideTable};
use crate::registry::{Enumerator, TypeKind, TypeRegistry};
use crate::spelling::{sequence_argument, Indirection, SequenceArgument, TypeShape};

/// Bound on alias-chain length and classification recursion.
pub const MAX_ALIAS_DEPTH: usize = 20;

/// Spelling prefixes of smart-pointer templates.
const SMART_POINTER_PATTERNS: &[&str] = &[
    "Handle(",
    "Handle<",
    "Handle_",
    "opencascade::handle<",
    "std::shared_ptr<",
    "std::unique_ptr<",
    "std::weak_ptr<",
];

/// Single-argument sequence templates forwarded as `VectorOf`.
const SEQUENCE_TEMPLATES: &[&str] = &["std::vector", "std::deque", "std::list"];

/// How a type crosses the wrapper boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A scalar the host binds natively.
    Primitive { target: String },

    /// A registered enum, passed as an integer.
    EnumRef {
        name: String,
        enumerators: Vec<Enumerator>,
    },

    /// A registered record, passed as an opaque handle.
    RecordRef { name: String, is_complete: bool },

    /// A single-argument sequence template.
    VectorOf {
        inner: String,
        inner_classification: Box<Classification>,
    },

    /// A user override mapping.
    Override { mapping: OverrideMapping },

    /// No safe conversion known.
    Opaque {
        spelling: String,
        note: Option<OpaqueNote>,
    },
}

impl Classification {
    fn opaque(spelling: &str, note: Option<OpaqueNote>) -> Self {
        Classification::Opaque {
            spelling: spelling.to_owned(),
            note,
        }
    }

    /// Short kind name, for logs and diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Classification::Primitive { .. } => "primitive",
            Classification::EnumRef { .. } => "enum",
            Classification::RecordRef { .. } => "record",
            Classification::VectorOf { .. } => "vector",
            Classification::Override { .. } => "override",
            Classification::Opaque { .. } => "opaque",
        }
    }
}

/// Why a spelling classified as [`Classification::Opaque`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpaqueNote {
    SmartPointer,
    IncompleteRecord,
    NestedTemplate,
    MultipleTemplateArguments,
    PointerToScalar,
    MultipleIndirection,
    AliasCycle,
    DepthLimit,
}

impl fmt::Display for OpaqueNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OpaqueNote::SmartPointer => "smart pointer not mapped",
            OpaqueNote::IncompleteRecord => "record only forward-declared",
            OpaqueNote::NestedTemplate => "nested template argument",
            OpaqueNote::MultipleTemplateArguments => "template with several arguments",
            OpaqueNote::PointerToScalar => "pointer to scalar",
            OpaqueNote::MultipleIndirection => "multiple indirection",
            OpaqueNote::AliasCycle => "typedef cycle",
            OpaqueNote::DepthLimit => "typedef chain too deep",
        })
    }
}

/// Why alias resolution stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResolutionStop {
    /// Reached a non-alias entry or a name the registry does not know.
    Terminal,
    /// Revisited a name already on the chain.
    Cycle,
    /// Followed the maximum number of links.
    DepthLimit,
}

/// Result of following an alias chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    /// Last spelling reached.
    pub terminal: String,
    pub stop: ResolutionStop,
}

/// Classifier over a finished registry.
///
/// # Interior Mutability
///
/// Results are memoized per spelling in a `RefCell` cache so `classify`
/// can take `&self`. The registry is immutable, so cached entries never go
/// stale.
pub struct Classifier<'a> {
    registry: &'a TypeRegistry,
    overrides: &'a OverrideTable,
    cache: RefCell<FxHashMap<String, Classification>>,
}

impl<'a> Classifier<'a> {
    pub fn new(registry: &'a TypeRegistry, overrides: &'a OverrideTable) -> Self {
        Classifier {
            registry,
            overrides,
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    /// Follow alias links from `spelling` until a non-alias, an unknown
    /// name, a cycle, or the depth limit.
    pub fn resolve(&self, spelling: &str) -> Resolution {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut current = spelling;
        let mut links = 0;

        loop {
            if !visited.insert(current) {
                return stopped(current, ResolutionStop::Cycle);
            }
            let Some(next) = self.registry.alias_target(current) else {
                return stopped(current, ResolutionStop::Terminal);
            };
            if links >= MAX_ALIAS_DEPTH {
                return stopped(current, ResolutionStop::DepthLimit);
            }
            links += 1;
            current = next;
        }
    }

    /// Classify a type spelling.
    pub fn classify(&self, spelling: &str) -> Classification {
        let spelling = spelling.trim();
        if let Some(cached) = self.cache.borrow().get(spelling) {
            return cached.clone();
        }

        let result = self.classify_at(spelling, 0);
        trace!(spelling, kind = result.kind_name(), "classified");
        self.cache
            .borrow_mut()
            .insert(spelling.to_owned(), result.clone());
        result
    }

    fn classify_at(&self, spelling: &str, depth: usize) -> Classification {
        let spelling = spelling.trim();
        if depth > MAX_ALIAS_DEPTH {
            return Classification::opaque(spelling, Some(OpaqueNote::DepthLimit));
        }
        if spelling.is_empty() {
            return Classification::opaque(spelling, None);
        }

        if let Some(mapping) = self.overrides.get(spelling) {
            return Classification::Override {
                mapping: mapping.clone(),
            };
        }

        let resolution = self.resolve(spelling);
        if resolution.stop == ResolutionStop::Cycle {
            return Classification::opaque(spelling, Some(OpaqueNote::AliasCycle));
        }
        let resolved = resolution.terminal.as_str();

        if let Some(target) = builtin_primitive(resolved) {
            return Classification::Primitive {
                target: target.to_owned(),
            };
        }

        if let Some(entry) = self.registry.get(resolved) {
            match &entry.kind {
                TypeKind::Enum { enumerators } => {
                    return Classification::EnumRef {
                        name: entry.name.clone(),
                        enumerators: enumerators.clone(),
                    };
                }
                TypeKind::Record { complete: true } => {
                    return Classification::RecordRef {
                        name: entry.name.clone(),
                        is_complete: true,
                    };
                }
                TypeKind::Record { complete: false } => {
                    return Classification::opaque(
                        &entry.name,
                        Some(OpaqueNote::IncompleteRecord),
                    );
                }
                TypeKind::Alias {
                    underlying: Some(underlying),
                }
                | TypeKind::Override {
                    underlying: Some(underlying),
                }
                | TypeKind::ScopeAlias {
                    qualified: underlying,
                } => return self.classify_at(underlying, depth + 1),
                TypeKind::Alias { underlying: None } | TypeKind::Override { underlying: None } => {}
            }
        }

        let shape = TypeShape::parse(resolved);
        if shape.is_decorated(resolved) {
            return self.classify_decorated(spelling, &shape, depth);
        }

        self.classify_by_pattern(spelling, resolved, depth)
    }

    /// Classify a spelling whose base differs from the spelling itself.
    fn classify_decorated(
        &self,
        spelling: &str,
        shape: &TypeShape,
        depth: usize,
    ) -> Classification {
        if shape.indirection == Indirection::Multiple {
            return Classification::opaque(spelling, Some(OpaqueNote::MultipleIndirection));
        }

        let base = self.classify_at(&shape.base, depth + 1);
        if shape.indirection != Indirection::Pointer {
            return base;
        }

        match base {
            Classification::RecordRef { .. } => base,
            Classification::Primitive { .. } | Classification::EnumRef { .. } => {
                Classification::opaque(spelling, Some(OpaqueNote::PointerToScalar))
            }
            Classification::Opaque { note, .. } => Classification::opaque(spelling, note),
            Classification::VectorOf { .. } | Classification::Override { .. } => {
                Classification::opaque(spelling, None)
            }
        }
    }

    /// Heuristics on the resolved spelling.
    fn classify_by_pattern(
        &self,
        spelling: &str,
        resolved: &str,
        depth: usize,
    ) -> Classification {
        if is_smart_pointer(resolved) {
            return Classification::opaque(spelling, Some(OpaqueNote::SmartPointer));
        }

        match sequence_argument(resolved, SEQUENCE_TEMPLATES) {
            Some(SequenceArgument::Single(inner)) => {
                return Classification::VectorOf {
                    inner: inner.to_owned(),
                    inner_classification: Box::new(self.classify_at(inner, depth + 1)),
                };
            }
            Some(SequenceArgument::Nested) => {
                return Classification::opaque(spelling, Some(OpaqueNote::NestedTemplate));
            }
            Some(SequenceArgument::Multiple) => {
                return Classification::opaque(
                    spelling,
                    Some(OpaqueNote::MultipleTemplateArguments),
                );
            }
            None => {}
        }

        if is_canonical_primitive(resolved) {
            return Classification::Primitive {
                target: resolved.to_owned(),
            };
        }

        Classification::opaque(spelling, None)
    }
}

fn stopped(terminal: &str, stop: ResolutionStop) -> Resolution {
    if stop != ResolutionStop::Terminal {
        trace!(terminal, ?stop, "alias resolution stopped early");
    }
    Resolution {
        terminal: terminal.to_owned(),
        stop,
    }
}

fn is_smart_pointer(spelling: &str) -> bool {
    let compact: String = spelling.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.strip_prefix("::").unwrap_or(&compact);
    SMART_POINTER_PATTERNS
        .iter()
        .any(|pattern| compact.starts_with(pattern))
}
