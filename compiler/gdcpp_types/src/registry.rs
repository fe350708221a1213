//! Registry of every named C++ type seen across the input headers.
//!
//! Entries are keyed by name in a `BTreeMap` so iteration (and therefore
//! everything derived from it) is deterministic.
//!
//! # Merge rules
//!
//! The same name is routinely declared many times: forward declarations,
//! `typedef struct Foo Foo;`, a header included by several inputs. Each
//! registration is merged into the existing entry:
//!
//! - an alias never replaces a record or enum, and never replaces an
//!   underlying that is already known (first seen wins);
//! - a scope alias (the bare name of a scoped type) is replaced by any real
//!   declaration of that name and never replaces anything itself;
//! - a record replaces an alias; record completeness is sticky;
//! - an enum replaces an alias, and replaces an earlier enum only when that
//!   one had no enumerators (an opaque `enum class E : int;`).

use std::collections::BTreeMap;

use tracing::trace;

/// One enumerator of a discovered enum.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Enumerator {
    pub name: String,
    pub value: i64,
}

impl Enumerator {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Enumerator {
            name: name.into(),
            value,
        }
    }
}

/// The kind of a registered type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `typedef` / `using`, or a built-in primitive alias.
    Alias {
        /// Spelling of the aliased type, when known.
        underlying: Option<String>,
    },

    /// `struct` / `class` (including class templates).
    Record {
        /// A full definition was seen somewhere.
        complete: bool,
    },

    /// `enum` / `enum class`.
    Enum { enumerators: Vec<Enumerator> },

    /// Bare name of a type declared in a namespace or class, pointing at
    /// its qualified name. Weaker than every declared kind.
    ScopeAlias { qualified: String },

    /// Injected from the user's override mapping.
    Override { underlying: Option<String> },
}

/// A registered type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeEntry {
    /// Fully qualified name.
    pub name: String,
    pub kind: TypeKind,
}

impl TypeEntry {
    /// The aliased spelling for aliases and overrides.
    pub fn underlying(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Alias { underlying } | TypeKind::Override { underlying } => {
                underlying.as_deref()
            }
            TypeKind::ScopeAlias { qualified } => Some(qualified),
            TypeKind::Record { .. } | TypeKind::Enum { .. } => None,
        }
    }

    #[inline]
    pub fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record { .. })
    }

    #[inline]
    pub fn is_complete_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record { complete: true })
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum { .. })
    }

    #[inline]
    fn is_alias_like(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Alias { .. } | TypeKind::ScopeAlias { .. } | TypeKind::Override { .. }
        )
    }
}

/// Registry of discovered types.
///
/// Populated once by discovery, read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    types_by_name: BTreeMap<String, TypeEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry::default()
    }

    /// Register a `typedef` / `using` alias.
    pub fn register_alias(&mut self, name: &str, underlying: Option<String>) {
        let Some(existing) = self.types_by_name.get_mut(name) else {
            self.insert(name, TypeKind::Alias { underlying });
            return;
        };

        match &mut existing.kind {
            TypeKind::Alias { underlying: slot } | TypeKind::Override { underlying: slot } => {
                if slot.is_none() {
                    *slot = underlying;
                }
            }
            TypeKind::ScopeAlias { .. } => {
                existing.kind = TypeKind::Alias { underlying };
            }
            TypeKind::Record { .. } | TypeKind::Enum { .. } => {
                trace!(name, "alias shadowed by existing record or enum");
            }
        }
    }

    /// Register a record declaration; `complete` is true for definitions.
    pub fn register_record(&mut self, name: &str, complete: bool) {
        let Some(existing) = self.types_by_name.get_mut(name) else {
            self.insert(name, TypeKind::Record { complete });
            return;
        };

        match &mut existing.kind {
            TypeKind::Record { complete: seen } => *seen |= complete,
            TypeKind::Alias { .. } | TypeKind::ScopeAlias { .. } | TypeKind::Override { .. } => {
                existing.kind = TypeKind::Record { complete };
            }
            TypeKind::Enum { .. } => {
                trace!(name, "record ignored, name already registered as enum");
            }
        }
    }

    /// Register an enum with its enumerators in declaration order.
    pub fn register_enum(&mut self, name: &str, enumerators: Vec<Enumerator>) {
        let Some(existing) = self.types_by_name.get_mut(name) else {
            self.insert(name, TypeKind::Enum { enumerators });
            return;
        };

        match &mut existing.kind {
            TypeKind::Enum {
                enumerators: current,
            } => {
                if current.is_empty() && !enumerators.is_empty() {
                    *current = enumerators;
                }
            }
            TypeKind::Alias { .. } | TypeKind::ScopeAlias { .. } | TypeKind::Override { .. } => {
                existing.kind = TypeKind::Enum { enumerators };
            }
            TypeKind::Record { .. } => {
                trace!(name, "enum ignored, name already registered as record");
            }
        }
    }

    /// Register the bare name of a scoped type, unless the name is already
    /// known. Any later real declaration of `name` replaces it.
    pub fn register_scope_alias(&mut self, name: &str, qualified: &str) {
        if self.types_by_name.contains_key(name) {
            trace!(name, qualified, "scope alias shadowed by existing entry");
            return;
        }
        self.insert(
            name,
            TypeKind::ScopeAlias {
                qualified: qualified.to_owned(),
            },
        );
    }

    /// Insert a built-in alias unless `name` is already known.
    ///
    /// Returns whether the entry was inserted.
    pub fn inject_alias(&mut self, name: &str, underlying: &str) -> bool {
        if self.types_by_name.contains_key(name) {
            return false;
        }
        self.insert(
            name,
            TypeKind::Alias {
                underlying: Some(underlying.to_owned()),
            },
        );
        true
    }

    /// Insert an override entry unless `name` is already known.
    ///
    /// Returns whether the entry was inserted.
    pub fn inject_override(&mut self, name: &str, underlying: Option<&str>) -> bool {
        if self.types_by_name.contains_key(name) {
            return false;
        }
        self.insert(
            name,
            TypeKind::Override {
                underlying: underlying.map(str::to_owned),
            },
        );
        true
    }

    /// Merge a registry built from a later header into this one.
    ///
    /// Applies the same rules as registering each entry in turn.
    pub fn merge(&mut self, other: TypeRegistry) {
        for (name, entry) in other.types_by_name {
            match entry.kind {
                TypeKind::Alias { underlying } => self.register_alias(&name, underlying),
                TypeKind::Record { complete } => self.register_record(&name, complete),
                TypeKind::Enum { enumerators } => self.register_enum(&name, enumerators),
                TypeKind::ScopeAlias { qualified } => self.register_scope_alias(&name, &qualified),
                TypeKind::Override { underlying } => {
                    self.inject_override(&name, underlying.as_deref());
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.types_by_name.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.types_by_name.contains_key(name)
    }

    /// Whether `name` is a record with a full definition.
    pub fn is_complete_record(&self, name: &str) -> bool {
        self.get(name).is_some_and(TypeEntry::is_complete_record)
    }

    /// Follow alias links from `name` one step.
    pub(crate) fn alias_target(&self, name: &str) -> Option<&str> {
        self.get(name)
            .filter(|entry| entry.is_alias_like())
            .and_then(TypeEntry::underlying)
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry> {
        self.types_by_name.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types_by_name.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types_by_name.is_empty()
    }

    fn insert(&mut self, name: &str, kind: TypeKind) {
        self.types_by_name.insert(
            name.to_owned(),
            TypeEntry {
                name: name.to_owned(),
                kind,
            },
        );
    }
}
