//! Type knowledge for the gdcpp binding generator.
//!
//! Two passes live here:
//!
//! 1. **Discovery** walks every parsed header once and fills a
//!    [`TypeRegistry`] with aliases, records and enums, then injects the
//!    built-in primitive aliases and the user's overrides.
//! 2. **Classification** maps an arbitrary type spelling to exactly one
//!    [`Classification`], which tells the emitter how a value of that type
//!    crosses the wrapper boundary.
//!
//! # Architecture
//!
//! ```text
//! ParsedHeader[] ──► discover() ──► TypeRegistry (read-only from here on)
//!                                        │
//!        OverrideTable ──────────────────┤
//!                                        ▼
//!                 type spelling ──► Classifier::classify ──► Classification
//! ```
//!
//! Discovery must finish over every header before anything is classified:
//! a type used in one header is often declared in another.

mod builtins;
mod classify;
mod discovery;
mod overrides;
mod registry;
mod spelling;

pub use builtins::{builtin_primitive, is_canonical_primitive, BUILTIN_PRIMITIVES};
pub use classify::{
    Classification, Classifier, OpaqueNote, Resolution, ResolutionStop, MAX_ALIAS_DEPTH,
};
pub use discovery::{
    discover, discover_parallel, discover_tree, enumerators_of, inject_builtins, inject_overrides,
};
pub use overrides::{MappingError, OverrideMapping, OverrideTable};
pub use registry::{Enumerator, TypeEntry, TypeKind, TypeRegistry};
pub use spelling::{sequence_argument, Indirection, SequenceArgument, TypeShape};
