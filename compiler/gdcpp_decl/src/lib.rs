//! Declaration trees for the gdcpp binding generator.
//!
//! A C++ front end (clang, or an in-memory stand-in for tests) turns each
//! header into a [`DeclTree`]: an arena of declaration nodes linked to their
//! lexical children and semantic parents. Everything downstream (discovery,
//! API scanning, emission) reads these trees and never talks to the front
//! end directly.
//!
//! # Architecture
//!
//! ```text
//! header paths
//!     │
//!     ▼
//! FrontEnd::parse ──► DeclTree   (one per header; failures are skipped)
//!     │
//!     ▼
//! ParsedHeader[] ──► discovery / scanning
//! ```

mod flags;
mod frontend;
mod tree;
mod ty;

pub use flags::DeclFlags;
pub use frontend::{
    parse_headers, parse_headers_parallel, FrontEnd, FrontEndError, InMemoryFrontEnd,
    ParsedHeader, ParseReport,
};
pub use tree::{Access, DeclId, DeclKind, DeclNode, DeclTree, ParamDecl};
pub use ty::{FrontEndType, TypeRef};
