//! clang front end.
//!
//! Runs `clang -fsyntax-only -Xclang -ast-dump=json` on a header and lowers
//! the JSON AST into a [`DeclTree`](gdcpp_decl::DeclTree).
//!
//! ```text
//! header ──clang──▶ JSON AST ──lower_ast──▶ DeclTree
//! ```
//!
//! Only what discovery and scanning read is kept: scopes, aliases, records,
//! enums, methods and constructors. Expressions, fields, function bodies and
//! implicit declarations are walked for their source locations and dropped.

#![cfg_attr(test, recursion_limit = "256")]

mod invoke;
mod lower;
mod signature;

pub use invoke::{ClangFrontEnd, DEFAULT_CLANG};
pub use lower::{lower_ast, AstError};
pub use signature::FunctionType;
