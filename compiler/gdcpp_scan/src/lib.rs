//! Public API scanning for the gdcpp binding generator.
//!
//! The scanner makes a second pass over the parsed headers and builds one
//! [`ClassModel`] per named class, struct or class template declared in
//! the header itself: its public methods, public constructors and nested
//! enums. The finished [`ApiModel`] is keyed by the flat identifier used
//! for generated file and class names.
//!
//! The only thing the scanner asks the type registry is whether a record
//! was ever seen with a full definition.

mod model;
mod naming;
mod scanner;

pub use model::{
    ApiModel, ClassModel, ConstructorSignature, MethodFlags, MethodSignature, NestedEnum, Param,
    CONSTRUCT_NAME,
};
pub use naming::{collapse_name, is_operator_name, safe_ident};
pub use scanner::{scan, ApiScanner};
