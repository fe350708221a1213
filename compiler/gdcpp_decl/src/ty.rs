//! Type references carried by declarations.
//!
//! Most type spellings come straight from the front end. A few are made up
//! by later passes, e.g. the "return type" of a constructor, which is the
//! enclosing class. Both shapes are consumed identically through
//! [`TypeRef::spelling`].

use std::fmt;

/// A type as reported by the front end.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrontEndType {
    /// Spelling as written in the source (sugared, possibly unqualified).
    pub spelling: String,
    /// Fully desugared spelling, when the front end provides one and it
    /// differs from `spelling`.
    pub canonical: Option<String>,
}

/// A type spelling, either reported by the front end or synthesized.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Reported by the front end for a real declaration.
    FromFrontEnd(FrontEndType),
    /// Made up by a pass that needs a type where the source has none.
    Synthesized(String),
}

impl TypeRef {
    /// A front-end type with no canonical spelling.
    pub fn front_end(spelling: impl Into<String>) -> Self {
        TypeRef::FromFrontEnd(FrontEndType {
            spelling: spelling.into(),
            canonical: None,
        })
    }

    /// A front-end type with a separate canonical spelling.
    ///
    /// The canonical spelling is dropped when it is identical to the
    /// written one.
    pub fn front_end_with_canonical(
        spelling: impl Into<String>,
        canonical: impl Into<String>,
    ) -> Self {
        let spelling = spelling.into();
        let canonical = canonical.into();
        let canonical = (canonical != spelling && !canonical.is_empty()).then_some(canonical);
        TypeRef::FromFrontEnd(FrontEndType {
            spelling,
            canonical,
        })
    }

    /// A type synthesized by a later pass.
    pub fn synthesized(spelling: impl Into<String>) -> Self {
        TypeRef::Synthesized(spelling.into())
    }

    /// The spelling used for classification and overload keys.
    pub fn spelling(&self) -> &str {
        match self {
            TypeRef::FromFrontEnd(ty) => &ty.spelling,
            TypeRef::Synthesized(spelling) => spelling,
        }
    }

    /// The most fully qualified spelling available.
    ///
    /// Generated code that must name the type outside its declaring scope
    /// uses this rather than [`spelling`](Self::spelling).
    pub fn canonical_spelling(&self) -> &str {
        match self {
            TypeRef::FromFrontEnd(FrontEndType {
                canonical: Some(canonical),
                ..
            }) => canonical,
            _ => self.spelling(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}
