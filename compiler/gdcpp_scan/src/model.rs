//! Class models produced by the scanner.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use bitflags::bitflags;
use gdcpp_decl::TypeRef;
use gdcpp_types::Enumerator;
use tracing::{trace, warn};

/// Script-visible name of every synthesized constructor operation.
pub const CONSTRUCT_NAME: &str = "construct";

bitflags! {
    /// Qualifiers of a scanned method.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MethodFlags: u8 {
        const STATIC = 1 << 0;
        const CONST  = 1 << 1;
    }
}

/// A method or constructor parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    /// Declared name, or a unique `arg<index>` when the declaration has none.
    pub name: String,
    pub ty: TypeRef,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Param {
            name: name.into(),
            ty,
        }
    }
}

/// A public method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: String,
    pub ret: TypeRef,
    pub params: Vec<Param>,
    pub flags: MethodFlags,
}

impl MethodSignature {
    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    #[inline]
    pub fn is_const(&self) -> bool {
        self.flags.contains(MethodFlags::CONST)
    }
}

/// A public constructor, modeled as a [`CONSTRUCT_NAME`] operation
/// returning the enclosing class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstructorSignature {
    pub params: Vec<Param>,
    /// Always [`TypeRef::Synthesized`] naming the enclosing class.
    pub ret: TypeRef,
}

/// An enum declared inside a class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NestedEnum {
    /// Name as declared inside the class.
    pub name: String,
    pub enumerators: Vec<Enumerator>,
}

/// Public API of one class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassModel {
    pub qualified_name: String,
    /// Sanitized flat identifier; key of the [`ApiModel`].
    pub flat_name: String,
    pub methods: Vec<MethodSignature>,
    pub constructors: Vec<ConstructorSignature>,
    pub enums: Vec<NestedEnum>,
    /// This declaration had a body.
    pub is_definition: bool,
    /// Some header defined the class.
    pub is_complete: bool,
    pub is_abstract: bool,
    /// A class template, or a class nested in one.
    pub is_template: bool,
}

impl ClassModel {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        ClassModel {
            flat_name: crate::collapse_name(&qualified_name),
            qualified_name,
            methods: Vec::new(),
            constructors: Vec::new(),
            enums: Vec::new(),
            is_definition: false,
            is_complete: false,
            is_abstract: false,
            is_template: false,
        }
    }

    /// Whether generated code may name the native type and call into it.
    ///
    /// Templates cannot be named without arguments, abstract classes cannot
    /// be instantiated, and forward-declared classes have no members to call.
    pub fn is_forwardable(&self) -> bool {
        self.is_complete && !self.is_abstract && !self.is_template
    }

    /// Whether two or more methods share `name`.
    pub fn is_overloaded(&self, name: &str) -> bool {
        self.methods.iter().filter(|m| m.name == name).nth(1).is_some()
    }
}

/// Every scanned class, keyed by flat identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiModel {
    classes: BTreeMap<String, ClassModel>,
}

impl ApiModel {
    pub fn new() -> Self {
        ApiModel::default()
    }

    /// Add a class model.
    ///
    /// A redeclaration of a class already scanned with a body is ignored.
    /// Otherwise the later model replaces the earlier one, including when two
    /// different qualified names collapse to the same flat identifier.
    pub fn insert(&mut self, model: ClassModel) {
        match self.classes.entry(model.flat_name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(model);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get();
                if existing.qualified_name == model.qualified_name {
                    if existing.is_definition && !model.is_definition {
                        trace!(class = %model.qualified_name, "keeping earlier definition");
                        return;
                    }
                } else {
                    warn!(
                        flat = %model.flat_name,
                        previous = %existing.qualified_name,
                        replacement = %model.qualified_name,
                        "qualified names collapse to the same identifier, keeping the later one"
                    );
                }
                slot.insert(model);
            }
        }
    }

    pub fn get(&self, flat_name: &str) -> Option<&ClassModel> {
        self.classes.get(flat_name)
    }

    /// Class models in flat-identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassModel> {
        self.classes.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
