//! Arena-backed declaration tree.
//!
//! Nodes are stored in a flat `Vec` and addressed by [`DeclId`]. Index 0 is
//! always the translation unit. Each node knows its lexical children and its
//! semantic parent; the semantic parent defaults to the lexical one and only
//! differs for out-of-line definitions such as `struct ns::Foo { ... };`.

use crate::{DeclFlags, TypeRef};

/// Index of a node in a [`DeclTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(u32);

impl DeclId {
    /// The translation unit.
    pub const ROOT: DeclId = DeclId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a declaration node declares.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    TranslationUnit,
    Namespace,
    /// `typedef T Name;`
    Typedef,
    /// `using Name = T;`
    TypeAlias,
    Struct,
    Class,
    ClassTemplate,
    Enum,
    EnumConstant,
    Method,
    Constructor,
    /// Anything else the front end chose to report. Discovery descends into
    /// it; nothing is collected from the node itself.
    Other,
}

impl DeclKind {
    /// Struct, class, or class template.
    #[inline]
    pub fn is_record(self) -> bool {
        matches!(self, DeclKind::Struct | DeclKind::Class | DeclKind::ClassTemplate)
    }

    /// `typedef` or `using` alias.
    #[inline]
    pub fn is_alias(self) -> bool {
        matches!(self, DeclKind::Typedef | DeclKind::TypeAlias)
    }
}

/// C++ access specifier of a member.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    Protected,
    Private,
    /// Not a class member (namespace-scope declarations).
    #[default]
    Unspecified,
}

/// A function parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamDecl {
    /// Declared name; empty for unnamed parameters.
    pub name: String,
    pub ty: TypeRef,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        ParamDecl {
            name: name.into(),
            ty,
        }
    }
}

/// One declaration reported by the front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclNode {
    pub kind: DeclKind,
    /// Unqualified name; empty for anonymous declarations.
    pub spelling: String,
    /// Underlying type for aliases, result type for methods.
    pub ty: Option<TypeRef>,
    /// Parameters for methods and constructors.
    pub params: Vec<ParamDecl>,
    pub access: Access,
    pub flags: DeclFlags,
    /// Evaluated value of an enum constant, `None` when the front end could
    /// not evaluate it.
    pub enum_value: Option<i64>,
    semantic_parent: Option<DeclId>,
    children: Vec<DeclId>,
}

impl DeclNode {
    pub fn new(kind: DeclKind, spelling: impl Into<String>) -> Self {
        DeclNode {
            kind,
            spelling: spelling.into(),
            ty: None,
            params: Vec::new(),
            access: Access::Unspecified,
            flags: DeclFlags::empty(),
            enum_value: None,
            semantic_parent: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, ty: TypeRef) -> Self {
        self.ty = Some(ty);
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<ParamDecl>) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: DeclFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_enum_value(mut self, value: i64) -> Self {
        self.enum_value = Some(value);
        self
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.spelling.is_empty()
    }

    #[inline]
    pub fn is_definition(&self) -> bool {
        self.flags.contains(DeclFlags::DEFINITION)
    }
}

/// Declaration tree of one parsed header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclTree {
    nodes: Vec<DeclNode>,
}

impl Default for DeclTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclTree {
    /// A tree holding only the translation unit.
    pub fn new() -> Self {
        DeclTree {
            nodes: vec![DeclNode::new(DeclKind::TranslationUnit, "")],
        }
    }

    #[inline]
    pub fn root(&self) -> DeclId {
        DeclId::ROOT
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// The semantic parent is set to `parent`; use
    /// [`set_semantic_parent`](Self::set_semantic_parent) for out-of-line
    /// definitions.
    pub fn push(&mut self, parent: DeclId, mut node: DeclNode) -> DeclId {
        let id = DeclId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        node.semantic_parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        if let Some(parent_node) = self.nodes.get_mut(parent.index()) {
            parent_node.children.push(id);
        }
        id
    }

    /// Re-link `id` to a different semantic parent without moving it
    /// lexically.
    pub fn set_semantic_parent(&mut self, id: DeclId, parent: DeclId) {
        if id == parent || parent.index() >= self.nodes.len() {
            return;
        }
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.semantic_parent = Some(parent);
        }
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn get(&self, id: DeclId) -> &DeclNode {
        &self.nodes[id.index()]
    }

    /// Mutable access for front ends that patch nodes after pushing them.
    #[inline]
    pub fn get_mut(&mut self, id: DeclId) -> &mut DeclNode {
        &mut self.nodes[id.index()]
    }

    /// Lexical children of `id`, in source order.
    pub fn children(&self, id: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        self.get(id).children.iter().copied()
    }

    #[inline]
    pub fn semantic_parent(&self, id: DeclId) -> Option<DeclId> {
        self.get(id).semantic_parent
    }

    /// Qualified name of `id`: the spellings of every named semantic
    /// ancestor joined with `::`, ending with the node's own spelling.
    ///
    /// Anonymous scopes (unnamed namespaces, `extern "C"` blocks) contribute
    /// nothing. The walk is bounded by the tree size, so a malformed
    /// semantic-parent cycle cannot loop forever.
    pub fn qualified_name(&self, id: DeclId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut current = Some(id);
        let mut steps = 0;
        while let Some(cur) = current {
            if steps > self.nodes.len() {
                break;
            }
            steps += 1;
            let node = self.get(cur);
            if node.kind == DeclKind::TranslationUnit {
                break;
            }
            if !node.spelling.is_empty() {
                parts.push(&node.spelling);
            }
            current = node.semantic_parent;
        }
        parts.reverse();
        parts.join("::")
    }

    /// Number of nodes, including the translation unit.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the translation unit is present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}
