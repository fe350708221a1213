//! Structured wrapper form.
//!
//! Lowering produces these types from a class model; rendering turns them
//! into text. Every type spelling and expression is already final C++ text
//! at this level, only the layout is left to the renderer.

use gdcpp_scan::NestedEnum;

/// One generated wrapper class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrapperClass {
    /// Wrapper class identifier, `<prefix>_<flat>`.
    pub name: String,
    /// Qualified native class name.
    pub native: String,
    /// Host base class.
    pub base: String,
    /// Bodies call into the native class.
    pub forwardable: bool,
    /// Constructor operations first, then methods, in declaration order.
    pub methods: Vec<WrapperMethod>,
    pub enums: Vec<NestedEnum>,
    /// Body of `destroy()`.
    pub destroy: Vec<Stmt>,
}

impl WrapperClass {
    pub fn method(&self, ident: &str) -> Option<&WrapperMethod> {
        self.methods.iter().find(|m| m.ident == ident)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Instance { is_const: bool },
    Static,
    /// Synthesized from a native constructor.
    Construct,
}

/// A wrapper method and its body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrapperMethod {
    /// C++ member identifier.
    pub ident: String,
    /// Name bound for scripts.
    pub script_name: String,
    pub kind: MethodKind,
    /// Wrapper-side return type.
    pub ret: String,
    pub params: Vec<WrapperParam>,
    pub body: Vec<Stmt>,
}

impl WrapperMethod {
    pub fn is_static(&self) -> bool {
        self.kind == MethodKind::Static
    }

    pub fn is_const(&self) -> bool {
        matches!(self.kind, MethodKind::Instance { is_const: true })
    }
}

/// A wrapper-side parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrapperParam {
    pub name: String,
    /// Wrapper-side type.
    pub ty: String,
    /// Rendered as a trailing comment after the parameter.
    pub note: Option<String>,
}

/// Statements of a generated body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    /// `// text`
    Comment(String),
    /// `// TODO: text`
    Todo(String),
    /// `ty name{};`
    Declare { ty: String, name: String },
    /// `expr;`
    Expr(String),
    /// `auto name = init;`
    Let { name: String, init: String },
    /// `return;` or `return value;`
    Return(Option<String>),
    /// `ERR_PRINT("message");`
    ErrPrint(String),
    /// `if (cond) { ... }`
    If { cond: String, then: Vec<Stmt> },
}
