//! Lowering of class models to the wrapper form.
//!
//! Every parameter and return type is classified once and mapped to a
//! wrapper-side type plus the statements needed to cross the boundary.
//! Nothing here fails: types with no known conversion degrade to a
//! `Variant` placeholder and a marked, value-initialized native local.

use gdcpp_decl::TypeRef;
use gdcpp_scan::{
    safe_ident, ClassModel, ConstructorSignature, MethodSignature, Param, CONSTRUCT_NAME,
};
use gdcpp_types::{
    Classification, Classifier, Indirection, OpaqueNote, OverrideMapping, TypeShape,
};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::ir::{MethodKind, Stmt, WrapperClass, WrapperMethod, WrapperParam};
use crate::overload::suffixed;

/// Wrapper-side type for values with no known conversion.
const GENERIC: &str = "Variant";

/// Wrapper-side type for native object handles.
const HANDLE: &str = "void *";

/// Member names a native method must not take over: the members every
/// wrapper declares, and `Object` methods a wrapper would shadow.
const RESERVED_NAMES: &[&str] = &[
    "construct",
    "destroy",
    "native",
    "owned",
    "_bind_methods",
    "_notification",
    "_get",
    "_set",
    "_to_string",
    "call",
    "connect",
    "disconnect",
    "emit_signal",
    "free",
    "get",
    "get_class",
    "get_class_static",
    "get_meta",
    "has_method",
    "is_class",
    "notification",
    "set",
    "set_meta",
    "to_string",
];

const RESERVED_PREFIX: &str = "native_";

/// Wrapper class identifier for a flat class name.
pub fn wrapper_name(prefix: &str, flat_name: &str) -> String {
    format!("{prefix}_{flat_name}")
}

/// Member identifier for a native method name, before any overload suffix.
pub fn member_base_name(name: &str) -> String {
    let ident = safe_ident(name);
    if RESERVED_NAMES.contains(&ident.as_str()) {
        format!("{RESERVED_PREFIX}{ident}")
    } else {
        ident
    }
}

/// Conservative return value for a wrapper-side type; `None` for `void`.
pub fn default_value(ty: &str) -> Option<String> {
    let ty = ty.trim();
    let value = match ty.strip_prefix("const ").unwrap_or(ty).trim() {
        "void" => return None,
        "bool" => "false",
        "float" | "double" => "0.0",
        t if t.ends_with('*') => "nullptr",
        t if t == GENERIC => "Variant()",
        "int" | "long" | "short" | "char" | "size_t" | "ptrdiff_t" | "long long" => "0",
        t if t.starts_with("unsigned ") => "0",
        _ => "{}",
    };
    Some(value.to_owned())
}

/// Lower one class model.
pub fn lower_class(
    model: &ClassModel,
    classifier: &Classifier<'_>,
    prefix: &str,
    base: &str,
) -> WrapperClass {
    let lowering = ClassLowering {
        classifier,
        model,
        forwardable: model.is_forwardable(),
    };

    let mut seen = FxHashSet::default();
    let mut methods = Vec::with_capacity(model.constructors.len() + model.methods.len());
    let single_ctor = model.constructors.len() == 1;
    for ctor in &model.constructors {
        let method = lowering.lower_constructor(ctor, single_ctor);
        push_unique(&mut methods, &mut seen, method, &model.qualified_name);
    }
    for sig in &model.methods {
        let method = lowering.lower_method(sig);
        push_unique(&mut methods, &mut seen, method, &model.qualified_name);
    }

    WrapperClass {
        name: wrapper_name(prefix, &model.flat_name),
        native: model.qualified_name.clone(),
        base: base.to_owned(),
        forwardable: lowering.forwardable,
        methods,
        enums: model.enums.clone(),
        destroy: lowering.destroy_body(),
    }
}

/// Overloads differing only in `const` get the same identifier; the first wins.
fn push_unique(
    methods: &mut Vec<WrapperMethod>,
    seen: &mut FxHashSet<String>,
    method: WrapperMethod,
    class: &str,
) {
    if seen.insert(method.ident.clone()) {
        methods.push(method);
    } else {
        debug!(class, ident = %method.ident, "skipping method with duplicate identifier");
    }
}

struct ClassLowering<'c, 'a> {
    classifier: &'c Classifier<'a>,
    model: &'c ClassModel,
    forwardable: bool,
}

/// A parameter after lowering.
struct LoweredParam {
    param: WrapperParam,
    /// Statements run before the native call.
    prelude: Vec<Stmt>,
    /// Expression forwarded to the native call.
    arg: String,
    /// Set when no native value can stand in for the parameter, so the
    /// member cannot be called at all.
    blocked: Option<Stmt>,
}

/// How a native return value crosses the boundary.
enum ReturnPlan {
    Void,
    /// `auto _ret = call; return <convert(_ret)>;`
    Value { ty: String, convert: Convert },
    /// Handle to the object the native call points or refers to.
    Address { take_address: bool },
    /// Call for side effects, then return a default.
    Discard { ty: String, note: Stmt },
}

enum Convert {
    None,
    ToInt,
    FromNative(OverrideMapping),
}

impl ReturnPlan {
    fn wrapper_type(&self) -> &str {
        match self {
            ReturnPlan::Void => "void",
            ReturnPlan::Value { ty, .. } | ReturnPlan::Discard { ty, .. } => ty,
            ReturnPlan::Address { .. } => HANDLE,
        }
    }

    fn forward(&self, call: String) -> Vec<Stmt> {
        match self {
            ReturnPlan::Void => vec![Stmt::Expr(call)],
            ReturnPlan::Value { convert, .. } => {
                let value = match convert {
                    Convert::None => "_ret".to_owned(),
                    Convert::ToInt => "static_cast<int>(_ret)".to_owned(),
                    Convert::FromNative(mapping) => mapping.convert_from_native("_ret"),
                };
                vec![
                    Stmt::Let {
                        name: "_ret".into(),
                        init: call,
                    },
                    Stmt::Return(Some(value)),
                ]
            }
            ReturnPlan::Address { take_address } => {
                let pointer = if *take_address {
                    format!("&{call}")
                } else {
                    call
                };
                vec![Stmt::Return(Some(format!(
                    "const_cast<void *>(static_cast<const void *>({pointer}))"
                )))]
            }
            ReturnPlan::Discard { ty, note } => vec![
                Stmt::Expr(format!("(void){call}")),
                note.clone(),
                Stmt::Return(default_value(ty)),
            ],
        }
    }
}

impl ClassLowering<'_, '_> {
    fn lower_constructor(&self, ctor: &ConstructorSignature, single: bool) -> WrapperMethod {
        let ident = suffixed(CONSTRUCT_NAME, &ctor.params);
        let script_name = if single {
            CONSTRUCT_NAME.to_owned()
        } else {
            ident.clone()
        };
        let fail = Stmt::Return(None);
        let lowered: Vec<_> = ctor
            .params
            .iter()
            .map(|p| self.lower_param(p, CONSTRUCT_NAME, &fail))
            .collect();

        let body = if let Some(body) = self.blocked_body(&lowered, CONSTRUCT_NAME, &fail) {
            body
        } else if self.forwardable {
            let mut body = Vec::new();
            let mut args = Vec::with_capacity(lowered.len());
            for param in &lowered {
                body.extend(param.prelude.iter().cloned());
                args.push(param.arg.as_str());
            }
            body.push(Stmt::Expr("this->destroy()".into()));
            body.push(Stmt::Expr(format!(
                "this->native = new {}({})",
                ctor.ret.spelling(),
                args.join(", ")
            )));
            body.push(Stmt::Expr("this->owned = true".into()));
            body
        } else {
            self.unavailable(CONSTRUCT_NAME, &fail)
        };

        trace!(class = %self.model.qualified_name, %ident, "lowered constructor");
        WrapperMethod {
            ident,
            script_name,
            kind: MethodKind::Construct,
            ret: "void".into(),
            params: lowered.into_iter().map(|p| p.param).collect(),
            body,
        }
    }

    fn lower_method(&self, sig: &MethodSignature) -> WrapperMethod {
        let base = member_base_name(&sig.name);
        let ident = suffixed(&base, &sig.params);
        let script_name = if self.model.is_overloaded(&sig.name) {
            ident.clone()
        } else {
            base
        };
        let kind = if sig.is_static() {
            MethodKind::Static
        } else {
            MethodKind::Instance {
                is_const: sig.is_const(),
            }
        };

        let plan = self.lower_return(&sig.ret);
        let ret = plan.wrapper_type().to_owned();
        let fail = Stmt::Return(default_value(&ret));
        let lowered: Vec<_> = sig
            .params
            .iter()
            .map(|p| self.lower_param(p, &sig.name, &fail))
            .collect();

        let body = if let Some(body) = self.blocked_body(&lowered, &sig.name, &fail) {
            body
        } else if self.forwardable {
            let mut body = Vec::new();
            if kind != MethodKind::Static {
                body.push(Stmt::If {
                    cond: "!this->native".into(),
                    then: vec![
                        Stmt::ErrPrint(format!(
                            "Native pointer is null for {}",
                            self.model.qualified_name
                        )),
                        fail.clone(),
                    ],
                });
            }
            let mut args = Vec::with_capacity(lowered.len());
            for param in &lowered {
                body.extend(param.prelude.iter().cloned());
                args.push(param.arg.as_str());
            }
            let receiver = match kind {
                MethodKind::Static => format!("{}::", self.model.qualified_name),
                MethodKind::Instance { is_const } => format!(
                    "reinterpret_cast<{}{} *>(this->native)->",
                    if is_const { "const " } else { "" },
                    self.model.qualified_name
                ),
                MethodKind::Construct => String::new(),
            };
            let call = format!("{receiver}{}({})", sig.name, args.join(", "));
            body.extend(plan.forward(call));
            body
        } else {
            self.unavailable(&sig.name, &fail)
        };

        WrapperMethod {
            ident,
            script_name,
            kind,
            ret,
            params: lowered.into_iter().map(|p| p.param).collect(),
            body,
        }
    }

    /// Body for classes whose native type cannot be called.
    fn unavailable(&self, member: &str, fail: &Stmt) -> Vec<Stmt> {
        vec![
            Stmt::ErrPrint(format!(
                "Automatic forwarding not available for {}::{member}",
                self.model.qualified_name
            )),
            fail.clone(),
        ]
    }

    /// Unavailable body listing every parameter that blocks the call, or
    /// `None` when all of them can be converted.
    fn blocked_body(
        &self,
        lowered: &[LoweredParam],
        member: &str,
        fail: &Stmt,
    ) -> Option<Vec<Stmt>> {
        let mut body: Vec<Stmt> = lowered.iter().filter_map(|p| p.blocked.clone()).collect();
        if body.is_empty() {
            return None;
        }
        body.extend(self.unavailable(member, fail));
        Some(body)
    }

    fn destroy_body(&self) -> Vec<Stmt> {
        let mut body = Vec::new();
        if self.forwardable {
            body.push(Stmt::If {
                cond: "this->native && this->owned".into(),
                then: vec![Stmt::Expr(format!(
                    "delete reinterpret_cast<{} *>(this->native)",
                    self.model.qualified_name
                ))],
            });
        }
        body.push(Stmt::Expr("this->native = nullptr".into()));
        body.push(Stmt::Expr("this->owned = false".into()));
        body
    }

    fn lower_param(&self, param: &Param, member: &str, fail: &Stmt) -> LoweredParam {
        let name = safe_ident(&param.name);
        let spelling = param.ty.spelling();
        let shape = TypeShape::parse(spelling);
        let by_rvalue = shape.indirection == Indirection::RvalueRef;
        let by_mut_ref = shape.indirection == Indirection::LvalueRef && !shape.is_const;
        let moved = |expr: String| {
            if by_rvalue {
                format!("std::move({expr})")
            } else {
                expr
            }
        };

        let mut prelude = Vec::new();
        let mut blocked = None;
        let (ty, note, arg) = match self.classifier.classify(spelling) {
            Classification::Primitive { target } => (target, None, moved(name.clone())),
            Classification::EnumRef { name: native, .. } => {
                let cast = format!("static_cast<{native}>({name})");
                let arg = if by_mut_ref {
                    let local = format!("{name}_native");
                    prelude.push(Stmt::Let {
                        name: local.clone(),
                        init: cast,
                    });
                    local
                } else {
                    cast
                };
                ("int".to_owned(), None, arg)
            }
            Classification::RecordRef { name: native, .. } => {
                let cast = format!("reinterpret_cast<{native} *>({name})");
                let arg = if shape.is_pointer() {
                    cast
                } else {
                    prelude.push(Stmt::If {
                        cond: format!("!{name}"),
                        then: vec![
                            Stmt::ErrPrint(format!(
                                "Null {name} passed to {}::{member}",
                                self.model.qualified_name
                            )),
                            fail.clone(),
                        ],
                    });
                    moved(format!("*{cast}"))
                };
                (HANDLE.to_owned(), None, arg)
            }
            Classification::Override { mapping } => {
                let converted = mapping.convert_to_native(&name);
                let arg = if by_mut_ref {
                    let local = format!("{name}_native");
                    prelude.push(Stmt::Let {
                        name: local.clone(),
                        init: converted,
                    });
                    local
                } else {
                    moved(converted)
                };
                (mapping.target_or_generic().to_owned(), None, arg)
            }
            Classification::VectorOf { inner, .. } => {
                prelude.push(Stmt::Todo(format!(
                    "convert PackedArray/Variant to std::vector<{inner}> for {name}"
                )));
                let arg = placeholder(&mut prelude, &param.ty, &name);
                (GENERIC.to_owned(), Some("PackedArray expected".to_owned()), moved(arg))
            }
            Classification::Opaque { spelling, note } => {
                let todo = Stmt::Todo(format!(
                    "convert Variant to {} for {name}",
                    param.ty.spelling()
                ));
                let arg = if default_constructible(note, &shape) {
                    prelude.push(todo);
                    moved(placeholder(&mut prelude, &param.ty, &name))
                } else {
                    blocked = Some(todo);
                    String::new()
                };
                let note = match note {
                    Some(reason) => format!("unsupported type: {spelling} ({reason})"),
                    None => format!("unsupported type: {spelling}"),
                };
                (GENERIC.to_owned(), Some(note), arg)
            }
        };

        LoweredParam {
            param: WrapperParam { name, ty, note },
            prelude,
            arg,
            blocked,
        }
    }

    fn lower_return(&self, ret: &TypeRef) -> ReturnPlan {
        let spelling = ret.spelling();
        let shape = TypeShape::parse(spelling);
        if shape.base == "void" && shape.indirection == Indirection::None {
            return ReturnPlan::Void;
        }

        match self.classifier.classify(spelling) {
            Classification::Primitive { target } => ReturnPlan::Value {
                ty: target,
                convert: Convert::None,
            },
            Classification::EnumRef { .. } => ReturnPlan::Value {
                ty: "int".into(),
                convert: Convert::ToInt,
            },
            Classification::Override { mapping } => ReturnPlan::Value {
                ty: mapping.target_or_generic().to_owned(),
                convert: Convert::FromNative(mapping),
            },
            Classification::RecordRef { .. } => match shape.indirection {
                Indirection::Pointer => ReturnPlan::Address {
                    take_address: false,
                },
                Indirection::LvalueRef => ReturnPlan::Address { take_address: true },
                _ => ReturnPlan::Discard {
                    ty: HANDLE.into(),
                    note: Stmt::Comment(
                        "Returning a record by value is not supported; returning nullptr."
                            .into(),
                    ),
                },
            },
            Classification::VectorOf { inner, .. } => ReturnPlan::Discard {
                ty: GENERIC.into(),
                note: Stmt::Todo(format!("convert std::vector<{inner}> to a Godot type")),
            },
            Classification::Opaque { spelling, .. } => ReturnPlan::Discard {
                ty: GENERIC.into(),
                note: Stmt::Comment(format!("Unsupported return type: {spelling}")),
            },
        }
    }
}

/// Whether a value-initialized local of an opaque parameter's type can be
/// declared. Forward-declared records are incomplete, and a reference to an
/// unknown name most likely names a record from a header that was not scanned.
fn default_constructible(note: Option<OpaqueNote>, shape: &TypeShape) -> bool {
    if shape.is_pointer() {
        return true;
    }
    match note {
        Some(OpaqueNote::IncompleteRecord) => false,
        None => {
            let by_ref = matches!(
                shape.indirection,
                Indirection::LvalueRef | Indirection::RvalueRef
            );
            !(by_ref && !shape.base.contains('<'))
        }
        Some(_) => true,
    }
}

/// Declare a value-initialized native local standing in for a parameter
/// with no conversion, and return its name.
fn placeholder(prelude: &mut Vec<Stmt>, ty: &TypeRef, name: &str) -> String {
    let local = format!("converted_{name}");
    prelude.push(Stmt::Declare {
        ty: format!(
            "std::remove_cv_t<std::remove_reference_t<{}>>",
            ty.canonical_spelling()
        ),
        name: local.clone(),
    });
    local
}
