//! Godot GDExtension wrapper emission.
//!
//! Emission is a pure function from the scanned API and a classifier to a
//! fixed artifact set:
//!
//! ```text
//! ClassModel ──lower──▶ WrapperClass ──render──▶ <prefix>_<flat>.hpp / .cpp
//! ApiModel   ─────────────────────────────────▶ <prefix>_utils.h
//!                                               <prefix>_register.h / .cpp
//! ```
//!
//! Lowering never fails. Types with no known conversion become `Variant`
//! placeholders, and classes that cannot be called into get bodies that
//! report a runtime error and return a default, so the output always
//! compiles.

mod ir;
mod lower;
mod overload;
mod render;
mod units;
mod writer;

use gdcpp_scan::ApiModel;
use gdcpp_types::Classifier;
use tracing::{info, instrument};

pub use ir::{MethodKind, Stmt, WrapperClass, WrapperMethod, WrapperParam};
pub use lower::{default_value, lower_class, member_base_name, wrapper_name};
pub use overload::{overload_key, signature_hash, suffixed, SIG_HASH_LENGTH};
pub use render::{header_file_name, render_header, render_source, source_file_name};
pub use units::{
    entry_symbol, register_header_name, register_source_name, render_register_header,
    render_register_source, render_utils, utils_file_name,
};
pub use writer::CodeWriter;

/// Emission settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    /// Prefix of every generated file and wrapper class.
    pub prefix: String,
    /// Host class every wrapper derives from.
    pub godot_base: String,
    /// Extra `#include` lines for each wrapper implementation unit.
    pub impl_includes: Vec<String>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            prefix: "ocgd".into(),
            godot_base: "Object".into(),
            impl_includes: Vec::new(),
        }
    }
}

/// One generated file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// File name relative to the output directory.
    pub file_name: String,
    pub contents: String,
}

impl Artifact {
    fn new(file_name: String, contents: String) -> Self {
        Artifact {
            file_name,
            contents,
        }
    }
}

/// Generate every artifact for `api`.
///
/// Order: utility header, registration header and implementation, then a
/// header and implementation per class in flat-name order.
#[instrument(level = "debug", skip_all, fields(classes = api.len(), prefix = %options.prefix))]
pub fn emit(api: &ApiModel, classifier: &Classifier<'_>, options: &EmitOptions) -> Vec<Artifact> {
    let prefix = options.prefix.as_str();
    let utils = utils_file_name(prefix);

    let wrappers: Vec<WrapperClass> = api
        .iter()
        .map(|model| lower_class(model, classifier, prefix, &options.godot_base))
        .collect();
    let names: Vec<String> = wrappers.iter().map(|w| w.name.clone()).collect();

    let mut artifacts = Vec::with_capacity(3 + 2 * wrappers.len());
    artifacts.push(Artifact::new(utils.clone(), render_utils(prefix)));
    artifacts.push(Artifact::new(
        register_header_name(prefix),
        render_register_header(prefix),
    ));
    artifacts.push(Artifact::new(
        register_source_name(prefix),
        render_register_source(prefix, &names),
    ));

    for wrapper in &wrappers {
        artifacts.push(Artifact::new(
            header_file_name(&wrapper.name),
            render_header(wrapper, &utils),
        ));
        artifacts.push(Artifact::new(
            source_file_name(&wrapper.name),
            render_source(wrapper, &options.impl_includes),
        ));
        info!(
            class = %wrapper.native,
            wrapper = %wrapper.name,
            methods = wrapper.methods.len(),
            forwardable = wrapper.forwardable,
            "emitted wrapper"
        );
    }
    artifacts
}

#[cfg(test)]
mod tests;
