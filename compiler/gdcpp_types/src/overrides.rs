//! User-supplied type override mappings.
//!
//! The mapping file is a JSON object keyed by type spelling. Each value is
//! either a bare string naming the wrapper-side C++ type, or an object:
//!
//! ```json
//! {
//!   "gp_Pnt": { "cpp": "Vector3",
//!               "to_native": "gp_Pnt({}.x, {}.y, {}.z)",
//!               "from_native": "Vector3({}.X(), {}.Y(), {}.Z())" },
//!   "TCollection_AsciiString": "String"
//! }
//! ```
//!
//! `{}` in a conversion expression is replaced by the value being converted.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Placeholder substituted in conversion expressions.
const VALUE_PLACEHOLDER: &str = "{}";

/// Wrapper-side type used when a mapping names no target.
const GENERIC_TARGET: &str = "Variant";

/// Error loading a mapping file.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("failed to read mapping file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid mapping JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("mapping file must contain a JSON object (type -> mapping)")]
    NotAnObject,
}

/// One override entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct OverrideMapping {
    /// Wrapper-side C++ type.
    #[serde(rename = "cpp", default)]
    pub target: Option<String>,

    /// Expression converting a wrapper value into the native type.
    #[serde(default)]
    pub to_native: Option<String>,

    /// Expression converting a native value into the wrapper type.
    #[serde(default)]
    pub from_native: Option<String>,
}

impl OverrideMapping {
    pub fn with_target(target: impl Into<String>) -> Self {
        OverrideMapping {
            target: Some(target.into()),
            ..OverrideMapping::default()
        }
    }

    /// The wrapper-side type, `Variant` when unspecified.
    pub fn target_or_generic(&self) -> &str {
        self.target.as_deref().unwrap_or(GENERIC_TARGET)
    }

    /// Apply `to_native` to `expr`, or pass it through.
    pub fn convert_to_native(&self, expr: &str) -> String {
        substitute(self.to_native.as_deref(), expr)
    }

    /// Apply `from_native` to `expr`, or pass it through.
    pub fn convert_from_native(&self, expr: &str) -> String {
        substitute(self.from_native.as_deref(), expr)
    }
}

fn substitute(template: Option<&str>, expr: &str) -> String {
    match template {
        Some(template) if template.contains(VALUE_PLACEHOLDER) => {
            template.replace(VALUE_PLACEHOLDER, expr)
        }
        Some(template) => format!("{template}({expr})"),
        None => expr.to_owned(),
    }
}

/// Override table keyed by exact type spelling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: BTreeMap<String, OverrideMapping>,
}

impl OverrideTable {
    pub fn new() -> Self {
        OverrideTable::default()
    }

    pub fn insert(&mut self, spelling: impl Into<String>, mapping: OverrideMapping) {
        self.entries.insert(spelling.into(), mapping);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, spelling: impl Into<String>, mapping: OverrideMapping) -> Self {
        self.insert(spelling, mapping);
        self
    }

    pub fn get(&self, spelling: &str) -> Option<&OverrideMapping> {
        self.entries.get(spelling)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideMapping)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a mapping document.
    ///
    /// Entries that are neither a string nor an object are kept with no
    /// target, so the spelling still classifies as an override.
    pub fn from_json_str(text: &str) -> Result<Self, MappingError> {
        let Value::Object(map) = serde_json::from_str::<Value>(text)? else {
            return Err(MappingError::NotAnObject);
        };

        let mut table = OverrideTable::new();
        for (spelling, value) in map {
            let mapping = match value {
                Value::String(target) => OverrideMapping::with_target(target),
                value @ Value::Object(_) => serde_json::from_value(value)?,
                other => {
                    debug!(%spelling, value = %other, "override entry without a target");
                    OverrideMapping::default()
                }
            };
            table.insert(spelling, mapping);
        }
        Ok(table)
    }

    /// Read and parse a mapping file.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let text = fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        OverrideTable::from_json_str(&text)
    }

    /// Like [`load`](Self::load), but a failure yields an empty table.
    pub fn load_or_empty(path: &Path) -> Self {
        match OverrideTable::load(path) {
            Ok(table) => {
                debug!(path = %path.display(), entries = table.len(), "loaded mapping file");
                table
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to load mapping file, using no overrides");
                OverrideTable::new()
            }
        }
    }
}
