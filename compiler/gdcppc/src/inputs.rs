//! Input path handling: header pattern expansion and include spellings.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::pipeline::GenerateError;

/// Expand header patterns into files.
///
/// Patterns are expanded in order; matches of one pattern come sorted, and
/// a file matched twice keeps its first position. Directories are ignored.
pub fn expand_headers(patterns: &[String]) -> Result<Vec<PathBuf>, GenerateError> {
    let mut seen = FxHashSet::default();
    let mut files = Vec::new();

    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|source| GenerateError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;

        let mut matched = 0usize;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    matched += 1;
                    if seen.insert(path.clone()) {
                        files.push(path);
                    }
                }
                Ok(_) => {}
                Err(error) => warn!(%pattern, %error, "unreadable path while expanding pattern"),
            }
        }

        if matched == 0 {
            warn!(%pattern, "header pattern matched no files");
        } else {
            debug!(%pattern, matched, "expanded header pattern");
        }
    }
    Ok(files)
}

/// Lexically normalize a path: drop `.` components and fold `dir/..`.
///
/// The file system is not consulted, so symlinks are not resolved. An
/// empty result is `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.into_iter().collect()
    }
}

/// `#include` spellings for the input headers, sorted and unique.
///
/// A header inside `base` is spelled relative to it, otherwise its path is
/// used as given. Separators are always `/`.
pub fn original_includes(headers: &[PathBuf], base: Option<&Path>) -> Vec<String> {
    let base = base.map(normalize);
    let includes: BTreeSet<String> = headers
        .iter()
        .map(|header| {
            let relative = base
                .as_deref()
                .and_then(|base| relative_to(&normalize(header), base));
            let path = relative.as_deref().unwrap_or(header);
            path.to_string_lossy().replace(MAIN_SEPARATOR, "/")
        })
        .collect();
    includes.into_iter().collect()
}

fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let relative = if base == Path::new(".") {
        path.is_relative().then(|| path.to_path_buf())?
    } else {
        path.strip_prefix(base).ok()?.to_path_buf()
    };
    let escapes = matches!(relative.components().next(), Some(Component::ParentDir) | None);
    (!escapes).then_some(relative)
}
