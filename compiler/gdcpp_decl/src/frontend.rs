//! The front-end contract and the header parsing loop.
//!
//! A header that fails to parse is logged and skipped; the run continues
//! with whatever parsed successfully.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::DeclTree;

/// Error from a front end for a single header.
#[derive(Debug, thiserror::Error)]
pub enum FrontEndError {
    /// The header (or the front-end output) could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The external front-end tool failed.
    #[error("front end failed on {}: {message}", .path.display())]
    Tool { path: PathBuf, message: String },
    /// The front end produced output that could not be understood.
    #[error("malformed front-end output for {}: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },
    /// The in-memory front end has no tree for this path.
    #[error("no declaration tree registered for {}", .0.display())]
    NotFound(PathBuf),
}

/// Anything that can turn a header path into a declaration tree.
pub trait FrontEnd {
    fn parse(&self, path: &Path) -> Result<DeclTree, FrontEndError>;
}

impl<F: FrontEnd + ?Sized> FrontEnd for &F {
    fn parse(&self, path: &Path) -> Result<DeclTree, FrontEndError> {
        (**self).parse(path)
    }
}

/// Front end backed by pre-built trees, keyed by path.
///
/// Paths without a tree fail with [`FrontEndError::NotFound`], which makes
/// it easy to exercise the skip-on-failure policy.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFrontEnd {
    trees: FxHashMap<PathBuf, DeclTree>,
}

impl InMemoryFrontEnd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the tree returned for `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, tree: DeclTree) {
        self.trees.insert(path.into(), tree);
    }

    #[must_use]
    pub fn with(mut self, path: impl Into<PathBuf>, tree: DeclTree) -> Self {
        self.insert(path, tree);
        self
    }
}

impl FrontEnd for InMemoryFrontEnd {
    fn parse(&self, path: &Path) -> Result<DeclTree, FrontEndError> {
        self.trees
            .get(path)
            .cloned()
            .ok_or_else(|| FrontEndError::NotFound(path.to_path_buf()))
    }
}

/// A successfully parsed header.
#[derive(Clone, Debug)]
pub struct ParsedHeader {
    pub path: PathBuf,
    pub tree: DeclTree,
}

/// Outcome of parsing a header set.
#[derive(Debug, Default)]
pub struct ParseReport {
    /// Parsed headers, in input order.
    pub headers: Vec<ParsedHeader>,
    /// Headers that failed, in input order.
    pub skipped: Vec<(PathBuf, FrontEndError)>,
}

impl ParseReport {
    fn push(&mut self, path: &Path, result: Result<DeclTree, FrontEndError>) {
        match result {
            Ok(tree) => self.headers.push(ParsedHeader {
                path: path.to_path_buf(),
                tree,
            }),
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to parse header, skipping");
                self.skipped.push((path.to_path_buf(), error));
            }
        }
    }
}

/// Parse every header in order, skipping the ones that fail.
pub fn parse_headers<F: FrontEnd + ?Sized>(front_end: &F, paths: &[PathBuf]) -> ParseReport {
    let mut report = ParseReport::default();
    for path in paths {
        info!(path = %path.display(), "parsing header");
        report.push(path, front_end.parse(path));
    }
    report
}

/// Parse headers concurrently. The report keeps input order.
pub fn parse_headers_parallel<F: FrontEnd + Sync + ?Sized>(
    front_end: &F,
    paths: &[PathBuf],
) -> ParseReport {
    let results: Vec<Result<DeclTree, FrontEndError>> = paths
        .par_iter()
        .map(|path| {
            info!(path = %path.display(), "parsing header");
            front_end.parse(path)
        })
        .collect();

    let mut report = ParseReport::default();
    for (path, result) in paths.iter().zip(results) {
        report.push(path, result);
    }
    report
}
