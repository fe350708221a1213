//! The generator pipeline.
//!
//! ```text
//! patterns ─expand─▶ headers ─parse─▶ DeclTrees ─discover─▶ TypeRegistry
//!                                         │                      │
//!                                         └──────scan────────────┤
//!                                                                ▼
//!                                   out_dir ◀─write─ artifacts ◀─emit
//! ```
//!
//! With `jobs > 1` parsing and discovery run on a dedicated rayon pool;
//! scanning and emission are always sequential and see headers in input
//! order, so the output does not depend on the job count.

use std::fs;
use std::path::{Path, PathBuf};

use gdcpp_clang::ClangFrontEnd;
use gdcpp_decl::{parse_headers, parse_headers_parallel, FrontEnd, ParseReport};
use gdcpp_emit::{emit, Artifact};
use gdcpp_scan::scan;
use gdcpp_types::{discover, discover_parallel, Classifier, OverrideTable, TypeRegistry};
use tracing::{debug, info, instrument, warn};

use crate::config::{ConfigError, GeneratorConfig};
use crate::inputs::{expand_headers, original_includes};

/// A failed run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid header pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl GenerateError {
    /// Process exit code: 2 for bad input, 1 for failures while writing.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::Config(_) | GenerateError::Pattern { .. } => 2,
            GenerateError::Write { .. } => 1,
        }
    }
}

/// What a run did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Header files matched by the patterns.
    pub headers: usize,
    /// Headers the front end could not parse.
    pub skipped: usize,
    /// Registry entries after builtins and overrides.
    pub types: usize,
    /// Wrapped classes.
    pub classes: usize,
    /// Written files, in emission order.
    pub written: Vec<PathBuf>,
}

/// Run the generator with clang as the front end.
pub fn run(config: &GeneratorConfig) -> Result<Summary, GenerateError> {
    let front_end = ClangFrontEnd::new(&config.clang_path, config.to_clang_args());
    generate(config, &front_end)
}

/// Run the generator with any front end.
///
/// Headers the front end rejects are logged and skipped. The run only
/// fails on bad configuration or when an artifact cannot be written.
#[instrument(level = "debug", skip_all, fields(prefix = %config.prefix, jobs = config.jobs))]
pub fn generate<F>(config: &GeneratorConfig, front_end: &F) -> Result<Summary, GenerateError>
where
    F: FrontEnd + Sync + ?Sized,
{
    config.validate()?;
    info!(prefix = %config.prefix, out_dir = %config.out_dir.display(), "starting binding generation");

    let paths = expand_headers(&config.headers)?;
    let (report, registry) = parse_and_discover(front_end, &paths, &config.mapping_overrides, config.jobs);

    let api = scan(&report.headers, &registry);
    info!(classes = api.len(), "discovered classes for emission");

    let mut options = config.emit_options();
    if config.include_originals {
        options.impl_includes = original_includes(&paths, config.include_rel_base.as_deref());
    }
    let classifier = Classifier::new(&registry, &config.mapping_overrides);
    let artifacts = emit(&api, &classifier, &options);
    let written = write_artifacts(&config.out_dir, &artifacts)?;

    let summary = Summary {
        headers: paths.len(),
        skipped: report.skipped.len(),
        types: registry.len(),
        classes: api.len(),
        written,
    };
    info!(
        headers = summary.headers,
        skipped = summary.skipped,
        types = summary.types,
        classes = summary.classes,
        files = summary.written.len(),
        out_dir = %config.out_dir.display(),
        "generation complete"
    );
    Ok(summary)
}

fn parse_and_discover<F>(
    front_end: &F,
    paths: &[PathBuf],
    overrides: &OverrideTable,
    jobs: usize,
) -> (ParseReport, TypeRegistry)
where
    F: FrontEnd + Sync + ?Sized,
{
    let sequential = || {
        let report = parse_headers(front_end, paths);
        let registry = discover(&report.headers, overrides);
        (report, registry)
    };
    if jobs <= 1 {
        return sequential();
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| {
                let report = parse_headers_parallel(front_end, paths);
                let registry = discover_parallel(&report.headers, overrides);
                (report, registry)
            })
        })
        .unwrap_or_else(|e| {
            warn!("failed to create thread pool ({e}), running sequentially");
            sequential()
        })
}

/// Write every artifact into `out_dir`, creating it if needed.
pub fn write_artifacts(out_dir: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>, GenerateError> {
    fs::create_dir_all(out_dir).map_err(|source| GenerateError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    artifacts
        .iter()
        .map(|artifact| {
            let path = out_dir.join(&artifact.file_name);
            fs::write(&path, &artifact.contents).map_err(|source| GenerateError::Write {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), bytes = artifact.contents.len(), "wrote artifact");
            Ok(path)
        })
        .collect()
}
