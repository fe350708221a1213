//! Generator configuration.

use std::fmt;
use std::path::PathBuf;

use gdcpp_clang::DEFAULT_CLANG;
use gdcpp_emit::EmitOptions;
use gdcpp_types::OverrideTable;
use rustc_hash::FxHashSet;
use tracing::Level;

use crate::inputs::normalize;

/// Configuration error. Reported before any header is parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no headers specified, provide at least one header pattern via --headers")]
    NoHeaders,
    #[error("--prefix must be a non-empty string")]
    EmptyPrefix,
    #[error("option `{0}` requires a value")]
    MissingValue(String),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("invalid log level `{0}`, expected one of CRITICAL, ERROR, WARNING, INFO, DEBUG")]
    InvalidLogLevel(String),
    #[error("invalid job count `{0}`, expected a positive integer")]
    InvalidJobs(String),
}

/// Logging verbosity accepted by `--log-level`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Parse a level name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CRITICAL" => Some(Self::Critical),
            "ERROR" => Some(Self::Error),
            "WARNING" | "WARN" => Some(Self::Warning),
            "INFO" => Some(Self::Info),
            "DEBUG" => Some(Self::Debug),
            _ => None,
        }
    }

    /// The tracing level this maps to. There is no level above ERROR.
    pub fn tracing_level(self) -> Level {
        match self {
            Self::Critical | Self::Error => Level::ERROR,
            Self::Warning => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Critical => "CRITICAL",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        })
    }
}

/// Everything a generator run needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Header path patterns, in the order given.
    pub headers: Vec<String>,
    /// Include search paths, in the order given.
    pub includes: Vec<PathBuf>,
    /// Searched before every other include path. Original headers inside it
    /// are included relative to it.
    pub include_rel_base: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub prefix: String,
    pub mapping_file: Option<PathBuf>,
    /// Filled by [`load_mapping`](Self::load_mapping).
    pub mapping_overrides: OverrideTable,
    pub clang_path: PathBuf,
    /// Add `#include` lines for the input headers to every wrapper unit.
    pub include_originals: bool,
    /// Passed to clang after the generated arguments.
    pub clang_args_extra: Vec<String>,
    pub cxx_std: String,
    pub godot_base: String,
    pub log_level: LogLevel,
    /// 1 parses sequentially; more uses a pool of that many threads.
    pub jobs: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            headers: Vec::new(),
            includes: Vec::new(),
            include_rel_base: None,
            out_dir: PathBuf::from("out"),
            prefix: "ocgd".into(),
            mapping_file: None,
            mapping_overrides: OverrideTable::new(),
            clang_path: PathBuf::from(DEFAULT_CLANG),
            include_originals: false,
            clang_args_extra: Vec::new(),
            cxx_std: "c++17".into(),
            godot_base: "Object".into(),
            log_level: LogLevel::default(),
            jobs: 1,
        }
    }
}

impl GeneratorConfig {
    /// Arguments passed to clang before the header path.
    ///
    /// Language and standard come first, then the relative-include base,
    /// then the include paths (normalized, first occurrence kept), then the
    /// user's extra arguments so they can override anything before them.
    pub fn to_clang_args(&self) -> Vec<String> {
        let mut args = vec!["-x".to_owned(), "c++".to_owned(), format!("-std={}", self.cxx_std)];

        let mut seen = FxHashSet::default();
        for dir in self.include_rel_base.iter().chain(&self.includes) {
            let dir = normalize(dir);
            let arg = format!("-I{}", dir.display());
            if seen.insert(dir) {
                args.push(arg);
            }
        }

        args.extend(self.clang_args_extra.iter().cloned());
        args
    }

    /// Load `mapping_file` into `mapping_overrides`.
    ///
    /// A file that cannot be read or parsed is logged and leaves no
    /// overrides; it never fails the run.
    pub fn load_mapping(&mut self) {
        if let Some(path) = &self.mapping_file {
            self.mapping_overrides = OverrideTable::load_or_empty(path);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.headers.is_empty() {
            return Err(ConfigError::NoHeaders);
        }
        if self.prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        Ok(())
    }

    /// Emission settings. `impl_includes` is filled by the pipeline.
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            prefix: self.prefix.clone(),
            godot_base: self.godot_base.clone(),
            impl_includes: Vec::new(),
        }
    }
}
