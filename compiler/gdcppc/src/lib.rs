//! gdcpp driver.
//!
//! Turns a command line into a [`GeneratorConfig`] and runs the pipeline:
//! header patterns are expanded, parsed by clang, discovered into a type
//! registry, scanned for their public API, and emitted as Godot wrapper
//! sources into the output directory.
//!
//! Headers that fail to parse are skipped with a warning. Only a bad
//! configuration or an unwritable output directory fails the run.

mod cli;
mod config;
mod inputs;
mod logging;
mod pipeline;

pub use cli::{parse_args, Command, USAGE};
pub use config::{ConfigError, GeneratorConfig, LogLevel};
pub use inputs::{expand_headers, normalize, original_includes};
pub use logging::init_tracing;
pub use pipeline::{generate, run, write_artifacts, GenerateError, Summary};
