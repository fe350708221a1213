//! Running clang.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use gdcpp_decl::{DeclTree, FrontEnd, FrontEndError};
use serde_json::Value;
use tracing::{debug, warn};

use crate::lower::lower_ast;

/// clang executable used when none is configured.
pub const DEFAULT_CLANG: &str = "clang";

/// Arguments that make clang print the AST as JSON and stop.
const AST_DUMP_ARGS: &[&str] = &["-fsyntax-only", "-Xclang", "-ast-dump=json"];

/// Lines of clang's stderr kept in a [`FrontEndError::Tool`] message.
const STDERR_LINES: usize = 8;

/// [`FrontEnd`] backed by a clang executable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClangFrontEnd {
    pub clang_path: PathBuf,
    /// Language, standard and include arguments passed before the dump flags.
    pub args: Vec<String>,
}

impl Default for ClangFrontEnd {
    fn default() -> Self {
        ClangFrontEnd::new(DEFAULT_CLANG, Vec::new())
    }
}

impl ClangFrontEnd {
    pub fn new(clang_path: impl Into<PathBuf>, args: Vec<String>) -> Self {
        ClangFrontEnd {
            clang_path: clang_path.into(),
            args,
        }
    }

    /// The full command line for `header`.
    pub fn command(&self, header: &Path) -> Command {
        let mut command = Command::new(&self.clang_path);
        command.args(&self.args).args(AST_DUMP_ARGS).arg(header);
        command
    }
}

impl FrontEnd for ClangFrontEnd {
    fn parse(&self, path: &Path) -> Result<DeclTree, FrontEndError> {
        debug!(clang = %self.clang_path.display(), path = %path.display(), "running clang");
        let output = self.command(path).output().map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                FrontEndError::Tool {
                    path: path.to_path_buf(),
                    message: format!("{} not found: {source}", self.clang_path.display()),
                }
            } else {
                FrontEndError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let ast: Value = match serde_json::from_slice(&output.stdout) {
            Ok(ast) => ast,
            Err(error) if output.status.success() => {
                return Err(FrontEndError::Malformed {
                    path: path.to_path_buf(),
                    message: error.to_string(),
                });
            }
            Err(_) => {
                return Err(FrontEndError::Tool {
                    path: path.to_path_buf(),
                    message: stderr_excerpt(&output.stderr, output.status.code()),
                });
            }
        };

        if !output.status.success() {
            warn!(
                path = %path.display(),
                status = ?output.status.code(),
                "clang reported errors, using the partial AST"
            );
        }

        lower_ast(&ast, path).map_err(|error| FrontEndError::Malformed {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }
}

fn stderr_excerpt(stderr: &[u8], status: Option<i32>) -> String {
    let text = String::from_utf8_lossy(stderr);
    let excerpt: Vec<&str> = text.lines().take(STDERR_LINES).collect();
    let status = status.map_or_else(|| "signal".to_owned(), |code| code.to_string());
    if excerpt.is_empty() {
        format!("exit status {status}")
    } else {
        format!("exit status {status}: {}", excerpt.join("\n"))
    }
}
