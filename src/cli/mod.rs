//! Command-line interface for the Skol front end
//!
//! Provides commands: check, ast, lint, explain

mod ast_cmd;
mod check_cmd;
mod explain_cmd;
mod lint_cmd;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::cache::{self, AstCache};
use crate::diagnostics::Diagnostic;
use crate::parser::{parse_source, Program};
use crate::typechecker::{self, lint::Linter};

/// Skol - static checker for the Skol language
#[derive(Parser, Debug)]
#[command(name = "skol")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output diagnostics as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging for a comma-separated list of subsystems
    #[arg(long, global = true, value_delimiter = ',', value_name = "TARGETS")]
    pub debug: Vec<DebugTarget>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Type-check and lint source files
    Check {
        /// Files or directories to check
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Bypass the parse cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Print the parsed program of a file
    Ast {
        /// File to parse
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Run only the lint rules
    Lint {
        /// Files or directories to lint
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,
    },

    /// Explain an error or warning code
    Explain {
        /// Code to explain (e.g., E1001, W0001)
        code: String,
    },
}

/// Subsystems `--debug` can switch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DebugTarget {
    Lexer,
    Parser,
    Typecheck,
    Cache,
    Lint,
}

impl DebugTarget {
    /// `EnvFilter` directive for this subsystem
    pub fn directive(self) -> &'static str {
        match self {
            DebugTarget::Lexer => "skol::parser::lexer=trace",
            DebugTarget::Parser => "skol::parser=debug",
            DebugTarget::Typecheck => "skol::typechecker=debug",
            DebugTarget::Cache => "skol::cache=debug",
            DebugTarget::Lint => "skol::typechecker::lint=debug",
        }
    }
}

/// Log filter used when `SKOL_LOG` is not set
pub fn log_filter(targets: &[DebugTarget]) -> String {
    std::iter::once("warn")
        .chain(targets.iter().map(|t| t.directive()))
        .collect::<Vec<_>>()
        .join(",")
}

/// The run found problems. The diagnostics have already been printed.
#[derive(Debug, Error)]
#[error("{errors} error(s) and {warnings} warning(s)")]
pub struct Failed {
    pub errors: usize,
    pub warnings: usize,
}

impl Cli {
    /// Run the parsed command line
    pub fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        match self.command {
            Command::Check {
                paths,
                strict,
                no_cache,
            } => check_cmd::run_check(&paths, strict, no_cache, self.json),
            Command::Ast { file, pretty } => ast_cmd::run_ast(&file, pretty, self.json),
            Command::Lint { paths } => lint_cmd::run_lint(&paths, self.json),
            Command::Explain { code } => explain_cmd::run_explain(&code),
        }
    }
}

/// What to run over each file
pub(crate) struct Pipeline {
    pub cache: Option<AstCache>,
    pub linter: Linter,
    pub typecheck: bool,
}

/// Diagnostics found in one file
pub(crate) struct FileReport {
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn errors(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warnings(&self) -> usize {
        self.diagnostics.len() - self.errors()
    }

    pub fn print(&self, json: bool) {
        for d in &self.diagnostics {
            if json {
                println!("{}", d.to_json());
            } else {
                eprintln!("{}", d.to_human_readable(&self.source));
            }
        }
    }
}

impl Pipeline {
    /// Parse (or fetch from cache), check and lint one file
    pub fn run_file(&self, path: &Path) -> Result<FileReport, Box<dyn std::error::Error>> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        let program = match self.parse(path, &source) {
            Ok(program) => program,
            Err(diagnostics) => return Ok(FileReport { source, diagnostics }),
        };

        let mut diagnostics = if self.typecheck {
            typechecker::check(&program)
        } else {
            Vec::new()
        };
        diagnostics.extend(self.linter.lint_program(&program).take());
        Ok(FileReport { source, diagnostics })
    }

    fn parse(&self, path: &Path, source: &str) -> Result<Program, Vec<Diagnostic>> {
        let content_hash = cache::hash_content(source);
        if let Some(cache) = &self.cache {
            match cache.load(path, content_hash) {
                Ok(Some(program)) => return Ok(program),
                Ok(None) => {}
                Err(e) => warn!(file = %path.display(), error = %e, "ignoring cache entry"),
            }
        }

        let program = parse_source(source, path).map_err(|bag| bag.take())?;
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(path, content_hash, &program) {
                warn!(file = %path.display(), error = %e, "could not write cache entry");
            }
        }
        Ok(program)
    }
}

/// Every `.skol` file named by `paths`, directories searched recursively
pub(crate) fn collect_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let start = files.len();
            walk_sources(path, &mut files)?;
            files[start..].sort();
        } else if is_source(path) && path.is_file() {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn is_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "skol")
}

fn walk_sources(dir: &Path, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_sources(&path, found)?;
        } else if is_source(&path) {
            found.push(path);
        }
    }
    Ok(())
}

/// `Checked N file(s), ...` line shared by check and lint
pub(crate) fn summary(verb: &str, files: usize, errors: usize, warnings: usize) -> String {
    if errors == 0 && warnings == 0 {
        format!("{} {} file(s), no errors found", verb, files)
    } else {
        format!(
            "{} {} file(s), found {} error(s) and {} warning(s)",
            verb, files, errors, warnings
        )
    }
}

#[cfg(test)]
mod tests;
