//! Skol source to [`Program`]
//!
//! Tokens come from the logos-generated [`Lexer`]; the recursive-descent
//! [`Parser`] builds tagged nodes and recovers at the next top-level item.

pub mod ast;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod span;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::Parser;
pub use span::SourceFile;

use crate::diagnostics::error_codes::syntax;
use crate::diagnostics::{Diagnostic, DiagnosticBag, Span};
use std::path::Path;

/// Read and parse `path`; an unreadable file is reported as `E0100`
pub fn parse_file(path: &Path) -> Result<Program, DiagnosticBag> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_source(&content, path),
        Err(e) => {
            let mut bag = DiagnosticBag::new();
            bag.push(
                Diagnostic::error(syntax::IO_ERROR)
                    .message(format!("cannot read {}: {}", path.display(), e))
                    .span(Span::file(path))
                    .build(),
            );
            Err(bag)
        }
    }
}

/// Parse in-memory source; `path` only labels spans
pub fn parse_source(source: &str, path: &Path) -> Result<Program, DiagnosticBag> {
    let file = SourceFile::new(path.to_path_buf(), source.to_string());
    Parser::new(Lexer::new(&file), file.clone()).parse_program()
}

#[cfg(test)]
mod tests;
