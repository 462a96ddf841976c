//! Skol language front end
//!
//! Lexes and parses Skol source into a [`parser::Program`], then type-checks it
//! in two passes and returns an ordered list of diagnostics.

pub mod cache;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod parser;
pub mod typechecker;
pub mod types;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::diagnostics::{Diagnostic, Severity, Span};
    pub use crate::parser::ast::*;
    pub use crate::typechecker::check;
    pub use crate::types::Type;
}
