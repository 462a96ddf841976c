//! Error code definitions

use super::DiagnosticKind;

/// Syntax/parsing errors (E0xxx)
pub mod syntax {
    pub const UNEXPECTED_TOKEN: &str = "E0001";
    pub const UNTERMINATED_STRING: &str = "E0002";
    pub const INVALID_NUMBER: &str = "E0003";
    pub const MISSING_DELIMITER: &str = "E0004";
    pub const EXPECTED_NAME: &str = "E0005";
    pub const EXPECTED_TYPE: &str = "E0006";
    pub const INVALID_ESCAPE: &str = "E0007";
    pub const UNEXPECTED_EOF: &str = "E0008";
    pub const ILLEGAL_TOP_LEVEL: &str = "E0009";
    pub const CONSTANT_REDEFINED: &str = "E0010";
    pub const UNKNOWN_NAME: &str = "E0011";
    pub const NEED_TYPE_OR_VALUE: &str = "E0012";
    pub const NEED_BODY_OR_EXTERN: &str = "E0013";
    pub const CANNOT_INFER_ELEMENT: &str = "E0014";
    pub const IO_ERROR: &str = "E0100";
}

/// Type errors (E1xxx)
pub mod types {
    pub const TYPE_MISMATCH: &str = "E1001";
    pub const VARIABLE_RETYPED: &str = "E1002";
    pub const UNKNOWN_VARIABLE: &str = "E1003";
    pub const UNKNOWN_FUNCTION: &str = "E1004";
    pub const UNKNOWN_FIELD: &str = "E1005";
    pub const NEED_MORE_ARGUMENTS: &str = "E1006";
    pub const TOO_MANY_ARGUMENTS: &str = "E1007";
    pub const MALFORMED_SELECTOR: &str = "E1008";
    pub const UNSUPPORTED_NODE: &str = "E1009";
    pub const UNKNOWN_TYPE: &str = "E1010";
    pub const ILLEGAL_TYPE: &str = "E1011";
}

/// Lint warnings (W0xxx)
pub mod warnings {
    pub const NEW_ARRAY: &str = "W0001";
    pub const INFINITE_LOOP: &str = "W0002";
}

/// Map a code to the kind of problem it reports.
pub fn kind_of(code: &str) -> DiagnosticKind {
    match code {
        syntax::IO_ERROR => DiagnosticKind::Io,
        types::TYPE_MISMATCH => DiagnosticKind::TypeMismatch,
        types::VARIABLE_RETYPED => DiagnosticKind::Retype,
        types::UNKNOWN_VARIABLE => DiagnosticKind::UnknownVariable,
        types::UNKNOWN_FUNCTION => DiagnosticKind::UnknownFunction,
        types::UNKNOWN_FIELD => DiagnosticKind::UnknownField,
        types::NEED_MORE_ARGUMENTS => DiagnosticKind::ArityShortfall,
        types::TOO_MANY_ARGUMENTS => DiagnosticKind::ArityExcess,
        types::MALFORMED_SELECTOR => DiagnosticKind::MalformedSelector,
        types::UNSUPPORTED_NODE => DiagnosticKind::Unsupported,
        types::UNKNOWN_TYPE => DiagnosticKind::UnknownType,
        types::ILLEGAL_TYPE => DiagnosticKind::IllegalType,
        c if c.starts_with('W') => DiagnosticKind::Lint,
        _ => DiagnosticKind::Syntax,
    }
}

/// One-line explanation for a code, used by `--json` consumers and tests.
pub fn describe(code: &str) -> Option<&'static str> {
    let text = match code {
        syntax::UNEXPECTED_TOKEN => "unexpected token",
        syntax::UNTERMINATED_STRING => "unterminated string or char literal",
        syntax::INVALID_NUMBER => "invalid number literal",
        syntax::MISSING_DELIMITER => "missing closing delimiter",
        syntax::EXPECTED_NAME => "expected a name",
        syntax::EXPECTED_TYPE => "expected a type",
        syntax::INVALID_ESCAPE => "invalid escape sequence",
        syntax::UNEXPECTED_EOF => "unexpected end of file",
        syntax::ILLEGAL_TOP_LEVEL => "statement not allowed at the top level",
        syntax::CONSTANT_REDEFINED => "constant redefined",
        syntax::UNKNOWN_NAME => "unknown name",
        syntax::NEED_TYPE_OR_VALUE => "variable needs a type or a value",
        syntax::NEED_BODY_OR_EXTERN => "function needs a body or an extern marker",
        syntax::CANNOT_INFER_ELEMENT => "cannot infer array element type",
        syntax::IO_ERROR => "could not read source file",
        types::TYPE_MISMATCH => "type mismatch",
        types::VARIABLE_RETYPED => "variable type changed",
        types::UNKNOWN_VARIABLE => "unknown variable",
        types::UNKNOWN_FUNCTION => "unknown function",
        types::UNKNOWN_FIELD => "unknown field",
        types::NEED_MORE_ARGUMENTS => "not enough arguments",
        types::TOO_MANY_ARGUMENTS => "too many arguments",
        types::MALFORMED_SELECTOR => "malformed selector",
        types::UNSUPPORTED_NODE => "unsupported node",
        types::UNKNOWN_TYPE => "unknown type",
        types::ILLEGAL_TYPE => "Any is only allowed in extern signatures",
        warnings::NEW_ARRAY => "append/concat result is discarded",
        warnings::INFINITE_LOOP => "loop condition is always true",
        _ => return None,
    };
    Some(text)
}
