//! Handler for the `skol explain` subcommand.

use crate::diagnostics::error_codes;

pub(crate) fn run_explain(code: &str) -> Result<(), Box<dyn std::error::Error>> {
    let text = explain(code).ok_or_else(|| format!("unknown code {}", code))?;
    println!("{}", text);
    Ok(())
}

/// `CODE (kind): description`, or `None` for a code nothing reports
pub(crate) fn explain(code: &str) -> Option<String> {
    let code = code.to_ascii_uppercase();
    let description = error_codes::describe(&code)?;
    Some(format!(
        "{} ({}): {}",
        code,
        error_codes::kind_of(&code),
        description
    ))
}
