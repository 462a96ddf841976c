//! Handler for the `skol ast` subcommand.

use std::fmt::Write as _;
use std::path::Path;

use crate::parser::ast::{Param, Program};
use crate::parser::parse_source;
use crate::typechecker::TypeChecker;
use crate::types::Type;

use super::{Failed, FileReport};

pub(crate) fn run_ast(path: &Path, pretty: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let program = match parse_source(&source, path) {
        Ok(program) => program,
        Err(bag) => {
            let report = FileReport {
                source,
                diagnostics: bag.take(),
            };
            report.print(json);
            return Err(Failed {
                errors: report.errors(),
                warnings: report.warnings(),
            }
            .into());
        }
    };

    let mut checker = TypeChecker::new();
    let _ = checker.check_program(&program);
    let report = FileReport {
        source,
        diagnostics: checker.diagnostics().diagnostics().to_vec(),
    };
    report.print(json);

    if json {
        let text = if pretty {
            serde_json::to_string_pretty(&program)?
        } else {
            serde_json::to_string(&program)?
        };
        println!("{}", text);
    } else {
        print!("{}", describe_program(&path.display().to_string(), &program, &checker));
    }
    Ok(())
}

/// Counts per collection, then one line per definition
pub(crate) fn describe_program(name: &str, program: &Program, checker: &TypeChecker) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} struct(s), {} global(s), {} declaration(s), {} function(s), {} extern(s)",
        name,
        program.structs.len(),
        program.vars.len(),
        program.typedefs.len(),
        program.funcs.len(),
        program.externs.len()
    );
    for (name, (def, _)) in &program.structs {
        let fields: Vec<String> = def
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.name, f.ty))
            .collect();
        let _ = writeln!(out, "  struct {} ({})", name, fields.join(", "));
    }
    for name in program.vars.keys() {
        let ty = checker
            .var_type(name)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "?".to_string());
        let _ = writeln!(out, "  global {}: {}", name, ty);
    }
    for (name, decl) in &program.typedefs {
        let _ = writeln!(out, "  declare {}: {}", name, decl.ty);
    }
    for (name, (def, _)) in &program.funcs {
        let _ = writeln!(out, "  func {}{}", name, signature(&def.params, &def.ret));
    }
    for (alias, (ext, _)) in &program.externs {
        let _ = writeln!(
            out,
            "  extern {} = {}{}",
            alias,
            ext.name,
            signature(&ext.params, &ext.ret)
        );
    }
    out
}

fn signature(params: &[Param], ret: &Type) -> String {
    let params: Vec<String> = params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty))
        .collect();
    format!("({}) -> {}", params.join(", "), ret)
}
