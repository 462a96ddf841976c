//! Handler for the `skol lint` subcommand.

use std::path::{Path, PathBuf};

use crate::cache;
use crate::config::Config;
use crate::typechecker::lint::Linter;

use super::{collect_sources, summary, Failed, Pipeline};

pub(crate) fn run_lint(paths: &[PathBuf], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let project_root = cache::find_project_root(
        paths
            .first()
            .map(|p| p.as_path())
            .unwrap_or_else(|| Path::new(".")),
    );
    let config = Config::discover(&project_root)?;
    let pipeline = Pipeline {
        cache: None,
        linter: Linter::new(&config.lint.disabled),
        typecheck: false,
    };

    let files = collect_sources(paths)?;
    let mut errors = 0;
    let mut warnings = 0;
    for file in &files {
        let report = pipeline.run_file(file)?;
        report.print(json);
        errors += report.errors();
        warnings += report.warnings();
    }

    let line = summary("Linted", files.len(), errors, warnings);
    // Only a file that fails to parse makes lint fail.
    if errors > 0 {
        eprintln!("\n{}", line);
        return Err(Failed { errors, warnings }.into());
    }
    println!("{}", line);
    Ok(())
}
