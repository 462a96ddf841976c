//! Handler for the `skol check` subcommand.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cache::{self, AstCache};
use crate::config::Config;
use crate::typechecker::lint::Linter;

use super::{collect_sources, summary, Failed, Pipeline};

pub(crate) fn run_check(
    paths: &[PathBuf],
    strict: bool,
    no_cache: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let project_root = cache::find_project_root(
        paths
            .first()
            .map(|p| p.as_path())
            .unwrap_or_else(|| Path::new(".")),
    );
    let config = Config::discover(&project_root)?;
    let strict = strict || config.check.strict;

    let pipeline = Pipeline {
        cache: (!no_cache && config.cache.enabled)
            .then(|| AstCache::new(&project_root, &config.cache.dir)),
        linter: Linter::new(&config.lint.disabled),
        typecheck: true,
    };
    debug!(
        root = %project_root.display(),
        strict,
        cache = pipeline.cache.is_some(),
        "starting check"
    );

    let files = collect_sources(paths)?;
    let mut total_errors = 0;
    let mut total_warnings = 0;
    for file in &files {
        let report = pipeline.run_file(file)?;
        report.print(json);
        total_errors += report.errors();
        total_warnings += report.warnings();
    }

    let line = summary("Checked", files.len(), total_errors, total_warnings);
    if total_errors > 0 || (strict && total_warnings > 0) {
        eprintln!("\n{}", line);
        return Err(Failed {
            errors: total_errors,
            warnings: total_warnings,
        }
        .into());
    }
    println!("{}", line);
    Ok(())
}
