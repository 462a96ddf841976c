//! Golden file tests for the checker
//!
//! Every file under `tests/golden/pass` must parse and check cleanly. Every file
//! under `tests/golden/fail` names the codes it must produce, in report order,
//! on its first line: `// expect: E1001 E1002`.

use std::fs;
use std::path::{Path, PathBuf};

use skol::diagnostics::Diagnostic;
use skol::parser::parse_source;
use skol::typechecker::{check, lint::Linter};

fn golden_files(dir: &str) -> Vec<PathBuf> {
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("golden")
        .join(dir);

    let mut files: Vec<PathBuf> = fs::read_dir(&test_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|e| e == "skol"))
        .collect();
    files.sort();
    assert!(!files.is_empty(), "no golden files in {:?}", test_dir);
    files
}

fn diagnostics_for(path: &Path, source: &str) -> Vec<Diagnostic> {
    match parse_source(source, path) {
        Ok(program) => {
            let mut diags = check(&program);
            diags.extend(Linter::default().lint_program(&program).take());
            diags
        }
        Err(bag) => bag.take(),
    }
}

fn expected_codes(path: &Path, source: &str) -> Vec<String> {
    let first = source.lines().next().unwrap_or_default();
    let Some(codes) = first.strip_prefix("// expect:") else {
        panic!("{:?} does not start with `// expect:`", path);
    };
    codes.split_whitespace().map(str::to_string).collect()
}

#[test]
fn golden_pass() {
    for path in golden_files("pass") {
        let source = fs::read_to_string(&path).unwrap();
        let diags = diagnostics_for(&path, &source);
        assert!(
            diags.is_empty(),
            "{:?} should check cleanly, got:\n{}",
            path,
            diags
                .iter()
                .map(|d| d.to_human_readable(&source))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

#[test]
fn golden_fail() {
    for path in golden_files("fail") {
        let source = fs::read_to_string(&path).unwrap();
        let expected = expected_codes(&path, &source);
        let actual: Vec<String> = diagnostics_for(&path, &source)
            .into_iter()
            .map(|d| d.code)
            .collect();
        pretty_assertions::assert_eq!(expected, actual, "codes for {:?}", path);
    }
}
