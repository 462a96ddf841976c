use super::*;
use crate::parser::parse_source;
use crate::typechecker::TypeChecker;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn pipeline(cache: Option<AstCache>) -> Pipeline {
    Pipeline {
        cache,
        linter: Linter::default(),
        typecheck: true,
    }
}

#[test]
fn test_cli_parses_check() {
    let cli = Cli::try_parse_from(["skol", "check", "src", "--strict", "--debug", "parser,cache"])
        .unwrap();
    assert_eq!(cli.debug, vec![DebugTarget::Parser, DebugTarget::Cache]);
    match cli.command {
        Command::Check {
            paths,
            strict,
            no_cache,
        } => {
            assert_eq!(paths, vec![PathBuf::from("src")]);
            assert!(strict);
            assert!(!no_cache);
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_cli_rejects_unknown_debug_target() {
    assert!(Cli::try_parse_from(["skol", "lint", "--debug", "network"]).is_err());
}

#[test]
fn test_log_filter() {
    assert_eq!(log_filter(&[]), "warn");
    assert_eq!(
        log_filter(&[DebugTarget::Typecheck, DebugTarget::Lexer]),
        "warn,skol::typechecker=debug,skol::parser::lexer=trace"
    );
}

#[test]
fn test_summary_line() {
    assert_eq!(summary("Checked", 3, 0, 0), "Checked 3 file(s), no errors found");
    assert_eq!(
        summary("Checked", 2, 1, 4),
        "Checked 2 file(s), found 1 error(s) and 4 warning(s)"
    );
}

#[test]
fn test_collect_sources() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "b.skol", "");
    write(tmp.path(), "a.skol", "");
    write(tmp.path(), "notes.txt", "");
    write(tmp.path(), "nested/c.skol", "");

    let files = collect_sources(&[tmp.path().to_path_buf()]).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(tmp.path()).unwrap().display().to_string())
        .collect();
    assert_eq!(names.len(), 3);
    assert_eq!(names[0], "a.skol");
    assert_eq!(names[1], "b.skol");
}

#[test]
fn test_run_file_reports_type_and_lint_diagnostics() {
    let tmp = TempDir::new().unwrap();
    let file = write(
        tmp.path(),
        "main.skol",
        "$main (\n  %xs: [int](1)\n  append! xs \"two\"\n)\n",
    );
    let report = pipeline(None).run_file(&file).unwrap();
    let codes: Vec<&str> = report.diagnostics.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["E1001", "W0001"]);
    assert_eq!(report.errors(), 1);
    assert_eq!(report.warnings(), 1);
}

#[test]
fn test_run_file_reports_parse_errors() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "broken.skol", "%a: ~\n");
    let report = pipeline(None).run_file(&file).unwrap();
    assert_eq!(report.diagnostics[0].code, "E0001");
}

#[test]
fn test_run_file_fills_and_uses_cache() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "main.skol", "%greeting: \"hi\"\n$main (print! greeting)\n");
    let cache = AstCache::new(tmp.path(), "_skolcache");

    let first = pipeline(Some(cache.clone())).run_file(&file).unwrap();
    assert!(first.diagnostics.is_empty());
    let hash = cache::hash_content(&first.source);
    assert!(cache.load(&file, hash).unwrap().is_some());

    let second = pipeline(Some(cache)).run_file(&file).unwrap();
    assert!(second.diagnostics.is_empty());
}

#[test]
fn test_explain_known_code() {
    let text = explain_cmd::explain("e1001").unwrap();
    assert!(text.starts_with("E1001 (type mismatch): "));
}

#[test]
fn test_explain_unknown_code() {
    assert!(explain_cmd::explain("E9999").is_none());
}

#[test]
fn test_describe_program() {
    let program = parse_source(
        "@P(name/string)\n%who: @P \"x\"\n%n/int\n$greet/string p/P: p#name\n$puts/int s/string ?\"c_puts\"\n",
        Path::new("demo.skol"),
    )
    .unwrap();
    let mut checker = TypeChecker::new();
    checker.check_program(&program).unwrap();

    insta::assert_snapshot!(ast_cmd::describe_program("demo.skol", &program, &checker), @r###"
    demo.skol: 1 struct(s), 1 global(s), 1 declaration(s), 1 function(s), 1 extern(s)
      struct P (name: String)
      global who: Structure P
      declare n: Int
      func greet(p: Structure P) -> String
      extern puts = c_puts(s: String) -> Int
    "###);
}
