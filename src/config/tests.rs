use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_empty_config() {
    let config = Config::parse("").unwrap();
    assert!(!config.check.strict);
    assert!(config.lint.disabled.is_empty());
    assert!(config.cache.enabled);
    assert_eq!(config.cache.dir, "_skolcache");
}

#[test]
fn test_parse_full_config() {
    let content = r#"
[check]
strict = true

[lint]
disabled = ["infinite_loop"]

[cache]
enabled = false
dir = ".cache"
"#;

    let config = Config::parse(content).unwrap();
    assert!(config.check.strict);
    assert_eq!(config.lint.disabled, vec!["infinite_loop"]);
    assert!(!config.cache.enabled);
    assert_eq!(config.cache.dir, ".cache");
}

#[test]
fn test_partial_table_keeps_defaults() {
    let config = Config::parse("[cache]\nenabled = false\n").unwrap();
    assert_eq!(config.cache.dir, "_skolcache");
}

#[test]
fn test_unknown_lint_rule() {
    let err = Config::parse("[lint]\ndisabled = [\"unused_variable\"]\n").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownLint(ref name) if name == "unused_variable"));
    assert_eq!(err.to_string(), "unknown lint rule `unused_variable`");
}

#[test]
fn test_invalid_toml() {
    let err = Config::parse("[check\nstrict = true").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_discover() {
    let tmp = TempDir::new().unwrap();
    assert!(!Config::discover(tmp.path()).unwrap().check.strict);

    std::fs::write(tmp.path().join(CONFIG_FILE), "[check]\nstrict = true\n").unwrap();
    assert!(Config::discover(tmp.path()).unwrap().check.strict);
}

#[test]
fn test_to_toml_round_trip() {
    let mut config = Config::default();
    config.lint.disabled.push("new_array".to_string());
    let text = config.to_toml().unwrap();
    let back = Config::parse(&text).unwrap();
    assert_eq!(back.lint.disabled, vec!["new_array"]);
}
