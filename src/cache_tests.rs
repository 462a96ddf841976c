use super::*;
use crate::parser::parse_source;
use tempfile::TempDir;

fn sample_program() -> Program {
    parse_source(
        "%greeting: \"hi\"\n$main (print! greeting)\n",
        Path::new("sample.skol"),
    )
    .unwrap()
}

#[test]
fn test_hash_content_deterministic() {
    let h1 = hash_content("hello world");
    let h2 = hash_content("hello world");
    assert_eq!(h1, h2);
}

#[test]
fn test_hash_content_different() {
    let h1 = hash_content("hello");
    let h2 = hash_content("world");
    assert_ne!(h1, h2);
}

#[test]
fn test_cache_round_trip() {
    let tmp = TempDir::new().unwrap();
    let cache = AstCache::new(tmp.path(), "_skolcache");
    let file_path = tmp.path().join("sample.skol");
    std::fs::write(&file_path, "%greeting: \"hi\"").unwrap();

    let program = sample_program();
    cache.store(&file_path, 12345, &program).unwrap();

    let loaded = cache.load(&file_path, 12345).unwrap().unwrap();
    assert_eq!(loaded.len(), program.len());
    assert_eq!(
        serde_json::to_value(&loaded).unwrap(),
        serde_json::to_value(&program).unwrap()
    );
    assert!(tmp.path().join("_skolcache").is_dir());
}

#[test]
fn test_cache_miss_on_different_hash() {
    let tmp = TempDir::new().unwrap();
    let cache = AstCache::new(tmp.path(), "_skolcache");
    let file_path = tmp.path().join("sample.skol");

    cache.store(&file_path, 12345, &sample_program()).unwrap();
    assert!(cache.load(&file_path, 99999).unwrap().is_none());
}

#[test]
fn test_cache_miss_when_absent() {
    let tmp = TempDir::new().unwrap();
    let cache = AstCache::new(tmp.path(), "_skolcache");
    assert!(cache.load(&tmp.path().join("nope.skol"), 1).unwrap().is_none());
}

#[test]
fn test_corrupt_record_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let cache = AstCache::new(tmp.path(), "_skolcache");
    let file_path = tmp.path().join("sample.skol");
    cache.store(&file_path, 1, &sample_program()).unwrap();

    let entry = std::fs::read_dir(cache.dir()).unwrap().next().unwrap().unwrap();
    std::fs::write(entry.path(), "{ not json").unwrap();
    assert!(matches!(cache.load(&file_path, 1), Err(CacheError::Json(_))));
}

#[test]
fn test_find_project_root() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("src").join("deep");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(tmp.path().join("skol.toml"), "").unwrap();

    assert_eq!(find_project_root(&nested), tmp.path());
}

#[test]
fn test_find_project_root_falls_back_to_start() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("lonely.skol");
    std::fs::write(&file, "").unwrap();
    // no skol.toml anywhere above a fresh temp dir is assumed
    let root = find_project_root(&file);
    assert!(root == tmp.path() || root.join("skol.toml").exists());
}
