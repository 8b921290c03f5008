use judge_fs::{ConfigStore, Error, NormalizedPath};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Doc {
    name: String,
    #[serde(default)]
    items: Vec<String>,
}

#[test]
fn test_json_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("doc.json"));
    let store = ConfigStore::new();
    let doc = Doc {
        name: "sumas".into(),
        items: vec!["a".into(), "b".into()],
    };

    store.save(&path, &doc).unwrap();
    let raw = fs::read_to_string(path.to_native()).unwrap();
    assert!(raw.ends_with('\n'));
    assert!(raw.contains("  \"name\": \"sumas\""));

    let loaded: Doc = store.load(&path).unwrap();
    assert_eq!(loaded, doc);
}

#[test]
fn test_toml_load() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("judge-sync.toml");
    fs::write(&file, "name = \"x\"\nitems = [\"y\"]\n").unwrap();

    let loaded: Doc = ConfigStore::new().load(&NormalizedPath::new(&file)).unwrap();
    assert_eq!(loaded.items, vec!["y".to_string()]);
}

#[test]
fn test_load_optional_missing_is_none() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.json"));

    let loaded: Option<Doc> = ConfigStore::new().load_optional(&path).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_malformed_json_reports_parse_error() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("doc.json");
    fs::write(&file, "{ not json").unwrap();

    let result: Result<Doc, _> = ConfigStore::new().load(&NormalizedPath::new(&file));
    assert!(matches!(result, Err(Error::ConfigParse { ref format, .. }) if format == "JSON"));
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("doc.ini");
    fs::write(&file, "x").unwrap();

    let result: Result<Doc, _> = ConfigStore::new().load(&NormalizedPath::new(&file));
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}
