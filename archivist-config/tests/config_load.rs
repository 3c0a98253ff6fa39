use archivist_config::{ArchivistConfigLoader, EngineDetails};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "1"
logging:
  format: text
  filter: "archivist=debug"
engines:
  - name: home
    kind: tubearchivist
    enabled: true
    timeout_secs: 10
    config:
      base_url: "http://ta.local:8000/"
      token: "${ARCHIVIST_TEST_TA_TOKEN}"
"#;
    let p = write_yaml(&tmp, "archivist.yaml", file_yaml);

    let config = temp_env::with_var("ARCHIVIST_TEST_TA_TOKEN", Some("from-env"), || {
        ArchivistConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config")
    });

    assert_eq!(config.version.as_deref(), Some("1"));
    assert_eq!(config.logging.as_ref().unwrap().filter, "archivist=debug");
    let engine = config.select_engine(Some("home")).expect("home engine");
    assert_eq!(engine.timeout_secs, Some(10));
    let EngineDetails::TubeArchivist { config: ta } = &engine.details;
    assert_eq!(ta.base_url, "http://ta.local:8000/");
    assert_eq!(ta.token, "from-env");
}

#[test]
#[serial]
fn env_overlay_wins_over_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "archivist.yaml", "version: \"1\"\nengines: []\n");

    let config = temp_env::with_var("ARCHIVIST__VERSION", Some("2"), || {
        ArchivistConfigLoader::new().with_file(&p).load().expect("load config")
    });

    assert_eq!(config.version.as_deref(), Some("2"));
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.yaml");
    assert!(ArchivistConfigLoader::new().with_file(&missing).load().is_err());
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.yaml");
    let config = ArchivistConfigLoader::new()
        .with_optional_file(&missing)
        .load()
        .expect("optional file");
    assert!(config.engines.is_empty());
    assert!(config.select_engine(None).is_none());
}
