use mdquery_core::config::loader::ConfigLoader;
use mdquery_core::index::FieldPolicy;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn load_default_profile_ok() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    let toml = r#"
version = 1
profile = "default"

[profiles.default]
vault_root = "/tmp/vault"
excluded_folders = ["templates"]

[logging]
level = "debug"
file = "{{vault_root}}/.mdquery/mdq.log"

[index]
value_indexed_fields = ["due", "rating"]
"#;

    write_file(&cfg_path, toml);

    let rc = ConfigLoader::load(Some(&cfg_path), None).expect("should load");
    assert_eq!(rc.active_profile, "default");
    assert_eq!(rc.vault_root.display().to_string(), "/tmp/vault");
    assert_eq!(rc.excluded_folders, vec![PathBuf::from("/tmp/vault/templates")]);
    assert_eq!(rc.logging.level, "debug");
    assert_eq!(rc.logging.file, Some(PathBuf::from("/tmp/vault/.mdquery/mdq.log")));
    assert_eq!(rc.index.value_indexed_fields, vec!["due", "rating"]);
    assert!(!rc.index.index_all_values);

    let policy = FieldPolicy::from_config(&rc.index);
    assert!(policy.indexes_values("Rating"));
    assert!(!policy.indexes_values("created"));
}

#[test]
fn load_with_profile_override_ok() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("mdquery/config.toml");
    let toml = r#"
version = 1
profile = "default"

[profiles.default]
vault_root = "/tmp/def"

[profiles.work]
vault_root = "/tmp/work"
"#;
    write_file(&cfg_path, toml);

    let rc = ConfigLoader::load(Some(&cfg_path), Some("work")).expect("should load");
    assert_eq!(rc.active_profile, "work");
    assert_eq!(rc.vault_root.display().to_string(), "/tmp/work");
}
