use dupesweep::config::{Config, ConfigError, RuleSpec};
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_config_defaults() {
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();
    assert!(!config.live);
    assert!(config.rules.is_empty());
}

#[test]
fn test_config_load_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(
        &path,
        r#"
[[rules]]
keep = "/srv/photos/library"
remove = "/srv/photos/inbox"
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(
        config.rules,
        vec![RuleSpec {
            keep: PathBuf::from("/srv/photos/library"),
            remove: PathBuf::from("/srv/photos/inbox"),
        }]
    );
    assert_eq!(config.rule_set().unwrap().len(), 1);
}

#[test]
fn test_config_env_overrides_live() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(&path, "live = false\n[[rules]]\nkeep = \"/a\"\nremove = \"/b\"\n").unwrap();

    std::env::set_var("DUPESWEEP_LIVE", "true");
    let result = Config::load(&path);
    std::env::remove_var("DUPESWEEP_LIVE");

    assert!(result.unwrap().live);
}

#[test]
fn test_config_toml_layer_merges_over_defaults() {
    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::string("live = true"));
    let config: Config = figment.extract().unwrap();
    assert!(config.live);
    assert!(config.rules.is_empty());
}

#[test]
fn test_config_rejects_empty_rule_list() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(&path, "live = true\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert!(matches!(config.rule_set(), Err(ConfigError::NoRules)));
}

#[test]
fn test_config_unknown_key_in_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(&path, "[[rules]]\nkeep = \"/a\"\nremov = \"/b\"\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("unknown key `remov` in rule 1"));
    assert!(err.to_string().contains("did you mean `remove`?"));
}

#[test]
fn test_config_invalid_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(&path, "invalid = = toml").unwrap();

    assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_rule_order_preserved() {
    let config = Config::from_toml_str(
        r#"
[[rules]]
keep = "/one"
remove = "/two"

[[rules]]
keep = "/two"
remove = "/three"
"#,
    )
    .unwrap();

    let rules = config.rule_set().unwrap();
    let keeps: Vec<_> = rules.iter().map(|r| r.keep_dir().to_path_buf()).collect();
    assert_eq!(keeps, vec![PathBuf::from("/one"), PathBuf::from("/two")]);
}
