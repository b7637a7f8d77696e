use std::path::PathBuf;
use std::time::Duration;

use super::*;

#[test]
fn default_config_has_expected_general_fields() {
    let config = AppConfig::default();
    assert_eq!(config.general.kubeconfig, None);
    assert_eq!(config.general.backup_retention, 5);
}

#[test]
fn default_config_has_cluster_fields() {
    let config = AppConfig::default();
    assert_eq!(config.cluster.timeout_secs, 5);
    assert!(config.cluster.insecure_skip_tls_verify);
    assert_eq!(config.cluster.timeout(), Duration::from_secs(5));
}

#[test]
fn embedded_defaults_match_struct_defaults() {
    let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
    assert_eq!(config.general, GeneralConfig::default());
    assert_eq!(config.cluster, ClusterConfig::default());
}

#[test]
fn parse_general_from_toml() {
    let raw = r#"
[general]
kubeconfig = "/tmp/kube/config"
"#;
    let config: AppConfig = toml::from_str(raw).unwrap();
    assert_eq!(config.general.kubeconfig, Some(PathBuf::from("/tmp/kube/config")));
    assert_eq!(config.general.backup_retention, 5);
}

#[test]
fn kebab_case_keys_are_accepted() {
    let raw = r#"
[general]
backup-retention = 9

[cluster]
timeout-secs = 2
insecure-skip-tls-verify = false
"#;
    let config: AppConfig = toml::from_str(raw).unwrap();
    assert_eq!(config.general.backup_retention, 9);
    assert_eq!(config.cluster.timeout_secs, 2);
    assert!(!config.cluster.insecure_skip_tls_verify);
}

#[test]
fn partial_toml_only_cluster_layers_over_defaults() {
    let user_toml = r#"
[cluster]
timeout_secs = 30
"#;
    let config = AppConfig::layered(user_toml).unwrap();

    assert_eq!(config.cluster.timeout_secs, 30);
    assert!(config.cluster.insecure_skip_tls_verify);
    assert_eq!(config.general.backup_retention, 5);
}

#[test]
fn layering_keeps_unset_keys_of_a_present_section() {
    let config = AppConfig::layered("[general]\nkubeconfig = \"/tmp/kc\"\n").unwrap();
    assert_eq!(config.general.kubeconfig, Some(PathBuf::from("/tmp/kc")));
    assert_eq!(config.general.backup_retention, 5);
}

#[test]
fn layering_folds_kebab_case_keys() {
    let config = AppConfig::layered("[general]\nbackup-retention = 8\n").unwrap();
    assert_eq!(config.general.backup_retention, 8);
}

#[test]
fn layering_rejects_wrong_types() {
    assert!(AppConfig::layered("[cluster]\ntimeout_secs = \"soon\"\n").is_err());
}

#[test]
fn empty_user_config_keeps_defaults() {
    assert_eq!(AppConfig::layered("").unwrap(), AppConfig::default());
}

#[test]
fn zero_values_are_clamped() {
    let mut config = AppConfig::default();
    config.general.backup_retention = 0;
    config.cluster.timeout_secs = 0;
    assert_eq!(config.backup_retention(), 1);
    assert_eq!(config.cluster.timeout(), Duration::from_secs(1));
}

#[test]
fn load_from_reads_user_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[general]\nbackup_retention = 2\n").unwrap();

    let config = AppConfig::load_from(&path).unwrap();
    assert_eq!(config.general.backup_retention, 2);
    assert_eq!(config.cluster.timeout_secs, 5);
}

#[test]
fn load_from_rejects_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[general\nbackup_retention = ").unwrap();
    assert!(AppConfig::load_from(&path).is_err());
}

#[test]
fn load_from_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(AppConfig::load_from(&dir.path().join("absent.toml")).is_err());
}

#[test]
fn default_path_ends_in_app_dir() {
    let path = AppConfig::default_path();
    assert!(path.ends_with("kontext/config.toml"));
}
