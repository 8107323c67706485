use std::env;
use std::fs;

use docgate::config::{ENV_ADMINISTRATOR, ENV_BIND, ENV_CAPABILITY_POLICY};
use docgate::{load_config, AccessCore, CapabilityPolicy, Config, Seed};
use serial_test::serial;
use tempfile::tempdir;

fn clear_env() {
    env::remove_var(ENV_ADMINISTRATOR);
    env::remove_var(ENV_BIND);
    env::remove_var(ENV_CAPABILITY_POLICY);
}

#[tokio::test]
#[serial]
async fn missing_file_yields_defaults() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let loaded = load_config(Some(&path)).await.unwrap();
    assert_eq!(loaded.config, Config::default());
    assert_eq!(loaded.path, path);
}

#[tokio::test]
#[serial]
async fn yaml_file_is_read() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("docgate.yaml");
    fs::write(
        &path,
        "administrator: root\ncapability_policy: reject\nserver:\n  bind: 0.0.0.0:9000\n",
    )
    .unwrap();

    let config = load_config(Some(&path)).await.unwrap().config;
    assert_eq!(config.administrator, "root");
    assert_eq!(config.capability_policy, CapabilityPolicy::Reject);
    assert_eq!(config.server.bind, "0.0.0.0:9000");
    assert_eq!(config.audit_channel_capacity, 128);
}

#[tokio::test]
#[serial]
async fn environment_overrides_file() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("docgate.yaml");
    fs::write(&path, "administrator: root\n").unwrap();
    env::set_var(ENV_ADMINISTRATOR, "superuser");
    env::set_var(ENV_CAPABILITY_POLICY, "REJECT");
    env::set_var(ENV_BIND, "127.0.0.1:7070");

    let config = load_config(Some(&path)).await.unwrap().config;
    clear_env();
    assert_eq!(config.administrator, "superuser");
    assert_eq!(config.capability_policy, CapabilityPolicy::Reject);
    assert_eq!(config.server.bind, "127.0.0.1:7070");
}

#[tokio::test]
#[serial]
async fn invalid_policy_override_is_ignored() {
    clear_env();
    env::set_var(ENV_CAPABILITY_POLICY, "sometimes");
    let dir = tempdir().unwrap();
    let config = load_config(Some(&dir.path().join("none.yaml")))
        .await
        .unwrap()
        .config;
    clear_env();
    assert_eq!(config.capability_policy, CapabilityPolicy::Normalize);
}

#[tokio::test]
#[serial]
async fn malformed_file_is_an_error() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "administrator: [unterminated\n").unwrap();
    assert!(load_config(Some(&path)).await.is_err());
}

#[test]
#[serial]
fn reject_policy_from_config_reaches_engine() {
    let config = Config {
        capability_policy: CapabilityPolicy::Reject,
        ..Config::default()
    };
    let core = AccessCore::from_config(&config);
    assert_eq!(core.capability_policy(), CapabilityPolicy::Reject);

    let seed = Seed::parse(
        r#"
users: [{ id: dana }]
departments:
  - code: OPS
    name: Operations
    sub_departments: [{ code: PLT, name: Plant }]
allocations:
  - { user: dana, department: OPS, sub_department: PLT, capabilities: [print] }
"#,
    )
    .unwrap();
    let err = core.apply_seed(&seed).unwrap_err();
    assert_eq!(err.kind(), docgate::ErrorKind::InvalidCapabilitySet);
}

#[test]
fn seed_files_load_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seed.json");
    fs::write(
        &path,
        r#"{"departments":[{"code":"HR","name":"People","sub_departments":[{"code":"PAY","name":"Payroll"}]}]}"#,
    )
    .unwrap();
    let seed = Seed::from_path(&path).unwrap();
    let core = AccessCore::new(docgate::AdministratorPolicy::new("root"));
    let report = core.apply_seed(&seed).unwrap();
    assert_eq!(report.sub_departments, 1);
    assert_eq!(core.administrator().as_str(), "root");
}
