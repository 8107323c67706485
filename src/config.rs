//! Runtime configuration.
//!
//! Lookup order: an explicit path, `./config/docgate.yaml`, then
//! `<config_dir>/docgate/config.yaml`. A missing file yields defaults.
//! `DOCGATE_*` environment variables override whatever the file says.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docgate_allocation_engine::CapabilityPolicy;
use docgate_core_types::AdministratorPolicy;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

pub const ENV_ADMINISTRATOR: &str = "DOCGATE_ADMINISTRATOR";
pub const ENV_BIND: &str = "DOCGATE_BIND";
pub const ENV_CAPABILITY_POLICY: &str = "DOCGATE_CAPABILITY_POLICY";

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_AUDIT_CAPACITY: usize = 128;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Identity exempt from allocation and granted everything.
    pub administrator: String,
    pub capability_policy: CapabilityPolicy,
    /// Seed files applied at startup, in order.
    pub seed_paths: Vec<PathBuf>,
    pub server: ServerConfig,
    pub audit_channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            administrator: AdministratorPolicy::DEFAULT_ADMINISTRATOR.to_string(),
            capability_policy: CapabilityPolicy::default(),
            seed_paths: Vec::new(),
            server: ServerConfig::default(),
            audit_channel_capacity: DEFAULT_AUDIT_CAPACITY,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Config {
    pub fn administrator_policy(&self) -> AdministratorPolicy {
        AdministratorPolicy::new(self.administrator.as_str())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(admin) = env::var(ENV_ADMINISTRATOR) {
            let admin = admin.trim();
            if admin.is_empty() {
                warn!("{ENV_ADMINISTRATOR} is empty; keeping '{}'", self.administrator);
            } else {
                self.administrator = admin.to_string();
                info!(administrator = %self.administrator, "administrator overridden from environment");
            }
        }

        if let Ok(bind) = env::var(ENV_BIND) {
            if !bind.trim().is_empty() {
                self.server.bind = bind.trim().to_string();
            }
        }

        if let Ok(raw) = env::var(ENV_CAPABILITY_POLICY) {
            match parse_capability_policy(&raw) {
                Some(policy) => self.capability_policy = policy,
                None => warn!(value = %raw, "unknown {ENV_CAPABILITY_POLICY}; keeping configured policy"),
            }
        }
    }
}

fn parse_capability_policy(raw: &str) -> Option<CapabilityPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "normalize" => Some(CapabilityPolicy::Normalize),
        "reject" => Some(CapabilityPolicy::Reject),
        _ => None,
    }
}

pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
}

/// Where the configuration would be read from when no path is given.
pub fn default_config_path() -> Result<PathBuf> {
    let local_config = PathBuf::from("config/docgate.yaml");
    if local_config.exists() {
        return Ok(local_config);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("docgate");
    path.push("config.yaml");
    Ok(path)
}

pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    let mut config = if config_path.exists() {
        let config = read_config(&config_path).await?;
        info!("Loaded configuration from: {}", config_path.display());
        config
    } else {
        warn!(
            "Config file not found, using defaults: {}",
            config_path.display()
        );
        Config::default()
    };
    config.apply_env_overrides();

    Ok(LoadedConfig {
        config,
        path: config_path,
    })
}

async fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}
