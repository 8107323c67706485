use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use docgate::{AccessCore, Config, Seed};
use tracing::info;

pub struct CliContext {
    config: Config,
    config_path: PathBuf,
    core: Arc<AccessCore>,
}

impl CliContext {
    /// Build the core and apply configured seeds followed by `extra_seeds`.
    pub fn new(config: Config, config_path: PathBuf, extra_seeds: &[PathBuf]) -> Result<Self> {
        let core = AccessCore::from_config(&config);
        for path in config.seed_paths.iter().chain(extra_seeds) {
            apply_seed_file(&core, path)?;
        }
        Ok(Self {
            config,
            config_path,
            core: Arc::new(core),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn core(&self) -> &AccessCore {
        &self.core
    }

    pub fn shared_core(&self) -> Arc<AccessCore> {
        Arc::clone(&self.core)
    }
}

fn apply_seed_file(core: &AccessCore, path: &Path) -> Result<()> {
    let seed = Seed::from_path(path)?;
    let report = core
        .apply_seed(&seed)
        .with_context(|| format!("Failed to apply seed {}", path.display()))?;
    info!(path = %path.display(), ?report, "seed loaded");
    Ok(())
}
