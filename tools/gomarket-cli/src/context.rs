//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use gomarket_cart::CartManager;
use gomarket_store::{Cache, FileStore};

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched for, in order, in each directory.
const CONFIG_NAMES: [&str; 3] = ["gomarket.toml", ".gomarket.toml", "gomarket.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            find_config(&cwd)
                .map(|path| CliConfig::load(&path.to_string_lossy()))
                .transpose()?
                .unwrap_or_default()
        };

        Ok(Self { config, output, cwd })
    }

    /// Directory of the file store.
    pub fn data_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.store.data_dir)
    }

    /// Open the cart over the configured file store and wait for it to load.
    pub async fn open_cart(&self) -> Result<CartManager> {
        let data_dir = self.data_dir();
        self.output
            .debug(&format!("Using store at {}", data_dir.display()));

        let store = FileStore::open(&data_dir)
            .await
            .with_context(|| format!("Failed to open store at {}", data_dir.display()))?;
        let cart = CartManager::open(Cache::new(store), &self.config.cart)
            .await
            .context("Failed to load cart")?;
        Ok(cart)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find a config file in the directory tree above `start`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
