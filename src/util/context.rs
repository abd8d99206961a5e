//! Global context for tailwindctl operations.
//!
//! Provides centralized access to the working directory, the tool home
//! (where downloaded runtimes are cached) and configuration paths.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use url::Url;

use crate::core::platform::DEFAULT_NODE_MIRROR;
use crate::util::config::{load_config, Config, PROJECT_CONFIG_FILE};

/// Overrides the tool home directory.
pub const HOME_ENV: &str = "TAILWINDCTL_HOME";

/// Overrides the Node.js distribution server.
pub const MIRROR_ENV: &str = "TAILWINDCTL_NODE_MIRROR";

/// Directory under the tool home holding downloaded runtimes.
pub const RUNTIME_CACHE_DIR: &str = ".runtime_cache";

/// Project directories for tailwindctl
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("dev", "tailwindctl", "tailwindctl"));

/// Global context containing paths and environment overrides.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for tailwindctl data
    home: PathBuf,

    /// Node.js distribution server
    node_mirror: String,
}

impl GlobalContext {
    /// Create a new GlobalContext from the process environment.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = match std::env::var_os(HOME_ENV) {
            Some(home) if !home.is_empty() => PathBuf::from(home),
            _ => match PROJECT_DIRS.as_ref() {
                Some(dirs) => dirs.cache_dir().to_path_buf(),
                None => cwd.join(".tailwindctl"),
            },
        };

        let node_mirror = std::env::var(MIRROR_ENV)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .and_then(|m| parse_mirror(&m))
            .unwrap_or_else(|| DEFAULT_NODE_MIRROR.to_string());

        Ok(GlobalContext {
            cwd,
            home,
            node_mirror,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Replace the tool home directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the tailwindctl home directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the Node.js distribution server.
    pub fn node_mirror(&self) -> &str {
        &self.node_mirror
    }

    /// Get the directory holding downloaded runtimes.
    pub fn runtime_cache_dir(&self) -> PathBuf {
        self.home.join(RUNTIME_CACHE_DIR)
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.cwd.join(PROJECT_CONFIG_FILE)
    }

    /// Load global + project configuration.
    pub fn load_config(&self) -> Config {
        load_config(&self.config_path(), &self.project_config_path())
    }
}

/// Accept only absolute http(s) mirror URLs.
fn parse_mirror(raw: &str) -> Option<String> {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Some(url.as_str().trim_end_matches('/').to_string())
        }
        Ok(url) => {
            tracing::warn!(
                "Ignoring {}: unsupported scheme `{}`",
                MIRROR_ENV,
                url.scheme()
            );
            None
        }
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", MIRROR_ENV, e);
            None
        }
    }
}
