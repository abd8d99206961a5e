//! Configuration file support for tailwindctl.
//!
//! tailwindctl supports two configuration file locations:
//! - Global: `<tool home>/config.toml` - User-wide defaults
//! - Project: `tailwindctl.toml` in the working directory
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "tailwindctl.toml";

/// tailwindctl configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Node.js runtime settings
    pub runtime: RuntimeConfig,

    /// Theme extension written into a generated `tailwind.config.js`
    pub theme: Option<toml::Table>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Glob patterns scanned for class names
    pub content: Option<Vec<String>>,

    /// Input stylesheet path
    pub input_css: Option<PathBuf>,

    /// Output stylesheet path
    pub output_css: Option<PathBuf>,

    /// Tailwind config path
    pub config_js: Option<PathBuf>,

    /// Tailwind CSS version ("3", "4", or a full version)
    pub tailwind_version: Option<String>,

    /// Remove generated files after a build
    pub clean_after: Option<bool>,

    /// Skip builds when the output is recent
    pub skip_if_recent: Option<bool>,

    /// Staleness threshold in seconds
    pub skip_threshold_secs: Option<u64>,
}

/// Node.js runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Download Node.js if it is not on PATH
    pub download: Option<bool>,

    /// Node.js version to download
    pub node_version: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Build settings
        if other.build.content.is_some() {
            self.build.content = other.build.content;
        }
        if other.build.input_css.is_some() {
            self.build.input_css = other.build.input_css;
        }
        if other.build.output_css.is_some() {
            self.build.output_css = other.build.output_css;
        }
        if other.build.config_js.is_some() {
            self.build.config_js = other.build.config_js;
        }
        if other.build.tailwind_version.is_some() {
            self.build.tailwind_version = other.build.tailwind_version;
        }
        if other.build.clean_after.is_some() {
            self.build.clean_after = other.build.clean_after;
        }
        if other.build.skip_if_recent.is_some() {
            self.build.skip_if_recent = other.build.skip_if_recent;
        }
        if other.build.skip_threshold_secs.is_some() {
            self.build.skip_threshold_secs = other.build.skip_threshold_secs;
        }

        // Runtime settings
        if other.runtime.download.is_some() {
            self.runtime.download = other.runtime.download;
        }
        if other.runtime.node_version.is_some() {
            self.runtime.node_version = other.runtime.node_version;
        }

        if other.theme.is_some() {
            self.theme = other.theme;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`tailwindctl.toml`)
/// 2. Global config (`<tool home>/config.toml`)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(
            &path,
            r##"
[build]
content = ["app/**/*.py", "templates/**/*.html"]
tailwind_version = "4"
skip_threshold_secs = 10

[runtime]
download = true

[theme.colors]
brand = "#3b82f6"
"##,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.build.content.as_ref().map(Vec::len), Some(2));
        assert_eq!(config.build.tailwind_version.as_deref(), Some("4"));
        assert_eq!(config.build.skip_threshold_secs, Some(10));
        assert_eq!(config.runtime.download, Some(true));
        assert!(config.theme.unwrap().contains_key("colors"));
    }

    #[test]
    fn test_load_or_default_on_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(&path, "[build\ncontent = ").unwrap();

        let config = Config::load_or_default(&path);
        assert!(config.build.content.is_none());
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("config.toml");
        let project = tmp.path().join(PROJECT_CONFIG_FILE);

        std::fs::write(
            &global,
            "[runtime]\ndownload = true\nnode_version = \"20.11.1\"\n",
        )
        .unwrap();
        std::fs::write(&project, "[runtime]\nnode_version = \"18.19.0\"\n").unwrap();

        let config = load_config(&global, &project);
        assert_eq!(config.runtime.download, Some(true));
        assert_eq!(config.runtime.node_version.as_deref(), Some("18.19.0"));
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("nope.toml"), &tmp.path().join("nada.toml"));
        assert!(config.build.content.is_none());
        assert!(config.theme.is_none());
    }
}
