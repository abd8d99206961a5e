//! Build request: the configuration bundle for one invocation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::theme::ThemeMap;
use crate::core::version::ToolchainVersion;
use crate::util::config::Config;

/// Node.js version downloaded when no version is configured.
pub const DEFAULT_NODE_VERSION: &str = "18.17.0";

/// Default staleness threshold for skipping rebuilds.
pub const DEFAULT_SKIP_THRESHOLD: Duration = Duration::from_secs(5);

/// Who is driving the lifecycle.
///
/// The interactive CLI gets step-by-step progress output; an embedding host
/// gets only start/finish/failure lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Invocation {
    #[default]
    Cli,
    Embedded,
}

impl Invocation {
    pub fn is_cli(&self) -> bool {
        matches!(self, Invocation::Cli)
    }
}

/// Everything one build invocation needs. Read-only once constructed.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Glob patterns Tailwind scans for class names
    pub content: Vec<String>,

    /// Input stylesheet
    pub input_css: PathBuf,

    /// Compiled stylesheet
    pub output_css: PathBuf,

    /// Generated `tailwind.config.js`
    pub config_js: PathBuf,

    /// Directory holding package.json and node_modules; relative paths
    /// above are resolved against it
    pub working_dir: PathBuf,

    /// Theme extension written into the generated config
    pub theme: ThemeMap,

    /// Tailwind CSS release
    pub tailwind_version: ToolchainVersion,

    /// Remove scaffolding and node_modules after a build
    pub clean_after: bool,

    /// Skip the build when the output is newer than `skip_threshold`
    pub skip_if_recent: bool,

    /// Staleness threshold for `skip_if_recent`
    pub skip_threshold: Duration,

    /// Download Node.js when it is not on PATH
    pub download_runtime: bool,

    /// Node.js version to download
    pub runtime_version: String,

    /// CLI or embedded context
    pub invocation: Invocation,
}

impl BuildRequest {
    /// Request with the CLI defaults, rooted at `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        BuildRequest {
            content: vec!["**/*.py".to_string()],
            input_css: PathBuf::from("./.tailwind/tailwind_input.css"),
            output_css: PathBuf::from("./.tailwind/tailwind.css"),
            config_js: PathBuf::from("./.tailwind/tailwind.config.js"),
            working_dir: working_dir.into(),
            theme: ThemeMap::new(),
            tailwind_version: ToolchainVersion::default(),
            clean_after: false,
            skip_if_recent: false,
            skip_threshold: DEFAULT_SKIP_THRESHOLD,
            download_runtime: false,
            runtime_version: DEFAULT_NODE_VERSION.to_string(),
            invocation: Invocation::Cli,
        }
    }

    /// Request with the defaults an embedding host uses: files next to the
    /// application, output under `assets/`, cleanup and freshness skip on.
    pub fn embedded(working_dir: impl Into<PathBuf>) -> Self {
        BuildRequest {
            input_css: PathBuf::from("tailwind_input.css"),
            output_css: PathBuf::from("assets/tailwind.css"),
            config_js: PathBuf::from("tailwind.config.js"),
            clean_after: true,
            skip_if_recent: true,
            invocation: Invocation::Embedded,
            ..Self::new(working_dir)
        }
    }

    /// Apply values from a loaded config file over the current values.
    pub fn with_config(mut self, config: &Config) -> Self {
        let build = &config.build;
        if let Some(ref content) = build.content {
            self.content = content.clone();
        }
        if let Some(ref path) = build.input_css {
            self.input_css = path.clone();
        }
        if let Some(ref path) = build.output_css {
            self.output_css = path.clone();
        }
        if let Some(ref path) = build.config_js {
            self.config_js = path.clone();
        }
        if let Some(ref version) = build.tailwind_version {
            match version.parse() {
                Ok(version) => self.tailwind_version = version,
                Err(e) => tracing::warn!("Ignoring `tailwind_version` from config: {}", e),
            }
        }
        if let Some(clean_after) = build.clean_after {
            self.clean_after = clean_after;
        }
        if let Some(skip) = build.skip_if_recent {
            self.skip_if_recent = skip;
        }
        if let Some(secs) = build.skip_threshold_secs {
            self.skip_threshold = Duration::from_secs(secs);
        }
        if let Some(download) = config.runtime.download {
            self.download_runtime = download;
        }
        if let Some(ref version) = config.runtime.node_version {
            self.runtime_version = version.clone();
        }
        if let Some(ref theme) = config.theme {
            self.theme = ThemeMap::from_toml(theme);
        }
        self
    }

    /// Resolve a request path against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    pub fn input_path(&self) -> PathBuf {
        self.resolve(&self.input_css)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_css)
    }

    pub fn config_path(&self) -> PathBuf {
        self.resolve(&self.config_js)
    }

    /// `package.json` in the working directory.
    pub fn manifest_path(&self) -> PathBuf {
        self.working_dir.join("package.json")
    }

    /// `package-lock.json` in the working directory.
    pub fn lockfile_path(&self) -> PathBuf {
        self.working_dir.join("package-lock.json")
    }

    /// `node_modules` in the working directory.
    pub fn modules_dir(&self) -> PathBuf {
        self.working_dir.join("node_modules")
    }
}
