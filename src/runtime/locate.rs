//! Locating `npm` and `npx` for a runtime.

use std::path::{Path, PathBuf};

use crate::core::platform::PlatformKey;
use crate::runtime::RuntimeHandle;
use crate::util::process::ProcessBuilder;

/// Name a tool is invoked by on `platform` (`npm.cmd` on Windows).
pub fn command_alias(tool: &str, platform: &PlatformKey) -> String {
    if platform.is_windows() {
        format!("{}.cmd", tool)
    } else {
        tool.to_string()
    }
}

/// Resolve the path of a companion tool shipped with the runtime.
///
/// For the system runtime this is the bare alias, looked up on PATH when
/// invoked. For a downloaded runtime the directory holding the executable
/// is probed first, then its `bin/` subdirectory; if neither exists the
/// first candidate is returned so the caller can still run it through the
/// runtime.
pub fn resolve(handle: &RuntimeHandle, tool: &str, platform: &PlatformKey) -> PathBuf {
    let alias = command_alias(tool, platform);

    let Some(dir) = handle.bin_dir() else {
        return PathBuf::from(alias);
    };

    let sibling = dir.join(&alias);
    if sibling.exists() {
        return sibling;
    }

    let nested = dir.join("bin").join(&alias);
    if nested.exists() {
        return nested;
    }

    sibling
}

/// Resolved runtime, package manager and package runner for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutablePaths {
    /// Downloaded runtime executable; `None` when using PATH
    pub runtime: Option<PathBuf>,
    /// Package manager (`npm`)
    pub npm: PathBuf,
    /// Package runner (`npx`)
    pub npx: PathBuf,
}

impl ExecutablePaths {
    pub fn resolve(handle: &RuntimeHandle, platform: &PlatformKey) -> Self {
        ExecutablePaths {
            runtime: handle.executable().map(Path::to_path_buf),
            npm: resolve(handle, "npm", platform),
            npx: resolve(handle, "npx", platform),
        }
    }

    /// Paths for the runtime on PATH.
    pub fn system(platform: &PlatformKey) -> Self {
        Self::resolve(&RuntimeHandle::System, platform)
    }

    /// Build the invocation of `companion`.
    ///
    /// With a downloaded runtime whose companion is missing on disk, the
    /// companion is run as a script through the runtime executable. The
    /// runtime's directory is put first on PATH either way.
    pub fn command(&self, companion: &Path) -> ProcessBuilder {
        let Some(ref runtime) = self.runtime else {
            return ProcessBuilder::new(companion);
        };

        let cmd = if companion.exists() {
            ProcessBuilder::new(companion)
        } else {
            ProcessBuilder::new(runtime).arg(companion)
        };

        match runtime.parent() {
            Some(dir) => cmd.prepend_path(dir),
            None => cmd,
        }
    }

    pub fn npm_command(&self) -> ProcessBuilder {
        self.command(&self.npm)
    }

    pub fn npx_command(&self) -> ProcessBuilder {
        self.command(&self.npx)
    }
}
