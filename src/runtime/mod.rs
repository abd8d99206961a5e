//! Node.js runtime provisioning.
//!
//! A runtime is either the `node` already on PATH or a private copy
//! downloaded into the tool's cache. The companion `npm`/`npx` executables
//! are located relative to whichever runtime was selected.

pub mod acquire;
pub mod archive;
pub mod locate;

use std::path::{Path, PathBuf};

pub use acquire::RuntimeAcquirer;
pub use locate::ExecutablePaths;

/// The runtime a lifecycle session runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeHandle {
    /// Rely on PATH lookup at invocation time.
    System,
    /// Absolute path to a cached `node` executable.
    Downloaded(PathBuf),
}

impl RuntimeHandle {
    pub fn is_system(&self) -> bool {
        matches!(self, RuntimeHandle::System)
    }

    /// Path to the runtime executable, if one was downloaded.
    pub fn executable(&self) -> Option<&Path> {
        match self {
            RuntimeHandle::System => None,
            RuntimeHandle::Downloaded(path) => Some(path),
        }
    }

    /// Directory containing the downloaded runtime executable.
    pub fn bin_dir(&self) -> Option<&Path> {
        self.executable().and_then(Path::parent)
    }
}
