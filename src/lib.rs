//! tailwindctl - Provision Node.js and drive the Tailwind CSS build lifecycle
//!
//! This crate provides the core library functionality for tailwindctl,
//! including runtime acquisition, executable resolution, scaffolding and
//! the init/install/build/watch/clean lifecycle.

pub mod core;
pub mod ops;
pub mod runtime;
pub mod util;

/// Test utilities and mocks for tailwindctl unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording command runner so lifecycle
/// stages can be exercised without spawning npm.
#[cfg(test)]
pub mod test_support;

pub use core::{
    errors::ToolchainError,
    platform::{PlatformKey, PlatformResolver},
    request::{BuildRequest, Invocation},
    theme::{ThemeMap, ThemeValue},
    version::ToolchainVersion,
};

pub use ops::ensure::{ensure_built, serve_stylesheet, StylesheetResponse};
pub use ops::toolchain::{BuildResult, CleanReport, LifecycleStage, ToolchainCommand, WatchOutcome};
pub use runtime::{ExecutablePaths, RuntimeAcquirer, RuntimeHandle};
pub use util::context::GlobalContext;
