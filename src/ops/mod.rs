//! High-level operations.
//!
//! This module contains the build lifecycle and the pieces it is made of.

pub mod ensure;
pub mod gate;
pub mod scaffold;
pub mod toolchain;

pub use ensure::{
    ensure_built, ensure_built_with, run_build, serve_stylesheet, StylesheetResponse,
};
pub use gate::should_skip;
pub use scaffold::{default_config, to_source_text, write_default_config, write_default_stylesheet};
pub use toolchain::{BuildResult, CleanReport, LifecycleStage, ToolchainCommand, WatchOutcome};
