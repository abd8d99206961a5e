//! Embedded orchestration: build on startup and serve the result.
//!
//! A host application calls [`ensure_built`] from its startup hook and
//! [`serve_stylesheet`] from the route serving the generated file. Neither
//! ever fails the host: build problems are logged as warnings and the
//! application keeps running without the stylesheet.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::errors::ToolchainError;
use crate::core::request::BuildRequest;
use crate::ops::gate::should_skip;
use crate::ops::toolchain::{BuildResult, ToolchainCommand};
use crate::runtime::{ExecutablePaths, RuntimeAcquirer};
use crate::util::fs::ensure_dir;
use crate::util::process::{CommandRunner, SystemRunner};

/// Build the stylesheet for `request` unless a fresh one exists.
pub fn ensure_built(request: &BuildRequest, acquirer: &mut RuntimeAcquirer) -> BuildResult {
    ensure_built_with(request, acquirer, SystemRunner)
}

/// [`ensure_built`] with an explicit subprocess runner.
pub fn ensure_built_with(
    request: &BuildRequest,
    acquirer: &mut RuntimeAcquirer,
    runner: impl CommandRunner + 'static,
) -> BuildResult {
    let output = request.output_path();

    match run(request, acquirer, runner) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("Failed to build Tailwind CSS: {}", e);
            let stderr = e.stderr().map(str::to_string).unwrap_or_else(|| e.to_string());
            BuildResult::failed(output, stderr)
        }
    }
}

fn run(
    request: &BuildRequest,
    acquirer: &mut RuntimeAcquirer,
    runner: impl CommandRunner + 'static,
) -> Result<BuildResult, ToolchainError> {
    let output = request.output_path();
    if let Some(parent) = output.parent() {
        ensure_dir(parent)?;
    }

    if should_skip(&output, request.skip_threshold, request.skip_if_recent) {
        tracing::info!(
            "Skipping Tailwind CSS build, {} is less than {}s old",
            output.display(),
            request.skip_threshold.as_secs()
        );
        return Ok(BuildResult::skipped(output));
    }

    let handle = acquirer.ensure(request.download_runtime, &request.runtime_version)?;
    let paths = ExecutablePaths::resolve(&handle, acquirer.platform());
    let mut command = ToolchainCommand::new(request.clone(), paths).with_runner(runner);

    run_build(&mut command, request.clean_after)
}

/// Run init, install and build, then clean if `clean_after` is set.
///
/// Cleaning happens even when a stage failed; the first failure is
/// returned.
pub fn run_build(
    command: &mut ToolchainCommand,
    clean_after: bool,
) -> Result<BuildResult, ToolchainError> {
    let result = drive(command);

    if clean_after {
        command.clean();
    }

    result
}

fn drive(command: &mut ToolchainCommand) -> Result<BuildResult, ToolchainError> {
    command.init()?;
    command.install()?;
    command.build()
}

/// Response for a request of the generated stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetResponse {
    Found(Vec<u8>),
    NotFound,
}

impl StylesheetResponse {
    /// HTTP status code.
    pub fn status(&self) -> u16 {
        match self {
            StylesheetResponse::Found(_) => 200,
            StylesheetResponse::NotFound => 404,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            StylesheetResponse::Found(_) => "text/css",
            StylesheetResponse::NotFound => "text/plain; charset=utf-8",
        }
    }

    pub fn body(&self) -> &[u8] {
        match self {
            StylesheetResponse::Found(body) => body,
            StylesheetResponse::NotFound => b"CSS file not found",
        }
    }
}

/// Read the generated stylesheet for serving.
///
/// A missing file is a 404, not an error.
pub fn serve_stylesheet(path: &Path) -> Result<StylesheetResponse> {
    match fs::read(path) {
        Ok(body) => Ok(StylesheetResponse::Found(body)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StylesheetResponse::NotFound),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}
