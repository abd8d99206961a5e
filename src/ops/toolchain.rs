//! The Tailwind CSS build lifecycle.
//!
//! A [`ToolchainCommand`] drives one lifecycle session against a resolved
//! runtime: `init` scaffolds files and `package.json`, `install` adds the
//! Tailwind packages, `build` compiles the stylesheet once, `watch` keeps
//! the compiler running, and `clean` removes everything generated.

use std::path::PathBuf;

use crate::core::errors::ToolchainError;
use crate::core::request::BuildRequest;
use crate::core::version::ToolchainDescriptor;
use crate::ops::scaffold::{write_default_config, write_default_stylesheet};
use crate::runtime::ExecutablePaths;
use crate::util::fs::{glob_files, remove_path};
use crate::util::process::{CommandRunner, ProcessBuilder, SystemRunner};
use crate::util::signal::InterruptFlag;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStage {
    Uninitialized,
    Initialized,
    Installed,
    Built,
    /// Only while `watch` is blocking
    Watching,
    Cleaned,
}

/// Outcome of a build request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub success: bool,
    /// The existing output was fresh enough to reuse
    pub skipped: bool,
    /// Captured stderr or error message on failure
    pub stderr: Option<String>,
    /// The generated stylesheet
    pub output: PathBuf,
}

impl BuildResult {
    pub fn built(output: PathBuf) -> Self {
        BuildResult {
            success: true,
            skipped: false,
            stderr: None,
            output,
        }
    }

    pub fn skipped(output: PathBuf) -> Self {
        BuildResult {
            skipped: true,
            ..Self::built(output)
        }
    }

    pub fn failed(output: PathBuf, stderr: impl Into<String>) -> Self {
        BuildResult {
            success: false,
            skipped: false,
            stderr: Some(stderr.into()),
            output,
        }
    }
}

/// How a watch session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// Stopped by Ctrl-C
    Interrupted,
    /// The compiler exited on its own
    Exited(Option<i32>),
}

/// Per-item outcome of `clean`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Lifecycle driver for one project.
pub struct ToolchainCommand {
    request: BuildRequest,
    paths: ExecutablePaths,
    descriptor: ToolchainDescriptor,
    stage: LifecycleStage,
    runner: Box<dyn CommandRunner>,
}

impl ToolchainCommand {
    pub fn new(request: BuildRequest, paths: ExecutablePaths) -> Self {
        let descriptor = request.tailwind_version.descriptor();
        ToolchainCommand {
            request,
            paths,
            descriptor,
            stage: LifecycleStage::Uninitialized,
            runner: Box::new(SystemRunner),
        }
    }

    /// Replace the subprocess runner.
    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn stage(&self) -> LifecycleStage {
        self.stage
    }

    pub fn request(&self) -> &BuildRequest {
        &self.request
    }

    fn verbose(&self) -> bool {
        self.request.invocation.is_cli()
    }

    /// Create missing scaffold files and `package.json`.
    pub fn init(&mut self) -> Result<(), ToolchainError> {
        tracing::info!("Initializing Tailwind CSS...");

        let input = self.request.input_path();
        if write_default_stylesheet(&input, &self.request.tailwind_version)? {
            if self.verbose() {
                tracing::info!("Created default input CSS file at {}", input.display());
            }
        } else {
            tracing::debug!("Input CSS file {} exists, leaving it as is", input.display());
        }

        let config = self.request.config_path();
        if write_default_config(&config, &self.request.content, &self.request.theme)? {
            if self.verbose() {
                tracing::info!("Created default config file at {}", config.display());
            }
        } else {
            tracing::debug!("Config file {} exists, leaving it as is", config.display());
        }

        self.report_content_matches();

        if !self.request.manifest_path().exists() {
            let cmd = self.manifest_init_command();
            let output = self
                .runner
                .output(&cmd)
                .map_err(|e| ToolchainError::InitFailed {
                    stderr: format!("{:#}", e),
                })?;
            if !output.success() {
                return Err(ToolchainError::InitFailed {
                    stderr: output.stderr,
                });
            }
        }

        self.stage = LifecycleStage::Initialized;
        tracing::info!("Tailwind CSS initialized");
        Ok(())
    }

    fn report_content_matches(&self) {
        if self.request.content.is_empty() {
            return;
        }

        match glob_files(&self.request.working_dir, &self.request.content) {
            Ok(files) if files.is_empty() => tracing::warn!(
                "No files match content patterns {:?}; \
                 the stylesheet will only contain base styles",
                self.request.content
            ),
            Ok(files) => tracing::debug!("{} files match the content patterns", files.len()),
            Err(e) => tracing::warn!("Could not expand content patterns: {:#}", e),
        }
    }

    /// Install the Tailwind packages unless the CLI already runs.
    pub fn install(&mut self) -> Result<(), ToolchainError> {
        let packages = self.descriptor.packages.join(" ");
        tracing::info!("Installing {}...", packages);

        if self.is_installed() {
            tracing::debug!("`{}` is already available", self.descriptor.cli);
        } else {
            let cmd = self.install_command();
            let output = self
                .runner
                .output(&cmd)
                .map_err(|e| ToolchainError::InstallFailed {
                    packages: packages.clone(),
                    stderr: format!("{:#}", e),
                })?;
            if !output.success() {
                return Err(ToolchainError::InstallFailed {
                    packages,
                    stderr: output.stderr,
                });
            }
        }

        self.stage = LifecycleStage::Installed;
        tracing::info!("Tailwind CSS installed");
        Ok(())
    }

    fn is_installed(&self) -> bool {
        match self.runner.output(&self.probe_command()) {
            Ok(output) => output.success(),
            Err(e) => {
                tracing::debug!("install probe failed: {:#}", e);
                false
            }
        }
    }

    /// Compile the stylesheet once.
    ///
    /// On failure the previous output file is left as the compiler left it.
    pub fn build(&mut self) -> Result<BuildResult, ToolchainError> {
        let output_path = self.request.output_path();
        tracing::info!(
            "Building Tailwind CSS from {} to {}...",
            self.request.input_path().display(),
            output_path.display()
        );

        let output = self
            .runner
            .output(&self.build_command())
            .map_err(|e| ToolchainError::BuildFailed {
                stderr: format!("{:#}", e),
            })?;
        if !output.success() {
            return Err(ToolchainError::BuildFailed {
                stderr: output.stderr,
            });
        }

        self.stage = LifecycleStage::Built;
        tracing::info!("Tailwind CSS built to {}", output_path.display());
        Ok(BuildResult::built(output_path))
    }

    /// Run the compiler in watch mode until it exits or Ctrl-C arrives.
    pub fn watch(&mut self) -> Result<WatchOutcome, ToolchainError> {
        self.watch_with(InterruptFlag::install())
    }

    /// [`watch`](Self::watch) with an explicit interrupt flag.
    pub fn watch_with(
        &mut self,
        interrupt: InterruptFlag,
    ) -> Result<WatchOutcome, ToolchainError> {
        tracing::info!(
            "Watching for changes in {}...",
            self.request.input_path().display()
        );

        interrupt.clear();
        self.stage = LifecycleStage::Watching;
        let result = self.runner.attached(&self.watch_command());
        self.stage = LifecycleStage::Installed;

        // Exit without a code means the child died from a signal
        if interrupt.is_set() || matches!(result, Ok(None)) {
            tracing::info!("Watch stopped");
            return Ok(WatchOutcome::Interrupted);
        }

        match result {
            Ok(code) => {
                if code != Some(0) {
                    tracing::warn!("Tailwind CSS watcher exited with {:?}", code);
                }
                Ok(WatchOutcome::Exited(code))
            }
            Err(e) => Err(ToolchainError::WatchFailed {
                reason: format!("{:#}", e),
            }),
        }
    }

    /// Remove generated files; failures are logged and reported, not raised.
    pub fn clean(&mut self) -> CleanReport {
        tracing::info!("Cleaning up generated files...");

        let targets = [
            self.request.config_path(),
            self.request.manifest_path(),
            self.request.lockfile_path(),
            self.request.input_path(),
            self.request.modules_dir(),
        ];

        let mut report = CleanReport::default();
        for path in targets {
            match remove_path(&path) {
                Ok(true) => {
                    if self.verbose() {
                        tracing::info!("Removed {}", path.display());
                    }
                    report.removed.push(path);
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("Could not remove {}: {}", path.display(), e);
                    report.failed.push((path, e.to_string()));
                }
            }
        }

        self.stage = LifecycleStage::Cleaned;
        tracing::info!("Cleanup completed");
        report
    }

    /// `npm init -y`
    pub fn manifest_init_command(&self) -> ProcessBuilder {
        self.paths
            .npm_command()
            .args(["init", "-y"])
            .cwd(&self.request.working_dir)
    }

    /// `npx --no-install <cli> --help`
    pub fn probe_command(&self) -> ProcessBuilder {
        self.paths
            .npx_command()
            .args(["--no-install", self.descriptor.cli, "--help"])
            .cwd(&self.request.working_dir)
    }

    /// `npm install -D <packages>`
    pub fn install_command(&self) -> ProcessBuilder {
        self.paths
            .npm_command()
            .args(["install", "-D"])
            .args(&self.descriptor.packages)
            .cwd(&self.request.working_dir)
    }

    /// `npx <cli> -i <input> -o <output> -c <config>`
    pub fn build_command(&self) -> ProcessBuilder {
        self.paths
            .npx_command()
            .arg(self.descriptor.cli)
            .arg("-i")
            .arg(self.request.input_path())
            .arg("-o")
            .arg(self.request.output_path())
            .arg("-c")
            .arg(self.request.config_path())
            .cwd(&self.request.working_dir)
    }

    pub fn watch_command(&self) -> ProcessBuilder {
        self.build_command().arg("--watch")
    }
}
