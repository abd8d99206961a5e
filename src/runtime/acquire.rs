//! Runtime acquisition: system Node.js, cached download, or fresh download.
//!
//! Downloads land in `<home>/.runtime_cache/<dir_name>`, where `dir_name` is
//! the top-level directory of the published archive (for example
//! `node-v18.17.0-linux-x64`). The archive is verified against the
//! `SHASUMS256.txt` published next to it, extracted into a staging directory
//! inside the cache and renamed into place, so a reader never sees a
//! half-extracted runtime at the final path.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client, Response};
use tempfile::{NamedTempFile, TempDir};

use crate::core::errors::ToolchainError;
use crate::core::platform::{DownloadSpec, PlatformKey, PlatformResolver};
use crate::core::request::Invocation;
use crate::runtime::archive::extract_archive;
use crate::runtime::RuntimeHandle;
use crate::util::context::GlobalContext;
use crate::util::fs::{ensure_dir, remove_dir_all_if_exists, set_executable};
use crate::util::hash::{lookup_checksum, sha256_file};
use crate::util::process::{find_executable, ProcessBuilder};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Provides a usable Node.js runtime for a lifecycle session.
///
/// Holds the cache location and the "notice already logged" flag for the
/// session; create one per process (or per embedding) and reuse it.
#[derive(Debug)]
pub struct RuntimeAcquirer {
    cache_root: PathBuf,
    resolver: PlatformResolver,
    runtime_command: String,
    invocation: Invocation,
    notice_logged: bool,
}

impl RuntimeAcquirer {
    /// Acquirer caching downloads under `cache_root` for the host platform.
    pub fn new(cache_root: impl Into<PathBuf>, invocation: Invocation) -> Self {
        RuntimeAcquirer {
            cache_root: cache_root.into(),
            resolver: PlatformResolver::host(),
            runtime_command: "node".to_string(),
            invocation,
            notice_logged: false,
        }
    }

    /// Acquirer using the context's runtime cache and distribution mirror.
    pub fn from_context(ctx: &GlobalContext, invocation: Invocation) -> Self {
        Self::new(ctx.runtime_cache_dir(), invocation).with_resolver(PlatformResolver::new(
            PlatformKey::host().clone(),
            ctx.node_mirror(),
        ))
    }

    pub fn with_resolver(mut self, resolver: PlatformResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Name of the runtime looked up on PATH (default `node`).
    pub fn with_runtime_command(mut self, command: impl Into<String>) -> Self {
        self.runtime_command = command.into();
        self
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn platform(&self) -> &PlatformKey {
        self.resolver.platform()
    }

    pub fn invocation(&self) -> Invocation {
        self.invocation
    }

    /// Query the runtime on PATH for its version.
    ///
    /// Returns `(false, "")` when it is absent or does not answer; this is
    /// never an error.
    pub fn check_available(&self) -> (bool, String) {
        let Some(runtime) = find_executable(&self.runtime_command) else {
            return (false, String::new());
        };

        match ProcessBuilder::new(&runtime).arg("--version").exec() {
            Ok(output) if output.success() => (true, output.stdout.trim().to_string()),
            Ok(output) => {
                tracing::debug!(
                    "`{} --version` exited with {:?}",
                    runtime.display(),
                    output.code
                );
                (false, String::new())
            }
            Err(e) => {
                tracing::debug!("failed to query {}: {:#}", runtime.display(), e);
                (false, String::new())
            }
        }
    }

    /// Path the executable for `spec` occupies once cached.
    pub fn cached_executable(&self, spec: &DownloadSpec) -> PathBuf {
        self.cache_root.join(&spec.dir_name).join(&spec.executable)
    }

    /// Return a runtime, downloading one if allowed and needed.
    ///
    /// A runtime on PATH always wins, even when `download` is set.
    pub fn ensure(
        &mut self,
        download: bool,
        version: &str,
    ) -> Result<RuntimeHandle, ToolchainError> {
        let (available, found) = self.check_available();
        if available {
            self.notice_once(|| format!("Using system Node.js {}", found));
            return Ok(RuntimeHandle::System);
        }

        if !download {
            return Err(ToolchainError::runtime_missing(self.invocation));
        }

        // Resolve before touching the filesystem
        let spec = self.resolver.resolve(version)?;
        let executable = self.cached_executable(&spec);

        if executable.is_file() {
            set_executable(&executable)?;
            self.notice_once(|| format!("Using cached Node.js at {}", executable.display()));
            return Ok(RuntimeHandle::Downloaded(executable));
        }

        let executable = self.download(&spec)?;
        self.notice_logged = true;
        Ok(RuntimeHandle::Downloaded(executable))
    }

    fn notice_once(&mut self, message: impl FnOnce() -> String) {
        if !self.notice_logged {
            tracing::info!("{}", message());
            self.notice_logged = true;
        }
    }

    fn download(&self, spec: &DownloadSpec) -> Result<PathBuf, ToolchainError> {
        ensure_dir(&self.cache_root)?;

        tracing::info!(
            "Downloading Node.js v{} for {} from {}",
            spec.version,
            spec.platform,
            spec.url
        );

        let client = Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| ToolchainError::download_failed(&spec.url, e))?;

        let listing = fetch(&client, &spec.checksums_url)?
            .text()
            .map_err(|e| ToolchainError::download_failed(&spec.checksums_url, e))?;
        let expected = lookup_checksum(&listing, &spec.archive_name)
            .ok_or_else(|| {
                ToolchainError::download_failed(
                    &spec.url,
                    format!("{} is not listed in {}", spec.archive_name, spec.checksums_url),
                )
            })?
            .to_ascii_lowercase();

        let mut archive = NamedTempFile::new_in(&self.cache_root).with_context(|| {
            format!("failed to create temp file in {}", self.cache_root.display())
        })?;
        self.fetch_archive(&client, spec, archive.as_file_mut())?;

        let actual = sha256_file(archive.path())?;
        if actual != expected {
            return Err(ToolchainError::download_failed(
                &spec.url,
                format!("checksum mismatch: expected {}, got {}", expected, actual),
            ));
        }
        tracing::debug!("Archive checksum verified: {}", &actual[..16]);

        let staging = TempDir::new_in(&self.cache_root).with_context(|| {
            format!("failed to create staging directory in {}", self.cache_root.display())
        })?;
        extract_archive(archive.path(), spec.format, staging.path())?;
        archive
            .close()
            .context("failed to delete downloaded archive")?;

        let target = self.cache_root.join(&spec.dir_name);
        let executable = target.join(&spec.executable);

        // A directory without the executable is left over from an older, broken layout
        if target.exists() && !executable.is_file() {
            remove_dir_all_if_exists(&target)?;
        }

        let extracted = staging.path().join(&spec.dir_name);
        if let Err(e) = fs::rename(&extracted, &target) {
            if executable.is_file() {
                tracing::debug!(
                    "{} was populated concurrently, using existing copy",
                    target.display()
                );
            } else {
                return Err(anyhow::Error::new(e)
                    .context(format!(
                        "failed to move {} into {}",
                        extracted.display(),
                        target.display()
                    ))
                    .into());
            }
        }

        if !executable.is_file() {
            return Err(ToolchainError::download_failed(
                &spec.url,
                format!("archive does not contain {}", spec.executable.display()),
            ));
        }
        set_executable(&executable)?;

        tracing::info!("Installed Node.js v{} to {}", spec.version, target.display());
        Ok(executable)
    }

    fn fetch_archive(
        &self,
        client: &Client,
        spec: &DownloadSpec,
        dest: &mut fs::File,
    ) -> Result<(), ToolchainError> {
        let mut response = fetch(client, &spec.url)?;

        let pb = if self.invocation.is_cli() {
            progress_bar(response.content_length(), &spec.archive_name)
        } else {
            ProgressBar::hidden()
        };

        let mut writer = pb.wrap_write(dest);
        response
            .copy_to(&mut writer)
            .map_err(|e| ToolchainError::download_failed(&spec.url, e))?;
        writer
            .flush()
            .map_err(|e| ToolchainError::download_failed(&spec.url, e))?;
        pb.finish_and_clear();

        Ok(())
    }
}

fn fetch(client: &Client, url: &str) -> Result<Response, ToolchainError> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| ToolchainError::download_failed(url, e))?;

    if !response.status().is_success() {
        return Err(ToolchainError::download_failed(
            url,
            format!("HTTP {}", response.status()),
        ));
    }

    Ok(response)
}

fn progress_bar(total: Option<u64>, message: &str) -> ProgressBar {
    let Some(total) = total else {
        return ProgressBar::hidden();
    };

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}
