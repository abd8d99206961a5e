//! Host platform detection and Node.js distribution naming.
//!
//! Maps the running operating system and CPU architecture to the archive
//! published on the Node.js distribution server and to the location of the
//! `node` executable inside the extracted archive.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::core::errors::ToolchainError;

/// Default Node.js distribution server.
pub const DEFAULT_NODE_MIRROR: &str = "https://nodejs.org/dist";

/// Platform of the current process, computed once.
static HOST_PLATFORM: LazyLock<PlatformKey> =
    LazyLock::new(|| PlatformKey::new(std::env::consts::OS, std::env::consts::ARCH));

/// Operating system and CPU architecture pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformKey {
    os: String,
    arch: String,
}

impl PlatformKey {
    /// Create a platform key from raw OS and architecture names.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        PlatformKey {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this process is running on.
    pub fn host() -> &'static PlatformKey {
        &HOST_PLATFORM
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Check if this is a Windows platform.
    pub fn is_windows(&self) -> bool {
        self.os.eq_ignore_ascii_case("windows")
    }

    /// Suffix appended to executable names (`.exe` on Windows).
    pub fn exe_suffix(&self) -> &'static str {
        if self.is_windows() {
            ".exe"
        } else {
            ""
        }
    }

    fn family(&self) -> Result<OsFamily, ToolchainError> {
        match self.os.to_ascii_lowercase().as_str() {
            "darwin" | "macos" => Ok(OsFamily::MacOs),
            "linux" => Ok(OsFamily::Linux),
            "windows" => Ok(OsFamily::Windows),
            _ => Err(ToolchainError::UnsupportedPlatform {
                os: self.os.clone(),
                arch: self.arch.clone(),
            }),
        }
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OsFamily {
    MacOs,
    Linux,
    Windows,
}

/// Archive format of a runtime distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    TarXz,
    Zip,
}

impl ArchiveFormat {
    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => ".tar.gz",
            ArchiveFormat::TarXz => ".tar.xz",
            ArchiveFormat::Zip => ".zip",
        }
    }
}

/// Everything needed to fetch and locate one runtime release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSpec {
    /// Platform the archive was selected for
    pub platform: PlatformKey,

    /// Runtime version without a leading `v` (e.g. "18.17.0")
    pub version: String,

    /// Full archive URL
    pub url: String,

    /// URL of the checksum list published next to the archive
    pub checksums_url: String,

    /// Archive file name (e.g. "node-v18.17.0-linux-x64.tar.xz")
    pub archive_name: String,

    /// Top-level directory inside the archive, also the cache directory name
    pub dir_name: String,

    /// Archive format
    pub format: ArchiveFormat,

    /// Executable path relative to `dir_name`
    pub executable: PathBuf,
}

/// Resolves download specs for a platform against a distribution mirror.
#[derive(Debug, Clone)]
pub struct PlatformResolver {
    platform: PlatformKey,
    mirror: String,
}

impl PlatformResolver {
    /// Resolver for an explicit platform.
    pub fn new(platform: PlatformKey, mirror: impl Into<String>) -> Self {
        PlatformResolver {
            platform,
            mirror: mirror.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolver for the host platform and the default mirror.
    pub fn host() -> Self {
        Self::new(PlatformKey::host().clone(), DEFAULT_NODE_MIRROR)
    }

    pub fn platform(&self) -> &PlatformKey {
        &self.platform
    }

    pub fn mirror(&self) -> &str {
        &self.mirror
    }

    /// Resolve the download spec for a runtime version.
    ///
    /// Fails with `UnsupportedPlatform` for any OS outside macOS, Linux and
    /// Windows.
    pub fn resolve(&self, version: &str) -> Result<DownloadSpec, ToolchainError> {
        let version = version.trim().trim_start_matches('v').to_string();
        let arch = self.platform.arch.to_ascii_lowercase();

        let (os_name, arch_name, format) = match self.platform.family()? {
            OsFamily::MacOs => {
                let arch_name = if arch == "arm64" || arch == "aarch64" {
                    "arm64"
                } else {
                    "x64"
                };
                ("darwin", arch_name, ArchiveFormat::TarGz)
            }
            OsFamily::Linux => {
                let arch_name = if arch == "aarch64" || arch == "arm64" {
                    "arm64"
                } else {
                    "x64"
                };
                ("linux", arch_name, ArchiveFormat::TarXz)
            }
            OsFamily::Windows => ("win", "x64", ArchiveFormat::Zip),
        };

        let dir_name = format!("node-v{}-{}-{}", version, os_name, arch_name);
        let archive_name = format!("{}{}", dir_name, format.extension());
        let base = format!("{}/v{}", self.mirror, version);

        let node = format!("node{}", self.platform.exe_suffix());
        let executable = match format {
            ArchiveFormat::Zip => PathBuf::from(node),
            _ => PathBuf::from("bin").join(node),
        };

        Ok(DownloadSpec {
            platform: self.platform.clone(),
            url: format!("{}/{}", base, archive_name),
            checksums_url: format!("{}/SHASUMS256.txt", base),
            archive_name,
            dir_name,
            format,
            executable,
            version,
        })
    }
}

impl Default for PlatformResolver {
    fn default() -> Self {
        Self::host()
    }
}
