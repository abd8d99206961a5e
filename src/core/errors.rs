//! Toolchain error types and diagnostics.

use thiserror::Error;

use crate::core::request::Invocation;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised while provisioning the runtime or driving a lifecycle stage.
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("unsupported platform: {os} ({arch})")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("unsupported Tailwind CSS version `{version}`")]
    UnsupportedToolchainVersion { version: String },

    #[error("{message}")]
    RuntimeMissing { message: String },

    #[error("failed to download Node.js from {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("failed to initialize project: {stderr}")]
    InitFailed { stderr: String },

    #[error("failed to install {packages}: {stderr}")]
    InstallFailed { packages: String, stderr: String },

    #[error("Tailwind CSS build failed: {stderr}")]
    BuildFailed { stderr: String },

    #[error("watch failed: {reason}")]
    WatchFailed { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolchainError {
    /// Node.js is neither on PATH nor allowed to be downloaded.
    ///
    /// The wording points at the switch the caller actually has: a CLI flag
    /// or the embedding option.
    pub fn runtime_missing(invocation: Invocation) -> Self {
        let message = match invocation {
            Invocation::Cli => {
                "Node.js is required but not found in PATH. \
                 Install Node.js or use --download-node to automatically download it."
            }
            Invocation::Embedded => {
                "Node.js is required for offline mode but not found. \
                 Install Node.js or enable `download_node` to automatically download it."
            }
        };
        ToolchainError::RuntimeMissing {
            message: message.to_string(),
        }
    }

    pub fn download_failed(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        ToolchainError::DownloadFailed {
            url: url.into(),
            reason: format!("{:#}", reason),
        }
    }

    /// Whether retrying cannot help.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ToolchainError::UnsupportedPlatform { .. }
                | ToolchainError::UnsupportedToolchainVersion { .. }
        )
    }

    /// Captured stderr of the failing subprocess, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            ToolchainError::InitFailed { stderr }
            | ToolchainError::InstallFailed { stderr, .. }
            | ToolchainError::BuildFailed { stderr } => Some(stderr),
            _ => None,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ToolchainError::UnsupportedPlatform { os, arch } => {
                Diagnostic::error(format!("no Node.js distribution for `{}` ({})", os, arch))
                    .with_context("downloads are available for macOS, Linux and Windows")
                    .with_suggestion(suggestions::INSTALL_NODE)
            }

            ToolchainError::UnsupportedToolchainVersion { version } => Diagnostic::error(
                format!("unsupported Tailwind CSS version `{}`", version),
            )
            .with_context("supported major versions are 3 and 4")
            .with_suggestion(suggestions::TAILWIND_VERSION),

            ToolchainError::RuntimeMissing { message } => Diagnostic::error(message.clone())
                .with_suggestion(suggestions::INSTALL_NODE)
                .with_suggestion(suggestions::DOWNLOAD_NODE),

            ToolchainError::DownloadFailed { url, reason } => {
                Diagnostic::error(format!("failed to download Node.js from {}", url))
                    .with_context(reason.clone())
                    .with_suggestion(suggestions::DOWNLOAD_FAILED)
            }

            ToolchainError::InitFailed { stderr } => {
                Diagnostic::error("failed to initialize package.json")
                    .with_context(stderr.trim().to_string())
            }

            ToolchainError::InstallFailed { packages, stderr } => {
                Diagnostic::error(format!("failed to install {}", packages))
                    .with_context(stderr.trim().to_string())
                    .with_suggestion(suggestions::INSTALL_FAILED)
            }

            ToolchainError::BuildFailed { stderr } => {
                Diagnostic::error("Tailwind CSS build failed")
                    .with_context(stderr.trim().to_string())
                    .with_suggestion(suggestions::BUILD_FAILED)
            }

            ToolchainError::WatchFailed { reason } => {
                Diagnostic::error("watch failed").with_context(reason.clone())
            }

            ToolchainError::Other(err) => Diagnostic::error(format!("{:#}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_missing_message_depends_on_invocation() {
        let cli = ToolchainError::runtime_missing(Invocation::Cli);
        let embedded = ToolchainError::runtime_missing(Invocation::Embedded);

        assert!(cli.to_string().contains("--download-node"));
        assert!(embedded.to_string().contains("download_node"));
        assert!(matches!(cli, ToolchainError::RuntimeMissing { .. }));
        assert!(matches!(embedded, ToolchainError::RuntimeMissing { .. }));
    }

    #[test]
    fn test_fatal_errors() {
        let unsupported = ToolchainError::UnsupportedPlatform {
            os: "plan9".into(),
            arch: "mips".into(),
        };
        let build = ToolchainError::BuildFailed {
            stderr: "boom".into(),
        };

        assert!(unsupported.is_fatal());
        assert!(!build.is_fatal());
        assert_eq!(build.stderr(), Some("boom"));
        assert_eq!(unsupported.stderr(), None);
    }

    #[test]
    fn test_build_failed_diagnostic() {
        let err = ToolchainError::BuildFailed {
            stderr: "CssSyntaxError: Unknown word\n".into(),
        };
        let output = err.to_diagnostic().format(false);

        assert!(output.contains("error: Tailwind CSS build failed"));
        assert!(output.contains("CssSyntaxError: Unknown word"));
        assert!(output.contains("help: consider:"));
    }
}
