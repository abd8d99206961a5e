//! Tailwind CSS release selection.

use std::fmt;
use std::str::FromStr;

use crate::core::errors::ToolchainError;

/// Tailwind CSS version used when none is configured.
pub const DEFAULT_TAILWIND_VERSION: &str = "3";

const STYLESHEET_V3: &str = "@tailwind base;\n@tailwind components;\n@tailwind utilities;\n";
const STYLESHEET_V4: &str = "@import \"tailwindcss\";\n";

/// Requested Tailwind CSS release (e.g. "3", "4", "3.4.17").
///
/// Only the major version changes behavior; the full string is kept so it
/// can be pinned in the npm install spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainVersion {
    raw: String,
    major: u64,
}

impl ToolchainVersion {
    /// Parse a version string. Accepts a bare major ("4"), a partial
    /// version ("3.4") or a full semver ("4.1.3"), with an optional `v`.
    pub fn parse(s: &str) -> Result<Self, ToolchainError> {
        let raw = s.trim().trim_start_matches('v').to_string();
        let unsupported = || ToolchainError::UnsupportedToolchainVersion {
            version: s.to_string(),
        };

        let major = match semver::Version::parse(&raw) {
            Ok(version) => version.major,
            Err(_) => raw
                .split('.')
                .next()
                .and_then(|m| m.parse::<u64>().ok())
                .ok_or_else(unsupported)?,
        };

        if !matches!(major, 3 | 4) {
            return Err(unsupported());
        }

        Ok(ToolchainVersion { raw, major })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    /// Version-dependent package names, CLI entry point and stylesheet.
    pub fn descriptor(&self) -> ToolchainDescriptor {
        if self.major >= 4 {
            ToolchainDescriptor {
                packages: vec![
                    format!("tailwindcss@{}", self.raw),
                    format!("@tailwindcss/cli@{}", self.raw),
                ],
                cli: "@tailwindcss/cli",
                stylesheet: STYLESHEET_V4,
            }
        } else {
            ToolchainDescriptor {
                packages: vec![format!("tailwindcss@{}", self.raw)],
                cli: "tailwindcss",
                stylesheet: STYLESHEET_V3,
            }
        }
    }
}

impl Default for ToolchainVersion {
    fn default() -> Self {
        ToolchainVersion {
            raw: DEFAULT_TAILWIND_VERSION.to_string(),
            major: 3,
        }
    }
}

impl FromStr for ToolchainVersion {
    type Err = ToolchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ToolchainVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Per-version toolchain facts, selected once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainDescriptor {
    /// npm install specs, in install order
    pub packages: Vec<String>,

    /// Package name passed to npx to run the compiler
    pub cli: &'static str,

    /// Default input stylesheet
    pub stylesheet: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versions() {
        assert_eq!(ToolchainVersion::parse("3").unwrap().major(), 3);
        assert_eq!(ToolchainVersion::parse("4").unwrap().major(), 4);
        assert_eq!(ToolchainVersion::parse("3.4").unwrap().major(), 3);
        assert_eq!(ToolchainVersion::parse("v4.1.3").unwrap().major(), 4);
        assert_eq!(ToolchainVersion::parse("4.1.3").unwrap().as_str(), "4.1.3");
    }

    #[test]
    fn test_parse_rejects_unsupported() {
        for input in ["2", "5.0.0", "latest", ""] {
            let err = ToolchainVersion::parse(input).unwrap_err();
            assert!(matches!(
                err,
                ToolchainError::UnsupportedToolchainVersion { .. }
            ));
        }
    }

    #[test]
    fn test_descriptor_v3() {
        let desc = ToolchainVersion::parse("3").unwrap().descriptor();
        assert_eq!(desc.packages, vec!["tailwindcss@3".to_string()]);
        assert_eq!(desc.cli, "tailwindcss");
        assert!(desc.stylesheet.contains("@tailwind utilities;"));
    }

    #[test]
    fn test_descriptor_v4() {
        let desc = ToolchainVersion::parse("4").unwrap().descriptor();
        assert_eq!(
            desc.packages,
            vec!["tailwindcss@4".to_string(), "@tailwindcss/cli@4".to_string()]
        );
        assert_eq!(desc.cli, "@tailwindcss/cli");
        assert_eq!(desc.stylesheet, "@import \"tailwindcss\";\n");
    }

    #[test]
    fn test_default_is_v3() {
        assert_eq!(ToolchainVersion::default(), ToolchainVersion::parse("3").unwrap());
    }
}
