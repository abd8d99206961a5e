//! User-friendly diagnostic messages.
//!
//! Every lifecycle error shown on the command line carries its root cause
//! and, where one exists, a suggested fix.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when Node.js cannot be found.
    pub const INSTALL_NODE: &str = "Install Node.js and make sure `node` is on your PATH";

    /// Suggestion when Node.js could be downloaded instead.
    pub const DOWNLOAD_NODE: &str =
        "Pass `--download-node` (or set `runtime.download = true`) to fetch a private copy";

    /// Suggestion for download failures.
    pub const DOWNLOAD_FAILED: &str =
        "Check your network connection or set TAILWINDCTL_NODE_MIRROR to a reachable mirror";

    /// Suggestion when npm install fails.
    pub const INSTALL_FAILED: &str =
        "Run `npm install -D tailwindcss` manually to see the full log";

    /// Suggestion when the Tailwind build fails.
    pub const BUILD_FAILED: &str =
        "Check the input stylesheet and tailwind.config.js for syntax errors";

    /// Suggestion for an unsupported Tailwind version.
    pub const TAILWIND_VERSION: &str = "Pass `--tailwind-version 3` or `--tailwind-version 4`";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Self::error(message)
        }
    }

    /// Add context to the diagnostic. Blank context is dropped.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        if !context.trim().is_empty() {
            self.context.push(context);
        }
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = match (color, self.severity) {
            (true, Severity::Error) => "\x1b[1;31merror\x1b[0m",
            (true, Severity::Warning) => "\x1b[1;33mwarning\x1b[0m",
            (false, Severity::Error) => "error",
            (false, Severity::Warning) => "warning",
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        // Multi-line context (captured stderr) is indented as a block
        for ctx in &self.context {
            for line in ctx.lines() {
                output.push_str(&format!("  | {}\n", line));
            }
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("failed to install tailwindcss@3")
            .with_context("npm ERR! code ENOTFOUND\nnpm ERR! network request failed")
            .with_suggestion("Check your network connection")
            .with_location("/project/package.json");

        let output = diag.format(false);
        assert!(output.contains("error: failed to install tailwindcss@3"));
        assert!(output.contains("  --> /project/package.json"));
        assert!(output.contains("  | npm ERR! code ENOTFOUND"));
        assert!(output.contains("  | npm ERR! network request failed"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("1. Check your network connection"));
    }

    #[test]
    fn test_blank_context_is_dropped() {
        let diag = Diagnostic::warning("build skipped").with_context("  \n");
        assert!(diag.context.is_empty());
        assert!(diag.format(false).starts_with("warning: build skipped"));
    }
}
