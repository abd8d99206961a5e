//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use tailwindctl::ToolchainVersion;

/// tailwindctl - Build Tailwind CSS without a JavaScript project
#[derive(Parser)]
#[command(name = "tailwindctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log filter directives (e.g. `tailwindctl=trace`), overrides --verbose
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config and input files and install Tailwind CSS
    Init(ProjectArgs),

    /// Build the stylesheet once
    Build(BuildArgs),

    /// Rebuild the stylesheet whenever sources change
    Watch(ProjectArgs),

    /// Remove generated config, input, package.json and node_modules
    Clean(ProjectArgs),

    /// Manage downloaded Node.js runtimes
    Cache(CacheArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ProjectArgs {
    /// Glob pattern for files to scan for Tailwind classes (repeatable)
    #[arg(long = "content-path", value_name = "GLOB")]
    pub content_path: Vec<String>,

    /// Path to the input CSS file
    #[arg(long, value_name = "PATH")]
    pub input_css_path: Option<PathBuf>,

    /// Path to the output CSS file
    #[arg(long, value_name = "PATH")]
    pub output_css_path: Option<PathBuf>,

    /// Path to the Tailwind config file
    #[arg(long, value_name = "PATH")]
    pub config_js_path: Option<PathBuf>,

    /// JSON object merged into `theme.extend` of a newly created config
    #[arg(long, value_name = "JSON")]
    pub tailwind_theme_config: Option<String>,

    /// Tailwind CSS version to install (major 3 or 4)
    #[arg(long, value_name = "VERSION", value_parser = parse_tailwind_version)]
    pub tailwind_version: Option<ToolchainVersion>,

    /// Download Node.js if it is not found in PATH
    #[arg(long)]
    pub download_node: bool,

    /// Node.js version to download
    #[arg(long, value_name = "VERSION", env = "TAILWINDCTL_NODE_VERSION")]
    pub node_version: Option<String>,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Remove generated files after building
    #[arg(long)]
    pub clean_after: bool,

    /// Skip the build if the output was written recently
    #[arg(long)]
    pub skip_if_recent: bool,

    /// Age in seconds below which the output counts as recent
    #[arg(long, value_name = "SECS")]
    pub skip_threshold: Option<u64>,
}

#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Print the runtime cache directory
    Path,

    /// List cached runtimes
    List,

    /// Remove all cached runtimes
    Clear,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

fn parse_tailwind_version(s: &str) -> Result<ToolchainVersion, String> {
    s.parse::<ToolchainVersion>().map_err(|e| e.to_string())
}
