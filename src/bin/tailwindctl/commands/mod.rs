//! Command implementations

pub mod build;
pub mod cache;
pub mod clean;
pub mod completions;
pub mod init;
pub mod watch;

use anyhow::{Context, Result};

use crate::cli::ProjectArgs;
use tailwindctl::{
    BuildRequest, ExecutablePaths, GlobalContext, Invocation, RuntimeAcquirer, ThemeMap,
    ToolchainCommand,
};

/// Context rooted at `--working-dir`, or the current directory.
pub(crate) fn context(args: &ProjectArgs) -> Result<GlobalContext> {
    match args.working_dir {
        Some(ref dir) => {
            let dir = dir
                .canonicalize()
                .with_context(|| format!("working directory not found: {}", dir.display()))?;
            GlobalContext::with_cwd(dir)
        }
        None => GlobalContext::new(),
    }
}

/// Build request from defaults, config files and flags, in that order.
pub(crate) fn build_request(ctx: &GlobalContext, args: &ProjectArgs) -> BuildRequest {
    let config = ctx.load_config();
    let mut request = BuildRequest::new(ctx.cwd()).with_config(&config);

    if !args.content_path.is_empty() {
        request.content = args.content_path.clone();
    }
    if let Some(ref path) = args.input_css_path {
        request.input_css = path.clone();
    }
    if let Some(ref path) = args.output_css_path {
        request.output_css = path.clone();
    }
    if let Some(ref path) = args.config_js_path {
        request.config_js = path.clone();
    }
    if let Some(ref json) = args.tailwind_theme_config {
        request.theme = match ThemeMap::from_json_str(json) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!("{:#}; continuing without a theme override", e);
                ThemeMap::new()
            }
        };
    }
    if let Some(ref version) = args.tailwind_version {
        request.tailwind_version = version.clone();
    }
    if args.download_node {
        request.download_runtime = true;
    }
    if let Some(ref version) = args.node_version {
        request.runtime_version = version.clone();
    }

    request
}

/// Acquire a runtime and start a lifecycle session.
pub(crate) fn start_session(
    ctx: &GlobalContext,
    request: BuildRequest,
) -> Result<ToolchainCommand> {
    let mut acquirer = RuntimeAcquirer::from_context(ctx, Invocation::Cli);
    let handle = acquirer.ensure(request.download_runtime, &request.runtime_version)?;
    let paths = ExecutablePaths::resolve(&handle, acquirer.platform());
    Ok(ToolchainCommand::new(request, paths))
}
