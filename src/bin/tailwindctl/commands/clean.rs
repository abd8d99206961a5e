//! `tailwindctl clean` command

use std::io::{self, IsTerminal};

use anyhow::{bail, Result};

use crate::cli::ProjectArgs;
use crate::commands::{build_request, context};
use tailwindctl::util::diagnostic::{self, Diagnostic};
use tailwindctl::{ExecutablePaths, PlatformKey, ToolchainCommand};

pub fn execute(args: ProjectArgs) -> Result<()> {
    let ctx = context(&args)?;
    let request = build_request(&ctx, &args);

    // Removing files never runs npm, so no runtime is needed
    let paths = ExecutablePaths::system(PlatformKey::host());
    let report = ToolchainCommand::new(request, paths).clean();

    if report.removed.is_empty() && report.failed.is_empty() {
        eprintln!("     Nothing to clean");
    }

    let color = io::stderr().is_terminal();
    for (path, reason) in &report.failed {
        let warning = Diagnostic::warning("could not remove generated file")
            .with_location(path)
            .with_context(reason.as_str());
        diagnostic::emit(&warning, color);
    }

    if !report.failed.is_empty() {
        bail!("could not remove {} generated item(s)", report.failed.len());
    }

    Ok(())
}
