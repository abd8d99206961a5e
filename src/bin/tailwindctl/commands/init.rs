//! `tailwindctl init` command

use anyhow::Result;

use crate::cli::ProjectArgs;
use crate::commands::{build_request, context, start_session};

pub fn execute(args: ProjectArgs) -> Result<()> {
    let ctx = context(&args)?;
    let request = build_request(&ctx, &args);
    let config = request.config_path();

    let mut session = start_session(&ctx, request)?;
    session.init()?;
    session.install()?;

    eprintln!("Next steps:");
    eprintln!("  1. Customize {} if needed", config.display());
    eprintln!("  2. Build CSS with: tailwindctl build");

    Ok(())
}
