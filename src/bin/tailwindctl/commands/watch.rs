//! `tailwindctl watch` command

use anyhow::{bail, Result};

use crate::cli::ProjectArgs;
use crate::commands::{build_request, context, start_session};
use tailwindctl::WatchOutcome;

pub fn execute(args: ProjectArgs) -> Result<()> {
    let ctx = context(&args)?;
    let request = build_request(&ctx, &args);

    let mut session = start_session(&ctx, request)?;
    session.init()?;
    session.install()?;

    match session.watch()? {
        WatchOutcome::Interrupted | WatchOutcome::Exited(Some(0)) => Ok(()),
        WatchOutcome::Exited(Some(code)) => {
            bail!("Tailwind CSS watcher exited with status {}", code)
        }
        WatchOutcome::Exited(None) => bail!("Tailwind CSS watcher was terminated"),
    }
}
