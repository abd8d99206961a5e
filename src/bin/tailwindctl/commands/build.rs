//! `tailwindctl build` command

use std::time::Duration;

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::commands::{build_request, context, start_session};
use tailwindctl::ops::gate::should_skip;
use tailwindctl::ops::run_build;

pub fn execute(args: BuildArgs) -> Result<()> {
    let ctx = context(&args.project)?;
    let mut request = build_request(&ctx, &args.project);

    // Flags can only switch these on; config decides otherwise
    if args.clean_after {
        request.clean_after = true;
    }
    if args.skip_if_recent {
        request.skip_if_recent = true;
    }
    if let Some(secs) = args.skip_threshold {
        request.skip_threshold = Duration::from_secs(secs);
    }

    let output = request.output_path();
    if should_skip(&output, request.skip_threshold, request.skip_if_recent) {
        eprintln!(
            "     Skipped {} (built less than {}s ago)",
            output.display(),
            request.skip_threshold.as_secs()
        );
        return Ok(());
    }

    let clean_after = request.clean_after;
    let mut session = start_session(&ctx, request)?;
    let result = run_build(&mut session, clean_after)?;

    eprintln!("    Finished {}", result.output.display());

    Ok(())
}
