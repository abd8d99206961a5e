//! `tailwindctl cache` command
//!
//! Manage the Node.js runtimes downloaded by `--download-node`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::{CacheArgs, CacheCommands};
use tailwindctl::util::fs::remove_dir_all_if_exists;
use tailwindctl::GlobalContext;

pub fn execute(args: CacheArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let cache_dir = ctx.runtime_cache_dir();

    match args.command {
        CacheCommands::Path => {
            println!("{}", cache_dir.display());
            Ok(())
        }
        CacheCommands::List => list_runtimes(&cache_dir),
        CacheCommands::Clear => clear(&cache_dir),
    }
}

/// List cached runtimes with their sizes.
fn list_runtimes(cache_dir: &Path) -> Result<()> {
    if !cache_dir.is_dir() {
        println!("(none)");
        return Ok(());
    }

    let mut entries: Vec<_> = fs::read_dir(cache_dir)
        .with_context(|| format!("failed to read directory: {}", cache_dir.display()))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    if entries.is_empty() {
        println!("(none)");
    }

    for entry in entries {
        let size = dir_size(&entry.path())?;
        println!("{} ({})", entry.file_name().to_string_lossy(), format_size(size));
    }

    Ok(())
}

fn clear(cache_dir: &Path) -> Result<()> {
    if cache_dir.exists() {
        remove_dir_all_if_exists(cache_dir)?;
        eprintln!("     Removed {}", cache_dir.display());
    } else {
        eprintln!("     Nothing to clean");
    }
    Ok(())
}

/// Calculate the total size of a directory recursively.
fn dir_size(path: &Path) -> Result<u64> {
    let mut size: u64 = 0;

    for entry in
        fs::read_dir(path).with_context(|| format!("failed to read: {}", path.display()))?
    {
        let entry = entry?;
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            size += dir_size(&entry.path())?;
        } else if file_type.is_file() {
            size += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }

    Ok(size)
}

/// Format a size in bytes to a human-readable string.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
