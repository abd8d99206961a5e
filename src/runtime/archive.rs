//! Runtime archive extraction.
//!
//! Supports the three formats Node.js is published in: `.tar.gz` (macOS),
//! `.tar.xz` (Linux) and `.zip` (Windows).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::platform::ArchiveFormat;

/// Extract `archive` into `dest`, creating `dest` if needed.
pub fn extract_archive(archive: &Path, format: ArchiveFormat, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("failed to create destination directory: {}", dest.display()))?;

    let file = File::open(archive)
        .with_context(|| format!("failed to open archive: {}", archive.display()))?;
    let reader = BufReader::new(file);

    let result = match format {
        ArchiveFormat::TarGz => unpack_tar(flate2::read::GzDecoder::new(reader), dest),
        ArchiveFormat::TarXz => unpack_tar(xz2::read::XzDecoder::new(reader), dest),
        ArchiveFormat::Zip => {
            let mut zip = zip::ZipArchive::new(reader)
                .with_context(|| format!("failed to read zip archive: {}", archive.display()))?;
            zip.extract(dest)
                .with_context(|| format!("failed to extract zip into {}", dest.display()))
        }
    };

    result.with_context(|| format!("failed to extract {}", archive.display()))
}

fn unpack_tar<R: Read>(reader: R, dest: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    // `unpack` refuses entries that would escape `dest`
    archive
        .unpack(dest)
        .with_context(|| format!("failed to unpack tarball into {}", dest.display()))
}
