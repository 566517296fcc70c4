// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// File operations for generated artifacts.
///
/// Artifacts are written all-or-nothing: the contents land in a temporary
/// file next to the destination and are renamed over it once fully flushed,
/// so readers never observe a partially written module or sprite.
use std::{
    io::Write,
    path::{Path, PathBuf}
};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{self, Error};

/// Atomically replaces `destination` with `contents`, creating parent
/// directories when needed.
///
/// # Errors
///
/// Returns [`Error::Write`] when the parent directory cannot be created, the
/// temporary file cannot be written, or the final rename fails. The previous
/// contents of `destination` are left untouched in every failure case.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use icon_sprite::write_artifact;
///
/// # fn example() -> Result<(), icon_sprite::Error> {
/// write_artifact(Path::new("src/icon-names.ts"), "export type IconName = never;\n")?;
/// # Ok(())
/// # }
/// ```
pub fn write_artifact(destination: &Path, contents: &str) -> Result<(), Error> {
    let parent = parent_dir(destination);

    if !parent.exists() {
        std::fs::create_dir_all(&parent)
            .map_err(|source| error::write_error(destination, source))?;
    }

    let mut staged =
        NamedTempFile::new_in(&parent).map_err(|source| error::write_error(destination, source))?;
    staged
        .write_all(contents.as_bytes())
        .map_err(|source| error::write_error(destination, source))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|source| error::write_error(destination, source))?;

    staged
        .persist(destination)
        .map_err(|persist| error::write_error(destination, persist.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), destination.display());
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from(".")
    }
}
