// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Enumerates icon source files inside the icon directory.
//!
//! The scanner only looks at the flat listing of a single directory. Entries
//! are kept in the order reported by the operating system, which is
//! unspecified; callers that need a stable order across machines must not rely
//! on it.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::error::{self, Error};

/// File name suffix recognized as an icon source.
pub const ICON_EXTENSION: &str = ".svg";

/// Raw contents of a single icon file together with its identifier.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct IconSource
{
    /// Identifier derived from the file name with the extension stripped.
    pub name:      String,
    /// File name as listed in the icon directory.
    pub file_name: String,
    /// Unmodified textual contents of the file.
    pub contents:  String,
}

impl IconSource
{
    /// Reads `file_name` from `dir`.
    ///
    /// Returns `Ok(None)` and logs a warning naming the file when its contents
    /// are not valid UTF-8; such an icon is left out of the run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::Validation`] when the name carries no identifier.
    pub fn read(dir: &Path, file_name: &str,) -> Result<Option<Self,>, Error,>
    {
        let name = icon_name(file_name,).ok_or_else(|| {
            Error::validation(format!("'{file_name}' is not an icon source file"),)
        },)?;

        let path = dir.join(file_name,);
        let bytes = fs::read(&path,).map_err(|source| error::io_error(&path, source,),)?;
        let Ok(contents,) = String::from_utf8(bytes,) else {
            warn!("Skipping {file_name}: contents are not valid UTF-8");
            return Ok(None,);
        };

        Ok(Some(Self {
            name: name.to_owned(),
            file_name: file_name.to_owned(),
            contents,
        },),)
    }
}

/// Returns the icon identifier for `file_name`, or `None` when the name does
/// not end with [`ICON_EXTENSION`] or nothing remains after stripping it.
///
/// No normalization is applied; the identifier is an opaque string.
///
/// # Examples
///
/// ```
/// use icon_sprite::icon_name;
///
/// assert_eq!(icon_name("arrow-left.svg"), Some("arrow-left"));
/// assert_eq!(icon_name("Board.SVG"), None);
/// ```
pub fn icon_name(file_name: &str,) -> Option<&str,>
{
    file_name.strip_suffix(ICON_EXTENSION,).filter(|name| !name.is_empty(),)
}

/// Lists the icon source files of `dir` in directory listing order.
///
/// A missing directory yields an empty list and a warning; zero icons is a
/// valid outcome. Sub-directories and names that are not valid UTF-8 are
/// skipped.
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory exists but cannot be listed.
pub fn scan_icon_directory(dir: &Path,) -> Result<Vec<String,>, Error,>
{
    let entries = match fs::read_dir(dir,) {
        Ok(entries,) => entries,
        Err(source,) if source.kind() == ErrorKind::NotFound => {
            warn!("Icons directory not found: {}", dir.display());
            return Ok(Vec::new(),);
        }
        Err(source,) => return Err(error::io_error(dir, source,),),
    };

    let mut file_names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| error::io_error(dir, source,),)?;
        let path: PathBuf = entry.path();

        let file_type = entry.file_type().map_err(|source| error::io_error(&path, source,),)?;
        if file_type.is_dir() {
            debug!("Skipping directory {}", path.display());
            continue;
        }

        let Some(file_name,) = entry.file_name().to_str().map(str::to_owned,) else {
            warn!("Skipping icon with non UTF-8 name: {}", path.display());
            continue;
        };

        if icon_name(&file_name,).is_some() {
            file_names.push(file_name,);
        } else {
            debug!("Ignoring {file_name}: not an icon source");
        }
    }

    Ok(file_names,)
}
