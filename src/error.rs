#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the sprite pipeline."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Only unexpected failures surface as [`Error`]. A missing icon directory or
//! an icon whose markup cannot be extracted is reported through `tracing`
//! diagnostics and never aborts a pipeline run.

use std::path::{Path, PathBuf};

/// Unified error type returned by the pipeline, the hooks, and the CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while listing or reading icon sources.
    #[error("failed to read icon source at {path:?}: {source}")]
    Io {
        /// Location of the directory or file being read.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps I/O errors that occur while writing generated artifacts.
    #[error("failed to write generated artifact at {path:?}: {source}")]
    Write {
        /// Location of the artifact being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Wraps I/O errors that occur while reading the configuration document.
    #[error("failed to read configuration from {path:?}: {source}")]
    Config {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when configuration or caller input violates invariants.
    #[error("invalid input: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when writing the JSON summary.
    #[error("failed to serialize summary: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Errors raised while binding or answering the development server.
    #[error("dev server error: {message}")]
    Serve {
        /// Human readable message describing the server failure.
        message: String
    },
    /// Wraps failures reported by the filesystem watcher.
    #[error("failed to watch icon directory: {source}")]
    Watch {
        /// Underlying watcher error.
        source: notify::Error
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a dev server error from the provided displayable value.
    pub fn serve<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Serve {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<notify::Error> for Error {
    fn from(source: notify::Error) -> Self {
        Self::Watch {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Icon directory or icon file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Write`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the generated artifact that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn write_error(path: &Path, source: std::io::Error) -> Error {
    Error::Write {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Config`] variant capturing the failing path and source.
pub fn config_error(path: &Path, source: std::io::Error) -> Error {
    Error::Config {
        path: path.to_path_buf(),
        source
    }
}
