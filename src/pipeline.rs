// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Scanner → Extractor → Emitter pipeline shared by every trigger context.
//!
//! A run is stateless: it lists the icon directory, extracts every icon, and
//! assembles a fresh sprite. Writing artifacts is a separate step so hooks can
//! keep the in-memory result while still refreshing the generated module.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::SpriteSettings,
    error::Error,
    extract::Extractor,
    scan::{IconSource, scan_icon_directory},
    sprite::{IconNames, SpriteBuild, assemble_sprite, write_sprite_file},
    types::write_types_module
};

/// Outcome of writing the generated artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Identifiers included in the sprite, in scan order.
    pub icon_names:    IconNames,
    /// Identifier module that was written, `None` when nothing was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types_output:  Option<PathBuf>,
    /// Standalone sprite that was written, if configured and non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite_output: Option<PathBuf>
}

impl GenerationReport {
    /// Returns `true` when the run found no icons and wrote nothing.
    pub fn is_empty(&self) -> bool {
        self.icon_names.is_empty()
    }
}

/// Builds the sprite for every icon in `icons_dir`.
///
/// Icons that cannot be decoded or extracted are skipped with a warning. A missing
/// directory yields an empty [`SpriteBuild`].
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory exists but cannot be listed or an
/// icon file cannot be read.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use icon_sprite::generate_sprite_data;
///
/// # fn main() -> Result<(), icon_sprite::Error> {
/// let build = generate_sprite_data(Path::new("src/shared/ui/Icon/assets"))?;
/// for name in build.icon_names.iter() {
///     println!("icon-{name}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn generate_sprite_data(icons_dir: &Path) -> Result<SpriteBuild, Error> {
    let file_names = scan_icon_directory(icons_dir)?;
    if file_names.is_empty() {
        if icons_dir.is_dir() {
            warn!("No SVG files found in {}", icons_dir.display());
        }
        return Ok(SpriteBuild::default());
    }

    debug!("Extracting {} icon source(s) from {}", file_names.len(), icons_dir.display());
    let extractor = Extractor::new()?;
    let mut fragments = Vec::with_capacity(file_names.len());
    for file_name in &file_names {
        if let Some(source) = IconSource::read(icons_dir, file_name)? {
            fragments.push(extractor.extract_source(&source));
        }
    }

    let build = assemble_sprite(&fragments);
    let skipped = file_names.len() - build.icon_names.len();
    if skipped > 0 {
        warn!("Skipped {skipped} icon(s) without extractable content");
    }

    Ok(build)
}

/// Writes the identifier module, and the standalone sprite when configured.
///
/// Nothing is written when `build` holds no icons.
///
/// # Errors
///
/// Returns [`Error::Write`] when an artifact cannot be written.
pub fn emit_artifacts(
    build: &SpriteBuild,
    settings: &SpriteSettings
) -> Result<GenerationReport, Error> {
    if build.is_empty() {
        info!("No icons found, generated artifacts left untouched");
        return Ok(GenerationReport::default());
    }

    write_types_module(&build.icon_names, &settings.types_output)?;

    let sprite_output = match settings.sprite_output.as_deref() {
        Some(path) => {
            write_sprite_file(build, path)?;
            info!("Wrote sprite with {} symbol(s) to {}", build.icon_names.len(), path.display());
            Some(path.to_path_buf())
        }
        None => None
    };

    Ok(GenerationReport {
        icon_names: build.icon_names.clone(),
        types_output: Some(settings.types_output.clone()),
        sprite_output
    })
}

/// Runs the pipeline once and writes its artifacts.
///
/// # Errors
///
/// Propagates errors from [`generate_sprite_data`] and [`emit_artifacts`].
pub fn run_generation(settings: &SpriteSettings) -> Result<GenerationReport, Error> {
    let build = generate_sprite_data(&settings.icons_dir)?;
    emit_artifacts(&build, settings)
}

#[cfg(test)]
mod tests {
    use std::{
        fs, io,
        sync::{Arc, Mutex}
    };

    use tempfile::{TempDir, tempdir};

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            let bytes = self.0.lock().expect("log buffer poisoned");
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer poisoned").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn with_captured_logs<T>(run: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let result = tracing::subscriber::with_default(subscriber, run);
        (result, logs.contents())
    }

    fn settings_for(temp: &TempDir) -> SpriteSettings {
        SpriteSettings {
            icons_dir: temp.path().join("assets"),
            types_output: temp.path().join("icon-names.ts"),
            ..SpriteSettings::default()
        }
    }

    fn write_icon(temp: &TempDir, file_name: &str, contents: &str) {
        let dir = temp.path().join("assets");
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(dir.join(file_name), contents).expect("write icon");
    }

    #[test]
    fn broken_icon_is_excluded_from_sprite_and_names() {
        let temp = tempdir().expect("failed to create tempdir");
        write_icon(&temp, "board.svg", "<svg viewBox=\"0 0 24 24\"><path d=\"M1 1\"/></svg>");
        write_icon(&temp, "broken.svg", "<svg viewBox=\"0 0 24 24\"><path d=\"M1 1\"/>");

        let (outcome, logs) =
            with_captured_logs(|| generate_sprite_data(&temp.path().join("assets")));
        let build = outcome.expect("pipeline failed");

        assert_eq!(build.icon_names.as_slice(), ["board"]);
        assert_eq!(build.sprite.matches("<symbol").count(), 1);
        assert!(build.sprite.contains("id=\"icon-board\""));
        assert!(logs.contains("WARN"));
        assert!(logs.contains("broken.svg"), "missing warning for broken.svg: {logs}");
    }

    #[test]
    fn undecodable_icon_is_skipped_without_failing_batch() {
        let temp = tempdir().expect("failed to create tempdir");
        write_icon(&temp, "board.svg", "<svg><path/></svg>");
        let assets = temp.path().join("assets");
        fs::write(assets.join("latin1.svg"), b"<svg><text>caf\xE9</text></svg>").expect("write");

        let (outcome, logs) = with_captured_logs(|| generate_sprite_data(&assets));
        let build = outcome.expect("undecodable icon must not abort the run");

        assert_eq!(build.icon_names.as_slice(), ["board"]);
        assert!(logs.contains("latin1.svg"));
    }

    #[test]
    fn missing_directory_produces_empty_build() {
        let temp = tempdir().expect("failed to create tempdir");
        let build = generate_sprite_data(&temp.path().join("absent")).expect("not fatal");

        assert!(build.is_empty());
        assert!(build.sprite.is_empty());
    }

    #[test]
    fn unrecognized_files_do_not_affect_output() {
        let temp = tempdir().expect("failed to create tempdir");
        write_icon(&temp, "board.svg", "<svg><path/></svg>");
        write_icon(&temp, "notes.txt", "<svg><path/></svg>");
        write_icon(&temp, "board.svg.orig", "<svg><path/></svg>");

        let build = generate_sprite_data(&temp.path().join("assets")).expect("pipeline failed");
        assert_eq!(build.icon_names.as_slice(), ["board"]);
    }

    #[test]
    fn empty_directory_writes_nothing() {
        let temp = tempdir().expect("failed to create tempdir");
        fs::create_dir(temp.path().join("assets")).expect("mkdir");
        let settings = settings_for(&temp);

        let report = run_generation(&settings).expect("empty run is not fatal");

        assert!(report.is_empty());
        assert_eq!(report.types_output, None);
        assert!(!settings.types_output.exists());
    }

    #[test]
    fn run_generation_writes_types_and_optional_sprite() {
        let temp = tempdir().expect("failed to create tempdir");
        write_icon(&temp, "board.svg", "<svg><path/></svg>");
        let settings = SpriteSettings {
            sprite_output: Some(temp.path().join("public/sprite.svg")),
            ..settings_for(&temp)
        };

        let report = run_generation(&settings).expect("pipeline failed");

        assert_eq!(report.icon_names.as_slice(), ["board"]);
        assert_eq!(report.types_output.as_deref(), Some(settings.types_output.as_path()));
        let module = fs::read_to_string(&settings.types_output).expect("types written");
        assert!(module.contains("| 'board';"));
        let sprite = fs::read_to_string(temp.path().join("public/sprite.svg")).expect("sprite");
        assert!(sprite.contains("icon-board"));
    }

    #[test]
    fn rerun_on_unchanged_input_is_byte_identical() {
        let temp = tempdir().expect("failed to create tempdir");
        write_icon(&temp, "board.svg", "<svg><path/></svg>");
        write_icon(&temp, "column.svg", "<?xml version=\"1.0\"?><svg><rect/></svg>");
        let settings = settings_for(&temp);

        let first_build = generate_sprite_data(&settings.icons_dir).expect("first run");
        run_generation(&settings).expect("first write");
        let first = fs::read(&settings.types_output).expect("read");

        let second_build = generate_sprite_data(&settings.icons_dir).expect("second run");
        run_generation(&settings).expect("second write");
        let second = fs::read(&settings.types_output).expect("read");

        assert_eq!(first, second);
        assert_eq!(first_build, second_build);
    }

    #[test]
    fn report_serializes_written_paths_only() {
        let report = GenerationReport {
            icon_names:    ["board"].into_iter().collect(),
            types_output:  Some(PathBuf::from("src/icon-names.ts")),
            sprite_output: None
        };

        let json = serde_json::to_string(&report).expect("serialization failed");
        assert_eq!(json, "{\"icon_names\":[\"board\"],\"types_output\":\"src/icon-names.ts\"}");
    }
}
