// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generation of the TypeScript module that enumerates icon identifiers.
//!
//! The module declares an `IconName` union type and an `ICON_NAMES` constant
//! listing in scan order. It is regenerated in full on every run and never
//! merged with a previous version.

use std::{borrow::Cow, fmt::Write as _, path::Path};

use tracing::info;

use crate::{error::Error, file::write_artifact, sprite::IconNames};

const HEADER: &str = "// Auto-generated file - do not edit manually\n// Run 'icon-sprite generate' to update\n";

/// Renders the identifier module for `names`.
///
/// The output depends only on the identifiers and their order, so unchanged
/// input renders byte-identical output.
///
/// # Examples
///
/// ```
/// use icon_sprite::{IconNames, render_types_module};
///
/// let names: IconNames = ["board"].into_iter().collect();
/// let module = render_types_module(&names);
/// assert!(module.contains("export type IconName =\n  | 'board';"));
/// assert!(module.contains("export const ICON_NAMES = [\n  'board',\n] as const;"));
/// ```
pub fn render_types_module(names: &IconNames) -> String {
    let mut module = String::with_capacity(HEADER.len() + 96 + names.len() * 32);
    module.push_str(HEADER);
    module.push('\n');

    if names.is_empty() {
        module.push_str("export type IconName = never;\n");
    } else {
        module.push_str("export type IconName =\n");
        let last = names.len() - 1;
        for (index, name) in names.iter().enumerate() {
            let terminator = if index == last { ";" } else { "" };
            let _ = writeln!(module, "  | '{}'{terminator}", escape_ts_string(name));
        }
    }

    module.push_str("\nexport const ICON_NAMES = [\n");
    for name in names.iter() {
        let _ = writeln!(module, "  '{}',", escape_ts_string(name));
    }
    module.push_str("] as const;\n");

    module
}

/// Renders and atomically writes the identifier module to `path`.
///
/// # Errors
///
/// Returns [`Error::Write`] when the artifact cannot be written. No partial
/// file is left behind in that case.
pub fn write_types_module(names: &IconNames, path: &Path) -> Result<(), Error> {
    write_artifact(path, &render_types_module(names))?;
    info!("Generated icon types for {} icon(s) at {}", names.len(), path.display());
    Ok(())
}

fn escape_ts_string(value: &str) -> Cow<'_, str> {
    if !value
        .chars()
        .any(|character| matches!(character, '\\' | '\'' | '\n' | '\r'))
    {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 4);
    for character in value.chars() {
        match character {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other)
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn names(values: &[&str]) -> IconNames {
        values.iter().copied().collect()
    }

    #[test]
    fn renders_union_and_constant_listing_in_order() {
        let module = render_types_module(&names(&["column", "board", "card"]));

        let expected = "// Auto-generated file - do not edit manually\n\
// Run 'icon-sprite generate' to update\n\
\n\
export type IconName =\n  | 'column'\n  | 'board'\n  | 'card';\n\
\n\
export const ICON_NAMES = [\n  'column',\n  'board',\n  'card',\n] as const;\n";
        assert_eq!(module, expected);
    }

    #[test]
    fn empty_enumeration_renders_never_type() {
        let module = render_types_module(&IconNames::default());
        assert!(module.contains("export type IconName = never;"));
        assert!(module.contains("export const ICON_NAMES = [\n] as const;"));
    }

    #[test]
    fn identifiers_are_escaped_for_string_literals() {
        let module = render_types_module(&names(&["it's", "back\\slash"]));
        assert!(module.contains("  | 'it\\'s'\n"));
        assert!(module.contains("  'back\\\\slash',\n"));
    }

    #[test]
    fn write_types_module_is_deterministic() {
        let dir = tempdir().expect("failed to create tempdir");
        let path = dir.path().join("icon-names.ts");
        let listing = names(&["board", "column"]);

        write_types_module(&listing, &path).expect("first write failed");
        let first = std::fs::read(&path).expect("read");
        write_types_module(&listing, &path).expect("second write failed");
        let second = std::fs::read(&path).expect("read");

        assert_eq!(first, second);
    }

    #[test]
    fn write_types_module_replaces_stale_module() {
        let dir = tempdir().expect("failed to create tempdir");
        let path = dir.path().join("icon-names.ts");
        std::fs::write(&path, "export type IconName = 'removed-icon';\n").expect("seed");

        write_types_module(&names(&["board"]), &path).expect("write failed");

        let written = std::fs::read_to_string(&path).expect("read");
        assert!(!written.contains("removed-icon"));
        assert!(written.contains("'board'"));
    }
}
