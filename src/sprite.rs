// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Sprite assembly.
//!
//! Every extracted fragment becomes one `<symbol>` keyed by `icon-<name>`.
//! Symbols are emitted in scan order inside a single hidden `<svg>` container
//! so the document can be inlined once into a page and referenced many times.

use std::{borrow::Cow, fmt::Write as _, path::Path};

use serde::Serialize;

use crate::{error::Error, extract::IconFragment, file::write_artifact};

/// Prefix applied to every symbol identifier inside the sprite.
pub const SYMBOL_PREFIX: &str = "icon-";

const SPRITE_OPEN: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" style=\"display: none;\">";
const SPRITE_CLOSE: &str = "</svg>";

/// Ordered set of icon identifiers for which extraction succeeded.
///
/// The order is the scan order of the icon directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IconNames(Vec<String>);

impl IconNames {
    /// Returns the number of identifiers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no icon survived extraction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when `name` is a known identifier.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|candidate| candidate == name)
    }

    /// Iterates over identifiers in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Borrows the identifiers as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S> FromIterator<S> for IconNames
where
    S: Into<String>
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Result of one pipeline run: the sprite document and its identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpriteBuild {
    /// Combined sprite document, empty when no icon was extracted.
    pub sprite:     String,
    /// Identifiers of the symbols contained in [`sprite`](Self::sprite).
    pub icon_names: IconNames
}

impl SpriteBuild {
    /// Returns `true` when the run produced no icons.
    pub fn is_empty(&self) -> bool {
        self.icon_names.is_empty()
    }
}

/// Assembles the sprite document from extracted fragments.
///
/// Fragments without content are skipped. When the same identifier appears
/// more than once, the last fragment's markup replaces the earlier one while
/// the symbol keeps its first position.
///
/// # Examples
///
/// ```
/// use icon_sprite::{IconFragment, assemble_sprite};
///
/// let build = assemble_sprite(&[IconFragment {
///     name:     "board".to_owned(),
///     view_box: "0 0 24 24".to_owned(),
///     content:  "<path d=\"M1 1\"/>".to_owned()
/// }]);
/// assert!(build.sprite.contains("<symbol id=\"icon-board\""));
/// assert_eq!(build.icon_names.as_slice(), ["board"]);
/// ```
pub fn assemble_sprite(fragments: &[IconFragment]) -> SpriteBuild {
    let mut kept: Vec<&IconFragment> = Vec::with_capacity(fragments.len());

    for fragment in fragments.iter().filter(|fragment| fragment.is_extracted()) {
        match kept.iter().position(|existing| existing.name == fragment.name) {
            Some(index) => kept[index] = fragment,
            None => kept.push(fragment)
        }
    }

    if kept.is_empty() {
        return SpriteBuild::default();
    }

    let markup_len: usize = kept.iter().map(|fragment| fragment.content.len()).sum();
    let mut sprite = String::with_capacity(SPRITE_OPEN.len() + markup_len + 96 * kept.len());
    sprite.push_str(SPRITE_OPEN);
    sprite.push('\n');
    for fragment in &kept {
        write_symbol(&mut sprite, fragment);
    }
    sprite.push_str(SPRITE_CLOSE);

    SpriteBuild {
        sprite,
        icon_names: kept.iter().map(|fragment| fragment.name.as_str()).collect()
    }
}

/// Writes the standalone sprite resource.
///
/// # Errors
///
/// Returns [`Error::Write`] when the artifact cannot be written.
pub fn write_sprite_file(build: &SpriteBuild, path: &Path) -> Result<(), Error> {
    let mut contents = String::with_capacity(build.sprite.len() + 1);
    contents.push_str(&build.sprite);
    contents.push('\n');
    write_artifact(path, &contents)
}

fn write_symbol(buffer: &mut String, fragment: &IconFragment) {
    let _ = writeln!(
        buffer,
        "  <symbol id=\"{SYMBOL_PREFIX}{}\" viewBox=\"{}\" fill=\"none\">",
        escape_xml(&fragment.name),
        escape_xml(&fragment.view_box),
    );
    for line in fragment.content.lines() {
        if line.trim().is_empty() {
            buffer.push('\n');
        } else {
            let _ = writeln!(buffer, "    {line}");
        }
    }
    buffer.push_str("  </symbol>\n");
}

pub(crate) fn escape_xml(value: &str) -> Cow<'_, str> {
    if value
        .chars()
        .any(|character| matches!(character, '&' | '<' | '>' | '\"' | '\''))
    {
        let mut escaped = String::with_capacity(value.len());
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '\"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                other => escaped.push(other)
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}
