// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Render-time reference to a sprite symbol.
//!
//! This is the boundary between the generated sprite and the UI: an icon is
//! requested by an identifier from the generated enumeration and rendered as
//! a `<use>` reference to the matching `icon-<name>` symbol.

use std::{borrow::Cow, fmt::Write as _};

use crate::{
    error::Error,
    sprite::{IconNames, SYMBOL_PREFIX, escape_xml}
};

/// Size applied to both the width and the height of a rendered icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSize {
    /// Size in pixels, rendered as `{n}px`.
    Pixels(u32),
    /// Pre-formatted CSS dimension such as `1.5rem`.
    Dimension(String)
}

impl Default for IconSize {
    fn default() -> Self {
        Self::Pixels(16)
    }
}

impl IconSize {
    /// Returns the CSS dimension for this size.
    pub fn to_css(&self) -> Cow<'_, str> {
        match self {
            Self::Pixels(pixels) => Cow::Owned(format!("{pixels}px")),
            Self::Dimension(value) => Cow::Borrowed(value.as_str())
        }
    }
}

impl From<u32> for IconSize {
    fn from(pixels: u32) -> Self {
        Self::Pixels(pixels)
    }
}

impl From<&str> for IconSize {
    fn from(value: &str) -> Self {
        Self::Dimension(value.to_owned())
    }
}

/// Reference to one icon of the sprite with optional presentation overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRef {
    name:  String,
    size:  IconSize,
    color: Option<String>,
    class: Option<String>
}

impl IconRef {
    /// Creates a reference to `name`, which must belong to `names`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when `name` is not a generated
    /// identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use icon_sprite::{IconNames, IconRef};
    ///
    /// let names: IconNames = ["board"].into_iter().collect();
    /// let icon = IconRef::checked("board", &names).expect("known icon").size(24_u32);
    /// assert_eq!(
    ///     icon.render(),
    ///     "<svg style=\"width: 24px; height: 24px; display: inline-block;\" data-testid=\"icon\"><use href=\"#icon-board\"/></svg>"
    /// );
    /// assert!(IconRef::checked("missing", &names).is_err());
    /// ```
    pub fn checked(name: &str, names: &IconNames) -> Result<Self, Error> {
        if !names.contains(name) {
            return Err(Error::validation(format!("unknown icon '{name}'")));
        }
        Ok(Self {
            name:  name.to_owned(),
            size:  IconSize::default(),
            color: None,
            class: None
        })
    }

    /// Overrides the rendered size.
    pub fn size(mut self, size: impl Into<IconSize>) -> Self {
        self.size = size.into();
        self
    }

    /// Overrides the color inherited by the symbol through `currentColor`.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Adds a CSS class to the rendered element.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Identifier of the referenced icon.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fragment reference to the symbol inside the sprite.
    pub fn href(&self) -> String {
        format!("#{SYMBOL_PREFIX}{}", self.name)
    }

    /// Renders the icon as an inline `<svg>` element referencing the sprite.
    pub fn render(&self) -> String {
        let dimension = self.size.to_css();
        let mut style = format!("width: {dimension}; height: {dimension};");
        if let Some(color) = self.color.as_deref() {
            let _ = write!(style, " color: {color};");
        }
        style.push_str(" display: inline-block;");

        let mut element = format!("<svg style=\"{}\"", escape_xml(&style));
        if let Some(class) = self.class.as_deref() {
            let _ = write!(element, " class=\"{}\"", escape_xml(class));
        }
        let _ = write!(
            element,
            " data-testid=\"icon\"><use href=\"{}\"/></svg>",
            escape_xml(&self.href())
        );
        element
    }
}
