// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Build-time hook that inlines the sprite into the generated page.
//!
//! The hook runs the pipeline once when the build starts, keeps the result for
//! the duration of the build, and injects the sprite right after the opening
//! `<body>` tag of every page passed through
//! [`transform_index_html`](BuildHook::transform_index_html).

use std::borrow::Cow;

use regex::Regex;
use tracing::{debug, info};

use crate::{
    config::SpriteSettings,
    error::Error,
    pipeline::{GenerationReport, emit_artifacts, generate_sprite_data},
    sprite::SpriteBuild
};

const BODY_OPEN_PATTERN: &str = r"(?i)<body(?:\s[^>]*)?>";
const COMMENT_PATTERN: &str = r"(?s)<!--.*?-->";

/// Build-scoped cache around one pipeline run.
#[derive(Debug)]
pub struct BuildHook {
    settings:  SpriteSettings,
    body_open: Regex,
    comment:   Regex,
    cached:    Option<SpriteBuild>
}

impl BuildHook {
    /// Creates a hook for the provided settings. Nothing runs until
    /// [`build_start`](Self::build_start).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a page pattern fails to compile.
    pub fn new(settings: SpriteSettings) -> Result<Self, Error> {
        Ok(Self {
            settings,
            body_open: compile(BODY_OPEN_PATTERN)?,
            comment: compile(COMMENT_PATTERN)?,
            cached: None
        })
    }

    /// Runs the pipeline, writes the generated artifacts when icons were
    /// found, and caches the sprite for later page transforms.
    ///
    /// # Errors
    ///
    /// Propagates pipeline and artifact write failures. The cache is left
    /// unchanged in that case.
    pub fn build_start(&mut self) -> Result<GenerationReport, Error> {
        let build = generate_sprite_data(&self.settings.icons_dir)?;
        let report = emit_artifacts(&build, &self.settings)?;
        if !report.is_empty() {
            info!("Icon sprite: generated types for {} icon(s)", report.icon_names.len());
        }
        self.cached = Some(build);
        Ok(report)
    }

    /// Returns the sprite cached by the last [`build_start`](Self::build_start).
    pub fn sprite(&self) -> Option<&SpriteBuild> {
        self.cached.as_ref()
    }

    /// Injects the cached sprite after the first opening `<body>` tag.
    ///
    /// Tags inside HTML comments are not considered. The page is returned
    /// unchanged when no sprite is cached, the sprite is empty, or the page
    /// has no body tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use icon_sprite::{BuildHook, SpriteSettings};
    ///
    /// let hook = BuildHook::new(SpriteSettings::default()).expect("valid hook");
    /// let html = "<html><body></body></html>";
    /// assert_eq!(hook.transform_index_html(html), html);
    /// ```
    pub fn transform_index_html<'a>(&self, html: &'a str) -> Cow<'a, str> {
        let Some(build) = self.cached.as_ref().filter(|build| !build.sprite.is_empty()) else {
            return Cow::Borrowed(html);
        };

        let comments: Vec<_> = self.comment.find_iter(html).map(|m| m.range()).collect();
        let body = self
            .body_open
            .find_iter(html)
            .find(|candidate| !comments.iter().any(|range| range.contains(&candidate.start())));
        let Some(body) = body else {
            debug!("Page has no <body> tag, sprite not injected");
            return Cow::Borrowed(html);
        };

        let mut injected = String::with_capacity(html.len() + build.sprite.len() + 5);
        injected.push_str(&html[..body.end()]);
        injected.push_str("\n    ");
        injected.push_str(&build.sprite);
        injected.push_str(&html[body.end()..]);

        info!("Icon sprite: injected inline sprite ({} icons)", build.icon_names.len());
        Cow::Owned(injected)
    }
}

fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| Error::validation(format!("invalid regex: {e}")))
}
