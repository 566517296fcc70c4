// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Build-time generation of an SVG icon sprite and its typed identifiers.
//!
//! Individual `.svg` files from one directory are merged into a single hidden
//! sprite document where every icon becomes a `<symbol id="icon-<name>">`.
//! Alongside the sprite a TypeScript module enumerates the valid identifiers
//! so UI code can only reference icons that exist. The same pipeline backs the
//! standalone generator, the build hook that inlines the sprite into the page,
//! and the development server that rebuilds on change.

mod config;
mod dev;
mod error;
mod extract;
mod file;
mod hook;
mod icon;
mod pipeline;
mod scan;
mod sprite;
mod types;

pub use config::{
    ConfigOverrides, DEFAULT_DEV_ADDRESS, DEFAULT_ICONS_DIR, DEFAULT_TYPES_OUTPUT,
    DevServerOptions, SpriteConfig, SpriteSettings,
};
pub use dev::{CLIENT_ROUTE, DevResponse, DevServer, RELOAD_ROUTE, SPRITE_ROUTE};
pub use error::{Error, io_error, write_error};
pub use extract::{DEFAULT_VIEW_BOX, Extractor, IconFragment};
pub use file::write_artifact;
pub use hook::BuildHook;
pub use icon::{IconRef, IconSize};
pub use pipeline::{GenerationReport, emit_artifacts, generate_sprite_data, run_generation};
pub use scan::{ICON_EXTENSION, IconSource, icon_name, scan_icon_directory};
pub use sprite::{IconNames, SYMBOL_PREFIX, SpriteBuild, assemble_sprite, write_sprite_file};
pub use types::{render_types_module, write_types_module};
