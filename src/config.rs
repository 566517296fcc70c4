// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Configuration document describing where icons live and where generated
//! artifacts go.
//!
//! The YAML document is optional. Every value can also be supplied on the
//! command line, and anything left unset falls back to the conventional
//! layout of the UI project. [`SpriteConfig::resolve`] merges the three
//! sources into concrete [`SpriteSettings`].

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    scan::icon_name,
};

/// Directory scanned for icon sources when nothing else is configured.
pub const DEFAULT_ICONS_DIR: &str = "src/shared/ui/Icon/assets";
/// Location of the generated identifier module when nothing else is
/// configured.
pub const DEFAULT_TYPES_OUTPUT: &str = "src/shared/ui/Icon/icon-names.ts";
/// Address the development server binds to by default.
pub const DEFAULT_DEV_ADDRESS: &str = "127.0.0.1:5174";

/// Root configuration document.
///
/// # Examples
///
/// ```
/// use icon_sprite::SpriteConfig;
///
/// let yaml = r#"
/// icons_dir: assets/icons
/// dev_server:
///   address: 0.0.0.0:8080
/// "#;
/// let config = SpriteConfig::parse(yaml,).expect("valid configuration",);
/// assert_eq!(config.icons_dir.as_deref(), Some(std::path::Path::new("assets/icons")));
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq,)]
#[serde(deny_unknown_fields)]
pub struct SpriteConfig
{
    /// Directory containing the individual `.svg` icon files.
    #[serde(default, alias = "icons-dir", alias = "iconsDir")]
    pub icons_dir: Option<PathBuf,>,

    /// Destination of the generated TypeScript identifier module.
    #[serde(default, alias = "types-output", alias = "typesOutput")]
    pub types_output: Option<PathBuf,>,

    /// Optional destination of a standalone sprite document.
    #[serde(default, alias = "sprite-output", alias = "spriteOutput")]
    pub sprite_output: Option<PathBuf,>,

    /// Optional development server overrides.
    #[serde(default, alias = "dev-server", alias = "devServer")]
    pub dev_server: Option<DevServerOptions,>,
}

/// Development server section of the configuration document.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq,)]
#[serde(deny_unknown_fields)]
pub struct DevServerOptions
{
    /// Socket address, for example `127.0.0.1:5174`.
    #[serde(default)]
    pub address: Option<String,>,
}

/// Values supplied on the command line. They take precedence over the
/// configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct ConfigOverrides
{
    /// Icon directory override.
    pub icons_dir:     Option<PathBuf,>,
    /// Identifier module override.
    pub types_output:  Option<PathBuf,>,
    /// Standalone sprite override.
    pub sprite_output: Option<PathBuf,>,
    /// Development server address override.
    pub dev_address:   Option<String,>,
}

/// Fully resolved settings consumed by the pipeline and the hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct SpriteSettings
{
    /// Directory scanned for icon sources.
    pub icons_dir:     PathBuf,
    /// Destination of the generated identifier module.
    pub types_output:  PathBuf,
    /// Destination of the standalone sprite, when requested.
    pub sprite_output: Option<PathBuf,>,
    /// Address the development server binds to.
    pub dev_address:   String,
}

impl Default for SpriteSettings
{
    fn default() -> Self
    {
        Self {
            icons_dir:     PathBuf::from(DEFAULT_ICONS_DIR,),
            types_output:  PathBuf::from(DEFAULT_TYPES_OUTPUT,),
            sprite_output: None,
            dev_address:   DEFAULT_DEV_ADDRESS.to_owned(),
        }
    }
}

impl SpriteConfig
{
    /// Loads the configuration document from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the file cannot be read and
    /// [`Error::Parse`] when it is not a valid document.
    pub fn load(path: &Path,) -> Result<Self, Error,>
    {
        let contents =
            fs::read_to_string(path,).map_err(|source| error::config_error(path, source,),)?;
        Self::parse(&contents,)
    }

    /// Parses a configuration document. A blank document yields the default
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the YAML cannot be decoded or contains
    /// unknown keys.
    pub fn parse(contents: &str,) -> Result<Self, Error,>
    {
        if contents.trim().is_empty() {
            return Ok(Self::default(),);
        }
        Ok(serde_yaml::from_str(contents,)?,)
    }

    /// Merges the document with command line overrides and built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when a path is blank, when the standalone
    /// sprite would be written into the icon directory as an icon source, or
    /// when the development server address is blank or contains whitespace.
    pub fn resolve(&self, overrides: &ConfigOverrides,) -> Result<SpriteSettings, Error,>
    {
        let icons_dir = pick_path(
            overrides.icons_dir.as_ref(),
            self.icons_dir.as_ref(),
            DEFAULT_ICONS_DIR,
            "icons_dir",
        )?;
        let types_output = pick_path(
            overrides.types_output.as_ref(),
            self.types_output.as_ref(),
            DEFAULT_TYPES_OUTPUT,
            "types_output",
        )?;

        let sprite_output = overrides
            .sprite_output
            .as_ref()
            .or(self.sprite_output.as_ref(),)
            .map(|path| normalize_path_like(path, "sprite_output",),)
            .transpose()?;
        if let Some(path,) = sprite_output.as_deref() {
            reject_scanned_output(path, &icons_dir,)?;
        }

        let configured_address =
            self.dev_server.as_ref().and_then(|server| server.address.as_deref(),);
        let dev_address = normalize_address(
            overrides.dev_address.as_deref().or(configured_address,).unwrap_or(DEFAULT_DEV_ADDRESS,),
        )?;

        Ok(SpriteSettings {
            icons_dir,
            types_output,
            sprite_output,
            dev_address,
        },)
    }
}

fn pick_path(
    cli: Option<&PathBuf,>,
    document: Option<&PathBuf,>,
    fallback: &str,
    field: &str,
) -> Result<PathBuf, Error,>
{
    match cli.or(document,) {
        Some(path,) => normalize_path_like(path, field,),
        None => Ok(PathBuf::from(fallback,),),
    }
}

/// Validates path-like values supplied by the user.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the value is blank after trimming
/// whitespace.
fn normalize_path_like(input: &Path, field: &str,) -> Result<PathBuf, Error,>
{
    let text = input.to_string_lossy();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty"),),);
    }
    if trimmed.len() == text.len() {
        Ok(input.to_path_buf(),)
    } else {
        Ok(PathBuf::from(trimmed,),)
    }
}

/// A sprite written next to the icon sources would be scanned as an icon on
/// the next run and, under the dev server, retrigger a rebuild on every write.
fn reject_scanned_output(sprite_output: &Path, icons_dir: &Path,) -> Result<(), Error,>
{
    let scanned = sprite_output
        .file_name()
        .and_then(|name| name.to_str(),)
        .and_then(icon_name,)
        .is_some();
    let parent = sprite_output.parent().unwrap_or_else(|| Path::new("",),);
    if scanned && lexical(parent,) == lexical(icons_dir,) {
        return Err(Error::validation(format!(
            "sprite_output {} must not be inside icons_dir {}",
            sprite_output.display(),
            icons_dir.display()
        ),),);
    }
    Ok((),)
}

fn lexical(path: &Path,) -> PathBuf
{
    path.components().filter(|component| !matches!(component, Component::CurDir),).collect()
}

fn normalize_address(input: &str,) -> Result<String, Error,>
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("dev_server.address cannot be empty",),);
    }
    if trimmed.chars().any(char::is_whitespace,) {
        return Err(Error::validation("dev_server.address cannot contain whitespace",),);
    }
    Ok(trimmed.to_owned(),)
}

#[cfg(test)]
mod tests
{
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_configured()
    {
        let settings = SpriteConfig::default()
            .resolve(&ConfigOverrides::default(),)
            .expect("defaults must resolve",);
        assert_eq!(settings, SpriteSettings::default());
    }

    #[test]
    fn blank_document_parses_to_default()
    {
        let config = SpriteConfig::parse("  \n",).expect("blank document is valid",);
        assert_eq!(config, SpriteConfig::default());
    }

    #[test]
    fn document_accepts_camel_case_aliases()
    {
        let yaml = r#"
iconsDir: assets/icons
typesOutput: src/icons.ts
spriteOutput: public/sprite.svg
devServer:
  address: localhost:3000
"#;
        let settings = SpriteConfig::parse(yaml,)
            .expect("valid configuration",)
            .resolve(&ConfigOverrides::default(),)
            .expect("valid settings",);

        assert_eq!(settings.icons_dir, PathBuf::from("assets/icons"));
        assert_eq!(settings.types_output, PathBuf::from("src/icons.ts"));
        assert_eq!(settings.sprite_output, Some(PathBuf::from("public/sprite.svg")));
        assert_eq!(settings.dev_address, "localhost:3000");
    }

    #[test]
    fn overrides_take_precedence_over_document()
    {
        let config = SpriteConfig::parse("icons_dir: from-config\n",).expect("valid",);
        let overrides = ConfigOverrides {
            icons_dir: Some(PathBuf::from("from-cli",),),
            dev_address: Some(" 0.0.0.0:9000 ".to_owned(),),
            ..ConfigOverrides::default()
        };

        let settings = config.resolve(&overrides,).expect("valid settings",);
        assert_eq!(settings.icons_dir, PathBuf::from("from-cli"));
        assert_eq!(settings.dev_address, "0.0.0.0:9000");
    }

    #[test]
    fn unknown_keys_are_rejected()
    {
        let error = SpriteConfig::parse("icon_dir: typo\n",).expect_err("expected parse error",);
        assert!(matches!(error, Error::Parse { .. }));
    }

    #[test]
    fn blank_paths_are_rejected()
    {
        let config = SpriteConfig::parse("types_output: '   '\n",).expect("valid yaml",);
        let error = config.resolve(&ConfigOverrides::default(),).expect_err("expected error",);
        match error {
            Error::Validation {
                message,
            } => assert_eq!(message, "types_output cannot be empty"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn whitespace_in_address_is_rejected()
    {
        let overrides = ConfigOverrides {
            dev_address: Some("127.0.0.1 5174".to_owned(),),
            ..ConfigOverrides::default()
        };
        let error = SpriteConfig::default().resolve(&overrides,).expect_err("expected error",);
        assert!(error.to_string().contains("cannot contain whitespace"));
    }

    #[test]
    fn sprite_output_inside_icons_dir_is_rejected()
    {
        let config = SpriteConfig::parse(
            "icons_dir: assets/icons\nsprite_output: ./assets/icons/sprite.svg\n",
        )
        .expect("valid yaml",);
        let error = config.resolve(&ConfigOverrides::default(),).expect_err("expected error",);
        match error {
            Error::Validation {
                message,
            } => assert!(message.contains("must not be inside icons_dir"), "{message}"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn sprite_output_beside_icons_dir_is_accepted()
    {
        let overrides = ConfigOverrides {
            icons_dir: Some(PathBuf::from("assets/icons",),),
            sprite_output: Some(PathBuf::from("assets/sprite.svg",),),
            ..ConfigOverrides::default()
        };
        let settings = SpriteConfig::default().resolve(&overrides,).expect("valid settings",);
        assert_eq!(settings.sprite_output, Some(PathBuf::from("assets/sprite.svg")));

        let non_icon = ConfigOverrides {
            sprite_output: Some(PathBuf::from("assets/icons/sprite.svg.txt",),),
            ..overrides
        };
        assert!(SpriteConfig::default().resolve(&non_icon,).is_ok());
    }

    #[test]
    fn load_reports_missing_file()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let error = SpriteConfig::load(&temp.path().join("icon-sprite.yaml",),)
            .expect_err("expected config error",);
        assert!(matches!(error, Error::Config { .. }));
    }

    #[test]
    fn load_reads_document_from_disk()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("icon-sprite.yaml",);
        fs::write(&path, "sprite_output: dist/sprite.svg\n",).expect("failed to write config",);

        let config = SpriteConfig::load(&path,).expect("valid configuration",);
        assert_eq!(config.sprite_output, Some(PathBuf::from("dist/sprite.svg")));
    }
}
