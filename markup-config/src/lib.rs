//! Shared configuration loader for markup-composer.
//!
//! `defaults/markup.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`ComposerConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use markup_composer::{Layout, LayoutPreset, LayoutSettings, XmlDeclaration};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/markup.default.toml");

/// Top-level configuration consumed by markup-composer applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ComposerConfig {
    pub layout: LayoutConfig,
    pub declaration: DeclarationConfig,
}

/// Layout knobs: a named preset, optionally adjusted field by field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub preset: Option<LayoutPreset>,
    #[serde(default)]
    pub indent_style: Option<String>,
    #[serde(default)]
    pub line_ending: Option<String>,
    #[serde(default)]
    pub line_wrap: Option<usize>,
}

impl LayoutConfig {
    /// The preset's settings with any explicitly set field applied on top.
    pub fn settings(&self) -> LayoutSettings {
        let preset = self.preset.unwrap_or(LayoutPreset::Readable);
        let mut settings = Layout::from(preset).settings();
        if let Some(indent_style) = &self.indent_style {
            settings.indent_style = indent_style.clone();
        }
        if let Some(line_ending) = &self.line_ending {
            settings.line_ending = line_ending.clone();
        }
        if let Some(line_wrap) = self.line_wrap {
            settings.line_wrap = line_wrap;
        }
        settings
    }
}

impl From<&LayoutConfig> for Layout {
    fn from(config: &LayoutConfig) -> Self {
        config.settings().into()
    }
}

impl From<LayoutConfig> for Layout {
    fn from(config: LayoutConfig) -> Self {
        Layout::from(&config)
    }
}

/// Controls the XML declaration placed ahead of a document.
#[derive(Debug, Clone, Deserialize)]
pub struct DeclarationConfig {
    pub enabled: bool,
    pub version: String,
    pub encoding: String,
    #[serde(default)]
    pub standalone: Option<bool>,
}

impl DeclarationConfig {
    /// The declaration to emit, or `None` when disabled.
    pub fn to_declaration(&self) -> Option<XmlDeclaration> {
        self.enabled.then(|| XmlDeclaration {
            version: self.version.clone(),
            encoding: self.encoding.clone(),
            standalone: self.standalone,
        })
    }
}

/// Builds a [`ComposerConfig`] from the embedded defaults plus whatever
/// layout and declaration settings the application layers on top.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// A loader holding only the embedded defaults: the readable preset and
    /// an enabled UTF-8 declaration.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file with `[layout]` and `[declaration]` tables. The file
    /// must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), true)
    }

    /// Layer a TOML file that may be absent, such as a per-user settings file.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), false)
    }

    fn with_toml(mut self, path: &Path, required: bool) -> Self {
        let toml = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(toml);
        self
    }

    /// Override one dotted key, e.g. `layout.line_wrap` or `declaration.enabled`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge every layer and deserialize the result.
    pub fn build(self) -> Result<ComposerConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The configuration with no user layers applied.
pub fn load_defaults() -> Result<ComposerConfig, ConfigError> {
    Loader::new().build()
}
