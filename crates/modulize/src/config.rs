//! Configuration for the modulize transform
//!
//! One [`LibraryConfig`] per targeted library, deserialized from
//! `modulize.toml`. Validation happens when a config is resolved into pass
//! options, before any traversal starts; a bad custom-name template or
//! conflicting casing flags never survive to the rewrite path.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use log::debug;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    dirs,
    naming::{CaseStrategy, CustomName},
    transform::Options,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// One entry per library whose aggregated imports should be rewritten.
    #[serde(default)]
    pub libraries: Vec<LibraryConfig>,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Layered discovery: explicit path, then `./modulize.toml`, then the
    /// user-level config file, then built-in defaults (no libraries).
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let project = Path::new("modulize.toml");
        if project.is_file() {
            debug!("using project config {}", project.display());
            return Self::load(project);
        }
        if let Ok(user) = dirs::user_config_file() {
            if user.is_file() {
                debug!("using user config {}", user.display());
                return Self::load(&user);
            }
        }
        Ok(Self::default())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryConfig {
    /// Import source string to intercept.
    pub library_name: String,

    /// Prefix for synthesized submodule imports.
    #[serde(default = "default_library_directory")]
    pub library_directory: String,

    /// Emit a parallel style-only import per component.
    #[serde(default)]
    pub style: bool,

    /// Directory for style imports; defaults to `library_directory`.
    #[serde(default)]
    pub style_library_directory: Option<String>,

    /// camelCase -> kebab-case component names. On unless disabled or
    /// superseded by the underline strategy.
    #[serde(default)]
    pub camel2dash_component_name: Option<bool>,

    /// camelCase -> snake_case component names.
    #[serde(default)]
    pub camel2underline_component_name: bool,

    /// Literal leaf path segment overriding default index resolution.
    #[serde(default)]
    pub file_name: Option<String>,

    /// Custom component-path mapping: a `{name}` template or a literal map.
    #[serde(default)]
    pub custom_name: Option<CustomNameConfig>,

    /// Custom style-path mapping, same forms as `custom_name`.
    #[serde(default)]
    pub custom_style_name: Option<CustomNameConfig>,

    /// Emit synthesized imports as default imports (documented default)
    /// rather than named ones.
    #[serde(default = "default_true")]
    pub transform_to_default_import: bool,
}

fn default_library_directory() -> String {
    "lib".to_owned()
}

fn default_true() -> bool {
    true
}

/// Serialized form of a custom name rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CustomNameConfig {
    /// Template containing a `{name}` placeholder.
    Template(String),
    /// Exported name -> path overrides; misses fall back to the strategy.
    Map(FxHashMap<String, String>),
}

impl CustomNameConfig {
    fn resolve(&self) -> Result<CustomName> {
        match self {
            CustomNameConfig::Template(template) => CustomName::template(template.clone()),
            CustomNameConfig::Map(entries) => Ok(CustomName::map(entries.clone())),
        }
    }
}

impl LibraryConfig {
    pub fn new(library_name: impl Into<String>) -> Self {
        Self {
            library_name: library_name.into(),
            library_directory: default_library_directory(),
            style: false,
            style_library_directory: None,
            camel2dash_component_name: None,
            camel2underline_component_name: false,
            file_name: None,
            custom_name: None,
            custom_style_name: None,
            transform_to_default_import: true,
        }
    }

    fn case_strategy(&self) -> Result<CaseStrategy> {
        if self.camel2underline_component_name {
            if self.camel2dash_component_name == Some(true) {
                bail!(
                    "library '{}' selects both camel2dash and camel2underline casing",
                    self.library_name
                );
            }
            return Ok(CaseStrategy::SnakeCase);
        }
        match self.camel2dash_component_name {
            Some(false) => Ok(CaseStrategy::Preserve),
            _ => Ok(CaseStrategy::KebabCase),
        }
    }

    /// Resolve into pass options, surfacing configuration errors now.
    pub fn resolve(&self) -> Result<Options> {
        if self.library_name.is_empty() {
            bail!("library_name must not be empty");
        }
        let custom_name = self
            .custom_name
            .as_ref()
            .map(CustomNameConfig::resolve)
            .transpose()
            .with_context(|| format!("invalid custom_name for '{}'", self.library_name))?;
        let custom_style_name = self
            .custom_style_name
            .as_ref()
            .map(CustomNameConfig::resolve)
            .transpose()
            .with_context(|| format!("invalid custom_style_name for '{}'", self.library_name))?;
        Ok(Options {
            library_name: self.library_name.clone(),
            library_directory: self.library_directory.clone(),
            style: self.style,
            style_library_directory: self.style_library_directory.clone(),
            case: self.case_strategy()?,
            file_name: self.file_name.clone(),
            custom_name,
            custom_style_name,
            transform_to_default_import: self.transform_to_default_import,
        })
    }
}
