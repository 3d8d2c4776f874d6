//! Component naming: casing strategies and custom name resolution
//!
//! Maps an exported identifier name to the submodule path that holds its
//! implementation. Custom naming is resolved into a concrete value once at
//! configuration time; traversal only ever calls pure functions.

use std::fmt;

use anyhow::{Result, bail};
use rustc_hash::FxHashMap;

/// Casing applied to an exported name to derive its submodule directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseStrategy {
    /// `TimePicker` -> `time-picker`
    #[default]
    KebabCase,
    /// `TimePicker` -> `time_picker`
    SnakeCase,
    /// Name used as-is.
    Preserve,
}

impl CaseStrategy {
    pub fn apply(self, name: &str) -> String {
        match self {
            CaseStrategy::KebabCase => camel_to_separated(name, '-'),
            CaseStrategy::SnakeCase => camel_to_separated(name, '_'),
            CaseStrategy::Preserve => name.to_owned(),
        }
    }
}

/// Each uppercase letter becomes `<sep><lowercase>`, except at the start.
fn camel_to_separated(name: &str, sep: char) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push(sep);
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// A user-supplied mapping from exported name to submodule path. All three
/// forms are normalized at construction; a miss (map without the key, or a
/// function returning `None`) falls back to the casing strategy.
pub enum CustomName {
    /// Literal per-name overrides.
    Map(FxHashMap<String, String>),
    /// Template with a `{name}` placeholder, e.g. `es/{name}/index`.
    Template(String),
    /// Arbitrary mapping function (programmatic API only).
    Func(Box<dyn Fn(&str) -> Option<String> + Send + Sync>),
}

impl CustomName {
    /// Validate a template; rejecting placeholder-less templates here keeps
    /// the failure at configuration time rather than mid-traversal.
    pub fn template(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains("{name}") {
            bail!("custom name template `{template}` does not contain a {{name}} placeholder");
        }
        Ok(CustomName::Template(template))
    }

    pub fn map(entries: FxHashMap<String, String>) -> Self {
        CustomName::Map(entries)
    }

    pub fn func(f: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        CustomName::Func(Box::new(f))
    }

    pub fn resolve(&self, name: &str) -> Option<String> {
        match self {
            CustomName::Map(entries) => entries.get(name).cloned(),
            CustomName::Template(template) => Some(template.replace("{name}", name)),
            CustomName::Func(f) => f(name),
        }
    }
}

impl fmt::Debug for CustomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomName::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            CustomName::Template(template) => f.debug_tuple("Template").field(template).finish(),
            CustomName::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Join path segments with `/`, skipping empty ones (an empty library
/// directory collapses instead of producing `lib//button`).
pub fn join_path(segments: &[&str]) -> String {
    let mut out = String::new();
    for segment in segments {
        if segment.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(segment);
    }
    out
}
