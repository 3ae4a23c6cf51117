//! Resolver configuration.
//!
//! Read from `xref.json` at the project root, or from an `xref:` section in
//! `pubspec.yaml`. Every field is optional.
//!
//! ## Example
//!
//! ```json
//! {
//!   "resource_namespaces": ["R", "Assets"],
//!   "density_variants": false,
//!   "catalog_file": "lib/l10n/intl_en.arb",
//!   "suggestions": { "HomePage": "package:app/pages/home.dart" }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Name of the standalone configuration file.
pub const CONFIG_FILE: &str = "xref.json";

/// Configuration shared by every resolver of one project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct XrefConfig {
    /// Generated accessor classes that front asset paths (`R.image.logo`).
    pub resource_namespaces: Vec<String>,
    /// Probe `2.0x`-style directories before the base asset path.
    pub density_variants: bool,
    /// Localization accessor class (`S`).
    pub i18n_class: String,
    /// Field form of the accessor (`S.current.key`).
    pub i18n_field_accessor: String,
    /// Call form of the accessor (`S.of(context).key`).
    pub i18n_call_accessor: String,
    /// Primary catalog, relative to the project root.
    pub catalog_file: PathBuf,
    /// Sub-project with its own catalog at the same relative path.
    pub secondary_root: Option<PathBuf>,
    /// Member of a page class that lists its routes.
    pub route_member: String,
    /// Classes searched for routes when the enclosing class has none.
    pub route_tables: Vec<String>,
    /// Import suggestions for the project module: name -> library URI.
    pub suggestions: BTreeMap<String, String>,
}

impl Default for XrefConfig {
    fn default() -> Self {
        Self {
            resource_namespaces: vec!["R".to_string()],
            density_variants: true,
            i18n_class: "S".to_string(),
            i18n_field_accessor: "current".to_string(),
            i18n_call_accessor: "of".to_string(),
            catalog_file: PathBuf::from("lib/l10n/intl_en.arb"),
            secondary_root: Some(PathBuf::from("example")),
            route_member: "getPages".to_string(),
            route_tables: Vec::new(),
            suggestions: BTreeMap::new(),
        }
    }
}

/// Error reading a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid xref.json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid pubspec.yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Wrapper for the parts of `pubspec.yaml` the crate reads.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Pubspec {
    pub name: Option<String>,
    pub dependencies: BTreeMap<String, serde_yaml::Value>,
    pub xref: Option<XrefConfig>,
}

impl Pubspec {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not a map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn is_flutter(&self) -> bool {
        self.dependencies.contains_key("flutter")
    }
}

impl XrefConfig {
    /// Parse an `xref.json` document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Whether `name` is a configured resource namespace.
    pub fn is_resource_namespace(&self, name: &str) -> bool {
        self.resource_namespaces.iter().any(|ns| ns == name)
    }
}
