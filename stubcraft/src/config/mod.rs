//! Configuration management for stubcraft
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `STUBCRAFT_` prefix)
//! 2. `./stubcraft.toml` in the project root, or the file passed with `--config`
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # stubcraft.toml
//! app_name = "Acme"
//! requests_path = "app/Http/Requests"
//! requests_namespace = "Http\\Requests"
//! templates_path = "resources/stubcraft-templates"
//! default_template = "default"
//! file_extension = "php"
//! rules_indent = 12
//! ```

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GenerationError, Result};

/// File name looked up in the project root
pub const CONFIG_FILE_NAME: &str = "stubcraft.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "STUBCRAFT_";

/// Complete stubcraft configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StubcraftConfig {
    /// Application identifier substituted for `{{appName}}`
    pub app_name: String,

    /// Directory, relative to the project root, receiving generated requests
    pub requests_path: PathBuf,

    /// Namespace suffix appended to the app name for `{{namespace}}`
    pub requests_namespace: String,

    /// Directory, relative to the project root, holding template sets
    pub templates_path: PathBuf,

    /// Template set used when `--template-name` is not given
    pub default_template: String,

    /// Extension of generated files (without the dot)
    pub file_extension: String,

    /// Indentation, in spaces, of the rendered rules literal
    pub rules_indent: usize,
}

impl Default for StubcraftConfig {
    fn default() -> Self {
        Self {
            app_name: "App".to_string(),
            requests_path: PathBuf::from("app/Http/Requests"),
            requests_namespace: "Http\\Requests".to_string(),
            templates_path: PathBuf::from("resources/stubcraft-templates"),
            default_template: "default".to_string(),
            file_extension: "php".to_string(),
            rules_indent: 12,
        }
    }
}

impl StubcraftConfig {
    /// Load configuration for a project
    ///
    /// Reads `explicit` when given, otherwise `<project_root>/stubcraft.toml` if it
    /// exists, then applies `STUBCRAFT_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NotFound`] when an explicit config file is missing
    /// and [`GenerationError::Config`] when a source cannot be deserialized.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let file = match explicit {
            Some(path) if !path.exists() => {
                return Err(GenerationError::NotFound {
                    what: "Config file",
                    path: path.to_path_buf(),
                });
            }
            Some(path) => path.to_path_buf(),
            None => project_root.join(CONFIG_FILE_NAME),
        };

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| GenerationError::Config(e.to_string()))
    }


    /// Namespace substituted for `{{namespace}}`
    #[must_use]
    pub fn namespace(&self) -> String {
        if self.requests_namespace.is_empty() {
            self.app_name.clone()
        } else {
            format!("{}\\{}", self.app_name, self.requests_namespace)
        }
    }

    /// Per-user template directory (`<config dir>/stubcraft/templates`)
    #[must_use]
    pub fn user_templates_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stubcraft").join("templates"))
    }
}
