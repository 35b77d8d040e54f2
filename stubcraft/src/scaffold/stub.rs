//! Stub templates and placeholder substitution
//!
//! A stub is a plain-text template identified by a template set and a stub name.
//! Placeholders take the form `{{token}}`. Substitution only replaces tokens it
//! is given; any other `{{...}}` is left as-is.
//!
//! Stubs are resolved in this order:
//!
//! 1. `<project templates dir>/<set>/<name>.stub`
//! 2. `<user templates dir>/<set>/<name>.stub`
//! 3. Built-in stubs (the `default` set only)

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

use crate::error::{GenerationError, Result};

/// Name of the built-in template set
pub const DEFAULT_TEMPLATE_SET: &str = "default";

/// File extension of stub files
pub const STUB_EXTENSION: &str = "stub";

/// Stubs compiled into the binary, keyed by stub name
const BUILTIN_STUBS: &[(&str, &str)] = &[(
    "form-request",
    include_str!("../../stubs/default/form-request.stub"),
)];

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_-]*)\}\}").expect("placeholder pattern is valid")
});

/// Where a stub body was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubOrigin {
    /// Read from a file on disk
    File(PathBuf),
    /// Compiled into the binary
    Builtin,
}

/// A loaded stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stub {
    /// Template set the stub belongs to
    pub template_set: String,
    /// Stub name (e.g., "form-request")
    pub name: String,
    /// Raw template body
    pub body: String,
    /// Where the body came from
    pub origin: StubOrigin,
}

/// Placeholder values keyed by token name (without braces)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    values: BTreeMap<String, String>,
}

impl Placeholders {
    /// Create an empty placeholder map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placeholder value
    #[must_use]
    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(token, value);
        self
    }

    /// Insert or replace a placeholder value
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.values.insert(token.into(), value.into());
    }

    /// Value for `token`, if any
    #[must_use]
    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    /// Token names in sorted order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Replace every known `{{token}}` in `body`
///
/// Unknown placeholders are left untouched. Substituted values are not
/// re-scanned, so a value containing `{{...}}` is inserted verbatim.
///
/// # Examples
///
/// ```
/// # use stubcraft::scaffold::stub::{substitute, Placeholders};
/// let placeholders = Placeholders::new().with("name", "World");
/// assert_eq!(substitute("Hello {{name}} {{other}}", &placeholders), "Hello World {{other}}");
/// ```
#[must_use]
pub fn substitute(body: &str, placeholders: &Placeholders) -> String {
    PLACEHOLDER
        .replace_all(body, |caps: &Captures<'_>| {
            placeholders
                .get(&caps[1])
                .map_or_else(|| caps[0].to_string(), str::to_string)
        })
        .into_owned()
}

/// Resolves stubs from template set directories
#[derive(Debug, Clone)]
pub struct StubRepository {
    roots: Vec<PathBuf>,
}

impl StubRepository {
    /// Create a repository searching `roots` in order
    #[must_use]
    pub const fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Directories searched for template sets, in priority order
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Load the stub `name` from `template_set`
    ///
    /// Stubs are read fresh on every call.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::NotFound`] if no root holds the stub and it is not built in
    /// - [`GenerationError::Io`] if a matching file cannot be read
    pub fn load(&self, template_set: &str, name: &str) -> Result<Stub> {
        let file_name = format!("{name}.{STUB_EXTENSION}");

        for root in &self.roots {
            let path = root.join(template_set).join(&file_name);
            if path.is_file() {
                let body = fs::read_to_string(&path).map_err(|e| GenerationError::io(&path, e))?;
                tracing::debug!(path = %path.display(), "loaded stub from disk");
                return Ok(Stub {
                    template_set: template_set.to_string(),
                    name: name.to_string(),
                    body,
                    origin: StubOrigin::File(path),
                });
            }
        }

        if template_set == DEFAULT_TEMPLATE_SET {
            if let Some((_, body)) = BUILTIN_STUBS.iter().find(|(stub, _)| *stub == name) {
                tracing::debug!(stub = name, "using built-in stub");
                return Ok(Stub {
                    template_set: template_set.to_string(),
                    name: name.to_string(),
                    body: (*body).to_string(),
                    origin: StubOrigin::Builtin,
                });
            }
        }

        let searched = self
            .roots
            .first()
            .map_or_else(|| PathBuf::from(template_set), |root| root.join(template_set))
            .join(file_name);
        Err(GenerationError::NotFound {
            what: "Stub",
            path: searched,
        })
    }

    /// Template sets available across all roots, plus the built-in set
    ///
    /// A template set is any directory directly under a root that contains at
    /// least one `.stub` file.
    #[must_use]
    pub fn template_sets(&self) -> Vec<String> {
        let mut sets = vec![DEFAULT_TEMPLATE_SET.to_string()];

        for root in &self.roots {
            for set in Self::sets_in(root) {
                if !sets.contains(&set) {
                    sets.push(set);
                }
            }
        }

        sets[1..].sort();
        sets
    }

    fn sets_in(root: &Path) -> Vec<String> {
        WalkDir::new(root)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry.path().extension().and_then(|e| e.to_str()) == Some(STUB_EXTENSION)
            })
            .filter_map(|entry| {
                entry
                    .path()
                    .parent()
                    .and_then(Path::file_name)
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_stub(root: &Path, set: &str, name: &str, body: &str) {
        let dir = root.join(set);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{name}.stub")), body).unwrap();
    }

    #[test]
    fn test_substitute_known_tokens() {
        let placeholders = Placeholders::new()
            .with("formRequestClass", "UpdateProfile")
            .with("rules", "[]");
        let out = substitute(
            "class {{formRequestClass}} { {{rules}} {{formRequestClass}} }",
            &placeholders,
        );
        assert_eq!(out, "class UpdateProfile { [] UpdateProfile }");
    }

    #[test]
    fn test_substitute_leaves_unknown_tokens() {
        let placeholders = Placeholders::new().with("rules", "[]");
        let out = substitute("{{rules}} {{modelName}} {{ spaced }} {single}", &placeholders);
        assert_eq!(out, "[] {{modelName}} {{ spaced }} {single}");
    }

    #[test]
    fn test_substitute_does_not_rescan_values() {
        let placeholders = Placeholders::new()
            .with("a", "{{b}}")
            .with("b", "nope");
        assert_eq!(substitute("{{a}}", &placeholders), "{{b}}");
    }

    #[test]
    fn test_substitute_without_matches_is_identity() {
        let body = "<?php\n// nothing to see {{here}}\n";
        assert_eq!(substitute(body, &Placeholders::new()), body);
    }

    #[test]
    fn test_load_builtin_default() {
        let repo = StubRepository::new(vec![]);
        let stub = repo.load(DEFAULT_TEMPLATE_SET, "form-request").unwrap();
        assert_eq!(stub.origin, StubOrigin::Builtin);
        assert!(stub.body.contains("{{formRequestClass}}"));
        assert!(stub.body.contains("{{rules}}"));
        assert!(stub.body.contains("{{namespace}}"));
    }

    #[test]
    fn test_disk_stub_overrides_builtin() {
        let dir = tempdir().unwrap();
        write_stub(dir.path(), "default", "form-request", "custom {{formRequestClass}}");

        let repo = StubRepository::new(vec![dir.path().to_path_buf()]);
        let stub = repo.load("default", "form-request").unwrap();
        assert_eq!(stub.body, "custom {{formRequestClass}}");
        assert!(matches!(stub.origin, StubOrigin::File(_)));
    }

    #[test]
    fn test_roots_searched_in_order() {
        let project = tempdir().unwrap();
        let user = tempdir().unwrap();
        write_stub(user.path(), "api", "form-request", "user");
        write_stub(project.path(), "api", "form-request", "project");

        let repo = StubRepository::new(vec![
            project.path().to_path_buf(),
            user.path().to_path_buf(),
        ]);
        assert_eq!(repo.load("api", "form-request").unwrap().body, "project");

        let repo = StubRepository::new(vec![user.path().to_path_buf()]);
        assert_eq!(repo.load("api", "form-request").unwrap().body, "user");
    }

    #[test]
    fn test_missing_stub_is_not_found() {
        let dir = tempdir().unwrap();
        let repo = StubRepository::new(vec![dir.path().to_path_buf()]);

        let err = repo.load("bootstrap", "form-request").unwrap_err();
        match err {
            GenerationError::NotFound { what, path } => {
                assert_eq!(what, "Stub");
                assert!(path.ends_with("bootstrap/form-request.stub"));
            }
            other => panic!("expected not found, got {other:?}"),
        }

        assert!(repo.load(DEFAULT_TEMPLATE_SET, "controller").is_err());
    }

    #[test]
    fn test_template_sets() {
        let dir = tempdir().unwrap();
        write_stub(dir.path(), "zeta", "form-request", "");
        write_stub(dir.path(), "alpha", "form-request", "");
        fs::create_dir_all(dir.path().join("empty")).unwrap();

        let repo = StubRepository::new(vec![dir.path().to_path_buf(), dir.path().join("absent")]);
        assert_eq!(repo.template_sets(), vec!["default", "alpha", "zeta"]);
    }
}
