//! Field sources
//!
//! Fields arrive either inline (`--fields`) or from a structured file
//! (`--fields-file`). Both adapters produce the same [`FieldCollection`], so
//! equivalent specs load to equal collections.
//!
//! # File Format
//!
//! JSON, either a bare array or wrapped in `{"fields": [...]}`:
//!
//! ```json
//! [
//!   {"name": "email", "type": "email", "unique": true, "table": "users"},
//!   {"name": "bio", "type": "text", "required": false}
//! ]
//! ```
//!
//! TOML, using `[[fields]]` tables:
//!
//! ```toml
//! [[fields]]
//! name = "email"
//! type = "email"
//! unique = true
//! table = "users"
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::field_type::{Constraints, Field, FieldCollection, FieldType, UniqueConstraint};
use crate::error::{GenerationError, Result};

/// Where the fields of a request come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Inline comma-separated spec
    Inline(String),
    /// Path to a JSON or TOML field file
    File(PathBuf),
    /// No fields given
    Empty,
}

impl FieldSource {
    /// Pick the field source from command input
    ///
    /// An inline spec wins over a fields file when both are given. Blank values
    /// count as absent.
    #[must_use]
    pub fn select(inline: Option<&str>, file: Option<&Path>) -> Self {
        let inline = inline.map(str::trim).filter(|s| !s.is_empty());
        let file = file.filter(|p| !p.as_os_str().is_empty());

        match (inline, file) {
            (Some(spec), Some(path)) => {
                tracing::warn!(
                    fields_file = %path.display(),
                    "both --fields and --fields-file given; using the inline fields"
                );
                Self::Inline(spec.to_string())
            }
            (Some(spec), None) => Self::Inline(spec.to_string()),
            (None, Some(path)) => Self::File(path.to_path_buf()),
            (None, None) => Self::Empty,
        }
    }

    /// Resolve a relative file path against the project root
    #[must_use]
    pub fn resolve(self, project_root: &Path) -> Self {
        match self {
            Self::File(path) if path.is_relative() => Self::File(project_root.join(path)),
            other => other,
        }
    }
}

/// Load the fields described by `source`
///
/// # Errors
///
/// - [`GenerationError::NotFound`] if a fields file does not exist
/// - [`GenerationError::Io`] if it cannot be read
/// - [`GenerationError::Parse`] if the spec or file is malformed
pub fn load_fields(source: &FieldSource) -> Result<FieldCollection> {
    match source {
        FieldSource::Inline(spec) => FieldCollection::parse_inline(spec),
        FieldSource::File(path) => load_fields_file(path),
        FieldSource::Empty => Ok(FieldCollection::default()),
    }
}

fn load_fields_file(path: &Path) -> Result<FieldCollection> {
    if !path.exists() {
        return Err(GenerationError::NotFound {
            what: "Fields file",
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| GenerationError::io(path, e))?;
    let token = path.display().to_string();

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let document: Value = if is_toml {
        toml::from_str(&content).map_err(|e| GenerationError::parse(&token, e.to_string()))?
    } else {
        serde_json::from_str(&content).map_err(|e| GenerationError::parse(&token, e.to_string()))?
    };

    let fields = field_entries(document)
        .map_err(|message| GenerationError::parse(&token, message))?
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let record: FieldRecord = serde_json::from_value(entry).map_err(|e| {
                GenerationError::parse(&token, format!("field #{}: {e}", index + 1))
            })?;
            Field::try_from(record)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(path = %token, count = fields.len(), "loaded fields file");
    FieldCollection::new(fields)
}

/// Field records of a fields file: a bare list or a `fields` list
fn field_entries(document: Value) -> std::result::Result<Vec<Value>, String> {
    match document {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut table) => {
            if let Some(key) = table.keys().find(|key| *key != "fields") {
                return Err(format!("unknown top-level key `{key}`, expected `fields`"));
            }
            match table.remove("fields") {
                Some(Value::Array(entries)) => Ok(entries),
                Some(_) => Err("`fields` must be a list of field records".to_string()),
                None => Err("missing `fields` list".to_string()),
            }
        }
        _ => Err("expected a list of field records".to_string()),
    }
}

/// One field as written in a fields file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldRecord {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default = "default_required")]
    required: bool,
    #[serde(default)]
    nullable: bool,
    #[serde(default)]
    unique: bool,
    table: Option<String>,
    column: Option<String>,
    max: Option<i64>,
    min: Option<i64>,
    pattern: Option<String>,
    references: Option<String>,
    references_column: Option<String>,
    #[serde(default)]
    primary: bool,
    #[serde(default)]
    indexed: bool,
}

const fn default_required() -> bool {
    true
}

impl TryFrom<FieldRecord> for Field {
    type Error = GenerationError;

    fn try_from(record: FieldRecord) -> Result<Self> {
        let field_type = match record.references.as_deref() {
            Some(model)
                if matches!(
                    record.field_type.to_lowercase().as_str(),
                    "references" | "belongs_to" | "relation"
                ) =>
            {
                if model.trim().is_empty() {
                    return Err(GenerationError::parse(
                        &record.name,
                        "reference needs a model name",
                    ));
                }
                FieldType::reference(model, record.references_column.as_deref())
            }
            _ => FieldType::parse(&record.field_type)?,
        };

        let unique = record.unique.then(|| UniqueConstraint {
            table: record.table.filter(|t| !t.is_empty()),
            column: record.column.filter(|c| !c.is_empty()),
        });

        let mut field = Self::new(record.name, field_type)?;
        field.nullable = record.nullable || !record.required;
        field.primary = record.primary;
        field.indexed = record.indexed;
        field.constraints = Constraints {
            max: record.max,
            min: record.min,
            pattern: record.pattern.filter(|p| !p.is_empty()),
            unique,
        };
        Ok(field)
    }
}
