//! Field type definitions and inline parser
//!
//! This module provides the field model consumed by the rule deriver and the
//! parser for the inline `--fields` grammar.
//!
//! # Inline Grammar
//!
//! Fields are separated by commas, parts of a field by colons:
//!
//! ```text
//! name:type[:modifier]*
//! ```
//!
//! Separators inside parentheses are not split, so `regex(^[a-z,]+$)` is a single
//! modifier.
//!
//! ## Types
//! - `string`, `text`, `integer` (`int`), `bigint`, `boolean` (`bool`),
//!   `decimal`, `float` (`double`), `date`, `datetime` (`timestamp`), `time`,
//!   `email`, `uuid`, `json`
//! - `references:Model` / `belongs_to:Model` - relation to `models.id`
//! - `references(Model.column)` - relation to an explicit column
//!
//! ## Modifiers
//! - `optional` / `nullable` - no `required` rule
//! - `unique`, `unique(table)`, `unique(table.column)` - uniqueness rule
//! - `indexed` / `index` - database index hint
//! - `primary` - primary key, skipped by the rule deriver
//! - `max(n)`, `min(n)` - bounds
//! - `regex(pattern)` - format rule
//!
//! # Examples
//!
//! ```text
//! email:email:unique(users)        → required|email|unique:users,email
//! bio:text:nullable                → (no rules)
//! age:integer:min(18):max(130)     → required|integer|max:130|min:18
//! author:references:User           → required|integer|exists:users,id
//! ```

use std::collections::HashSet;
use std::fmt;

use super::helpers::NamingHelpers;
use crate::error::{GenerationError, Result};

/// Represents one field of a generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name (e.g., "email", "`published_at`")
    pub name: String,
    /// Semantic data type
    pub field_type: FieldType,
    /// Whether the field may be omitted
    pub nullable: bool,
    /// Whether the field is the record's primary key
    pub primary: bool,
    /// Whether the field is indexed
    pub indexed: bool,
    /// Validation facets
    pub constraints: Constraints,
}

/// Validation facets attached to a field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    /// Upper bound (length for strings, value for numbers)
    pub max: Option<i64>,
    /// Lower bound (length for strings, value for numbers)
    pub min: Option<i64>,
    /// Regular expression the value must match
    pub pattern: Option<String>,
    /// Uniqueness constraint
    pub unique: Option<UniqueConstraint>,
}

/// Uniqueness constraint, falling back to request defaults for missing parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniqueConstraint {
    /// Table checked for duplicates
    pub table: Option<String>,
    /// Column checked for duplicates (defaults to the field name)
    pub column: Option<String>,
}

/// Field type enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Short string
    String,
    /// Free text
    Text,
    /// 32-bit integer
    Integer,
    /// 64-bit integer
    BigInt,
    /// Boolean
    Boolean,
    /// Fixed-point decimal
    Decimal,
    /// Floating point number
    Float,
    /// Date (no time)
    Date,
    /// Date and time
    DateTime,
    /// Time of day
    Time,
    /// Email address
    Email,
    /// UUID
    Uuid,
    /// JSON document
    Json,
    /// Foreign key reference to another table
    Reference {
        /// Referenced table (e.g., "users")
        table: String,
        /// Referenced column (e.g., "id")
        column: String,
    },
}

impl FieldType {
    /// Build a reference to `model`, defaulting the column to `id`
    #[must_use]
    pub fn reference(model: &str, column: Option<&str>) -> Self {
        Self::Reference {
            table: NamingHelpers::to_table_name(model.trim()),
            column: column.map_or_else(|| "id".to_string(), |c| c.trim().to_string()),
        }
    }

    /// Parse a complete type expression such as `string` or `references:User`
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Parse`] for unknown or malformed types.
    pub fn parse(input: &str) -> Result<Self> {
        let parts = split_top_level(input, ':')?;
        let (field_type, consumed) = Self::parse_parts(&parts)?;
        if consumed != parts.len() {
            return Err(GenerationError::parse(
                input,
                "unexpected trailing parts after type",
            ));
        }
        Ok(field_type)
    }

    /// Parse the type at the start of `parts`, returning how many parts it used
    fn parse_parts(parts: &[&str]) -> Result<(Self, usize)> {
        let Some(head) = parts.first().map(|p| p.trim()) else {
            return Err(GenerationError::parse("", "missing field type"));
        };

        if let Some(args) = call_args(head, &["references", "belongs_to", "relation"])? {
            let (model, column) = split_qualified(args);
            if model.is_empty() {
                return Err(GenerationError::parse(head, "reference needs a model name"));
            }
            return Ok((Self::reference(model, column), 1));
        }

        match head.to_lowercase().as_str() {
            "references" | "belongs_to" | "relation" => {
                let model = parts.get(1).map_or("", |m| m.trim());
                if model.is_empty() || is_modifier(model) {
                    return Err(GenerationError::parse(
                        format!("{head}:{model}"),
                        "reference needs a model name before any modifier (e.g. references:User)",
                    ));
                }
                Ok((Self::reference(model, None), 2))
            }
            "string" | "varchar" => Ok((Self::String, 1)),
            "text" => Ok((Self::Text, 1)),
            "integer" | "int" => Ok((Self::Integer, 1)),
            "bigint" | "biginteger" => Ok((Self::BigInt, 1)),
            "boolean" | "bool" => Ok((Self::Boolean, 1)),
            "decimal" => Ok((Self::Decimal, 1)),
            "float" | "double" => Ok((Self::Float, 1)),
            "date" => Ok((Self::Date, 1)),
            "datetime" | "timestamp" => Ok((Self::DateTime, 1)),
            "time" => Ok((Self::Time, 1)),
            "email" => Ok((Self::Email, 1)),
            "uuid" => Ok((Self::Uuid, 1)),
            "json" => Ok((Self::Json, 1)),
            unknown => Err(GenerationError::parse(
                unknown,
                "unknown field type. Supported types: string, text, integer, bigint, boolean, decimal, float, date, datetime, time, email, uuid, json, references:Model",
            )),
        }
    }
}

impl Field {
    /// Create a required, unconstrained field
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Parse`] if `name` is not a valid identifier.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            field_type,
            nullable: false,
            primary: false,
            indexed: false,
            constraints: Constraints::default(),
        })
    }

    /// Parse a field definition from the inline grammar
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubcraft::scaffold::field_type::Field;
    /// let field = Field::parse("title:string:max(255)").unwrap();
    /// assert_eq!(field.name, "title");
    /// assert_eq!(field.constraints.max, Some(255));
    ///
    /// let field = Field::parse("bio:text:nullable").unwrap();
    /// assert!(field.nullable);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Parse`] if:
    /// - The definition has fewer than 2 parts (missing name or type)
    /// - The name is not a valid identifier
    /// - The type or a modifier is unknown
    /// - A constraint expression is unterminated or has a bad argument
    pub fn parse(input: &str) -> Result<Self> {
        let parts = split_top_level(input, ':')?;

        if parts.len() < 2 {
            return Err(GenerationError::parse(
                input,
                "expected format name:type[:modifiers]",
            ));
        }

        let (field_type, consumed) = FieldType::parse_parts(&parts[1..])?;
        let mut field = Self::new(parts[0].trim(), field_type)?;

        for modifier in &parts[1 + consumed..] {
            field.apply_modifier(modifier.trim())?;
        }

        Ok(field)
    }

    fn apply_modifier(&mut self, modifier: &str) -> Result<()> {
        if let Some(args) = call_args(modifier, &["unique"])? {
            let (table, column) = split_qualified(args);
            self.constraints.unique = Some(UniqueConstraint {
                table: Some(table.to_string()).filter(|t| !t.is_empty()),
                column: column.map(str::to_string),
            });
            return Ok(());
        }
        if let Some(args) = call_args(modifier, &["max"])? {
            self.constraints.max = Some(parse_bound(modifier, args)?);
            return Ok(());
        }
        if let Some(args) = call_args(modifier, &["min"])? {
            self.constraints.min = Some(parse_bound(modifier, args)?);
            return Ok(());
        }
        if let Some(args) = call_args(modifier, &["regex", "pattern"])? {
            if args.is_empty() {
                return Err(GenerationError::parse(modifier, "empty regex pattern"));
            }
            self.constraints.pattern = Some(args.to_string());
            return Ok(());
        }

        match modifier.to_lowercase().as_str() {
            "optional" | "nullable" => self.nullable = true,
            "required" => self.nullable = false,
            "unique" => self.constraints.unique = Some(UniqueConstraint::default()),
            "indexed" | "index" => self.indexed = true,
            "primary" => self.primary = true,
            _ => {
                return Err(GenerationError::parse(
                    modifier,
                    "unknown modifier. Valid modifiers: optional, nullable, required, unique, indexed, primary, max(n), min(n), regex(pattern)",
                ));
            }
        }
        Ok(())
    }
}

/// Ordered collection of fields with unique names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCollection {
    fields: Vec<Field>,
}

impl FieldCollection {
    /// Build a collection, rejecting duplicate names
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Parse`] naming the first duplicated field.
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(GenerationError::parse(
                    &field.name,
                    "duplicate field name",
                ));
            }
        }
        Ok(Self { fields })
    }

    /// Parse a comma-separated inline field spec
    ///
    /// Empty entries are ignored, so an empty spec yields an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Parse`] for any malformed field.
    pub fn parse_inline(spec: &str) -> Result<Self> {
        let fields = split_top_level(spec, ',')?
            .into_iter()
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(Field::parse)
            .collect::<Result<Vec<_>>>()?;
        Self::new(fields)
    }

    /// Iterate fields in source order
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the collection holds no field
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldCollection {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Modifier names, bare or called
const MODIFIER_KEYWORDS: &[&str] = &[
    "optional", "nullable", "required", "unique", "indexed", "index", "primary", "max", "min",
    "regex", "pattern",
];

fn is_modifier(token: &str) -> bool {
    let keyword = token.split_once('(').map_or(token, |(callee, _)| callee).trim();
    MODIFIER_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(keyword))
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(GenerationError::parse(name, "field name cannot be empty"));
    }
    if !NamingHelpers::is_identifier(name) {
        return Err(GenerationError::parse(
            name,
            "field name must be a valid identifier (letters, digits, underscore)",
        ));
    }
    Ok(())
}

fn parse_bound(modifier: &str, args: &str) -> Result<i64> {
    args.trim()
        .parse()
        .map_err(|_| GenerationError::parse(modifier, "bound must be an integer"))
}

/// Split `table.column` style arguments
fn split_qualified(args: &str) -> (&str, Option<&str>) {
    match args.split_once('.') {
        Some((head, tail)) if !tail.trim().is_empty() => (head.trim(), Some(tail.trim())),
        Some((head, _)) => (head.trim(), None),
        None => (args.trim(), None),
    }
}

/// Extract `args` from `name(args)` when `input` is a call to one of `names`
///
/// Returns `Ok(None)` when `input` is not a call to any of them.
fn call_args<'a>(input: &'a str, names: &[&str]) -> Result<Option<&'a str>> {
    let Some(open) = input.find('(') else {
        return Ok(None);
    };
    let callee = input[..open].trim();
    if !names.iter().any(|n| n.eq_ignore_ascii_case(callee)) {
        return Ok(None);
    }
    let Some(args) = input[open + 1..].strip_suffix(')') else {
        return Err(GenerationError::parse(
            input,
            "unterminated constraint expression",
        ));
    };
    Ok(Some(args))
}

/// Split on `separator`, ignoring separators nested inside parentheses
///
/// # Errors
///
/// Returns [`GenerationError::Parse`] when parentheses are unbalanced.
pub fn split_top_level(input: &str, separator: char) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    GenerationError::parse(&input[start..], "unbalanced ')'")
                })?;
            }
            c if c == separator && depth == 0 => {
                parts.push(&input[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }

    if depth > 0 {
        return Err(GenerationError::parse(
            &input[start..],
            "unterminated constraint expression",
        ));
    }

    parts.push(&input[start..]);
    Ok(parts)
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.field_type)?;
        if self.nullable {
            write!(f, ":nullable")?;
        }
        if self.primary {
            write!(f, ":primary")?;
        }
        if self.indexed {
            write!(f, ":indexed")?;
        }
        if let Some(max) = self.constraints.max {
            write!(f, ":max({max})")?;
        }
        if let Some(min) = self.constraints.min {
            write!(f, ":min({min})")?;
        }
        if let Some(pattern) = &self.constraints.pattern {
            write!(f, ":regex({pattern})")?;
        }
        match &self.constraints.unique {
            Some(UniqueConstraint {
                table: Some(table),
                column: Some(column),
            }) => write!(f, ":unique({table}.{column})")?,
            Some(UniqueConstraint {
                table: Some(table),
                column: None,
            }) => write!(f, ":unique({table})")?,
            Some(UniqueConstraint {
                table: None,
                column: Some(column),
            }) => write!(f, ":unique(.{column})")?,
            Some(_) => write!(f, ":unique")?,
            None => {}
        }
        Ok(())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Text => write!(f, "text"),
            Self::Integer => write!(f, "integer"),
            Self::BigInt => write!(f, "bigint"),
            Self::Boolean => write!(f, "boolean"),
            Self::Decimal => write!(f, "decimal"),
            Self::Float => write!(f, "float"),
            Self::Date => write!(f, "date"),
            Self::DateTime => write!(f, "datetime"),
            Self::Time => write!(f, "time"),
            Self::Email => write!(f, "email"),
            Self::Uuid => write!(f, "uuid"),
            Self::Json => write!(f, "json"),
            Self::Reference { table, column } => write!(f, "references({table}.{column})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_string() {
        let field = Field::parse("title:string").unwrap();
        assert_eq!(field.name, "title");
        assert_eq!(field.field_type, FieldType::String);
        assert!(!field.nullable);
        assert!(!field.primary);
        assert_eq!(field.constraints, Constraints::default());
    }

    #[test]
    fn test_parse_nullable_aliases() {
        assert!(Field::parse("bio:text:nullable").unwrap().nullable);
        assert!(Field::parse("bio:text:optional").unwrap().nullable);
        assert!(!Field::parse("bio:text:optional:required").unwrap().nullable);
    }

    #[test]
    fn test_parse_bounds_and_pattern() {
        let field = Field::parse("code:string:min(2):max(8):regex(^[A-Z]{2,8}$)").unwrap();
        assert_eq!(field.constraints.min, Some(2));
        assert_eq!(field.constraints.max, Some(8));
        assert_eq!(field.constraints.pattern.as_deref(), Some("^[A-Z]{2,8}$"));
    }

    #[test]
    fn test_parse_pattern_with_separators() {
        let fields =
            FieldCollection::parse_inline("slug:string:regex(^[a-z:,-]+$),title:string").unwrap();
        assert_eq!(fields.len(), 2);
        let slug = fields.iter().next().unwrap();
        assert_eq!(slug.constraints.pattern.as_deref(), Some("^[a-z:,-]+$"));
    }

    #[test]
    fn test_parse_unique_variants() {
        let bare = Field::parse("email:email:unique").unwrap();
        assert_eq!(bare.constraints.unique, Some(UniqueConstraint::default()));

        let table = Field::parse("email:email:unique(users)").unwrap();
        assert_eq!(
            table.constraints.unique,
            Some(UniqueConstraint {
                table: Some("users".to_string()),
                column: None,
            })
        );

        let qualified = Field::parse("login:string:unique(accounts.email)").unwrap();
        assert_eq!(
            qualified.constraints.unique,
            Some(UniqueConstraint {
                table: Some("accounts".to_string()),
                column: Some("email".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_reference_forms() {
        let colon = Field::parse("author:references:User").unwrap();
        assert_eq!(
            colon.field_type,
            FieldType::Reference {
                table: "users".to_string(),
                column: "id".to_string(),
            }
        );

        let call = Field::parse("owner:references(UserProfile.uuid):nullable").unwrap();
        assert_eq!(
            call.field_type,
            FieldType::Reference {
                table: "user_profiles".to_string(),
                column: "uuid".to_string(),
            }
        );
        assert!(call.nullable);

        assert!(Field::parse("post:belongs_to:Post").is_ok());
    }

    #[test]
    fn test_parse_reference_irregular_plurals() {
        let model = Field::parse("author:references:Person").unwrap();
        assert_eq!(model.field_type, FieldType::reference("Person", None));
        assert_eq!(
            model.field_type,
            FieldType::Reference {
                table: "people".to_string(),
                column: "id".to_string(),
            }
        );

        let table = Field::parse("owner:references(people.id)").unwrap();
        assert_eq!(
            table.field_type,
            FieldType::Reference {
                table: "people".to_string(),
                column: "id".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_reference_rejects_modifier_as_model() {
        for spec in [
            "x:references:nullable",
            "x:belongs_to:unique",
            "x:references:max(3)",
            "x:relation:Primary",
        ] {
            let err = Field::parse(spec).unwrap_err();
            assert!(
                err.to_string().contains("reference needs a model name"),
                "{spec}: {err}"
            );
        }
    }

    #[test]
    fn test_parse_primary_and_indexed() {
        let field = Field::parse("id:bigint:primary:index").unwrap();
        assert!(field.primary);
        assert!(field.indexed);
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(Field::parse("invalid").is_err());
        assert!(Field::parse(":string").is_err());
        assert!(Field::parse("title:").is_err());
        assert!(Field::parse("author:references").is_err());
    }

    #[test]
    fn test_parse_invalid_field_name() {
        assert!(Field::parse("123invalid:string").is_err());
        assert!(Field::parse("invalid-name:string").is_err());
    }

    #[test]
    fn test_parse_unknown_type_names_token() {
        let err = Field::parse("age:number").unwrap_err();
        match err {
            GenerationError::Parse { token, .. } => assert_eq!(token, "number"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_invalid_modifier() {
        assert!(Field::parse("field:string:sparkly").is_err());
        assert!(Field::parse("field:string:max(lots)").is_err());
        assert!(Field::parse("field:string:regex()").is_err());
    }

    #[test]
    fn test_unterminated_constraint_expression() {
        let err = Field::parse("code:string:max(255").unwrap_err();
        assert!(err.to_string().contains("unterminated constraint expression"));

        assert!(FieldCollection::parse_inline("code:string:regex(^a, name:string").is_err());
        assert!(FieldCollection::parse_inline("code:string:max(2))").is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = FieldCollection::parse_inline("email:email,email:string").unwrap_err();
        match err {
            GenerationError::Parse { token, message } => {
                assert_eq!(token, "email");
                assert!(message.contains("duplicate"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_inline_preserves_order_and_skips_blanks() {
        let fields = FieldCollection::parse_inline(" title:string , , body:text ,").unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "body"]);
        assert!(FieldCollection::parse_inline("").unwrap().is_empty());
    }

    #[test]
    fn test_type_parse_rejects_trailing_parts() {
        assert_eq!(
            FieldType::parse("references:User").unwrap(),
            FieldType::reference("User", None)
        );
        assert!(FieldType::parse("string:extra").is_err());
    }

    #[test]
    fn test_display_is_parseable() {
        let field = Field::parse("email:email:nullable:unique(users.mail):max(120)").unwrap();
        assert_eq!(
            field.to_string(),
            "email:email:nullable:max(120):unique(users.mail)"
        );
        assert_eq!(Field::parse(&field.to_string()).unwrap(), field);
    }

    #[test]
    fn test_display_round_trips() {
        for spec in [
            "author:references:Person",
            "owner:references(people.uuid):nullable",
            "parent:belongs_to:Category:indexed",
            "login:string:unique(.mail)",
            "code:string:primary:min(2):regex(^[a-z:,]+$):unique",
        ] {
            let field = Field::parse(spec).unwrap();
            assert_eq!(Field::parse(&field.to_string()).unwrap(), field, "{spec}");
        }
    }

    #[test]
    fn test_display_column_only_unique() {
        let mut field = Field::new("login", FieldType::String).unwrap();
        field.constraints.unique = Some(UniqueConstraint {
            table: None,
            column: Some("mail".to_string()),
        });
        assert_eq!(field.to_string(), "login:string:unique(.mail)");
        assert_eq!(Field::parse(&field.to_string()).unwrap(), field);
    }
}
