//! Validation rule derivation
//!
//! Maps a [`FieldCollection`] to per-field rule tokens. Tokens within a field
//! always follow the same stage order so regenerated output diffs cleanly:
//!
//! 1. `required` (unless nullable)
//! 2. type conformance (`string`, `integer`, `numeric`, `email`, ...)
//! 3. bounds (`max:<n>`, `min:<n>`, `regex:<pattern>`)
//! 4. uniqueness (`unique:<table>,<column>`)
//! 5. existence (`exists:<table>,<column>`)

use std::fmt::Write as _;

use super::field_type::{Field, FieldCollection, FieldType};

/// Whether rules target a create or an update form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RuleMode {
    /// New records: uniqueness checks cover the whole table
    #[default]
    Create,
    /// Existing records: uniqueness checks ignore the record being updated
    Update {
        /// Identifier column of the record (e.g., "id")
        key: String,
    },
}

/// Options steering rule derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOptions {
    /// Create or update flavour of uniqueness rules
    pub mode: RuleMode,
    /// Table used by uniqueness rules that do not name one
    pub default_table: String,
    /// Derive rules for primary key fields too
    pub include_primary: bool,
}

impl RuleOptions {
    /// Options for a create form against `default_table`
    pub fn new(default_table: impl Into<String>) -> Self {
        Self {
            mode: RuleMode::Create,
            default_table: default_table.into(),
            include_primary: false,
        }
    }

    /// Switch to update mode, ignoring the record identified by `key`
    #[must_use]
    pub fn for_update(mut self, key: impl Into<String>) -> Self {
        self.mode = RuleMode::Update { key: key.into() };
        self
    }

    /// Include primary key fields
    #[must_use]
    pub const fn with_primary(mut self, include: bool) -> Self {
        self.include_primary = include;
        self
    }
}

/// Rules for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules {
    /// Field name
    pub field: String,
    /// Rule tokens in stage order
    pub rules: Vec<String>,
}

/// Ordered mapping from field name to rule tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationRuleSet {
    entries: Vec<FieldRules>,
}

impl ValidationRuleSet {
    /// Rules for `field`, if it was eligible for validation
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.rules.as_slice())
    }

    /// Iterate entries in field order
    pub fn iter(&self) -> std::slice::Iter<'_, FieldRules> {
        self.entries.iter()
    }

    /// Number of fields with an entry
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field is validated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as an array literal suitable for `{{rules}}`
    ///
    /// Each entry goes on its own line, indented by `indent` spaces; the closing
    /// bracket is indented four spaces less.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubcraft::scaffold::field_type::FieldCollection;
    /// # use stubcraft::scaffold::rules::{derive_rules, RuleOptions};
    /// let fields =
    ///     FieldCollection::parse_inline("title:string:max(80),notes:text:nullable").unwrap();
    /// let rules = derive_rules(&fields, &RuleOptions::new("posts"));
    /// assert_eq!(
    ///     rules.to_array_literal(4),
    ///     "[\n    'title' => ['required', 'string', 'max:80'],\n    'notes' => [],\n]"
    /// );
    /// ```
    #[must_use]
    pub fn to_array_literal(&self, indent: usize) -> String {
        if self.entries.is_empty() {
            return "[]".to_string();
        }

        let pad = " ".repeat(indent);
        let closing = " ".repeat(indent.saturating_sub(4));
        let mut out = String::from("[\n");
        for entry in &self.entries {
            let rules = entry
                .rules
                .iter()
                .map(|rule| format!("'{}'", escape_quoted(rule)))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "{pad}'{}' => [{rules}],", entry.field);
        }
        out.push_str(&closing);
        out.push(']');
        out
    }
}

impl<'a> IntoIterator for &'a ValidationRuleSet {
    type Item = &'a FieldRules;
    type IntoIter = std::slice::Iter<'a, FieldRules>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Derive validation rules for every eligible field
///
/// Primary key fields are skipped unless `options.include_primary` is set. A
/// field with no applicable rule still gets an (empty) entry.
#[must_use]
pub fn derive_rules(fields: &FieldCollection, options: &RuleOptions) -> ValidationRuleSet {
    let entries = fields
        .iter()
        .filter(|field| options.include_primary || !field.primary)
        .map(|field| FieldRules {
            field: field.name.clone(),
            rules: field_rules(field, options),
        })
        .collect();

    ValidationRuleSet { entries }
}

fn field_rules(field: &Field, options: &RuleOptions) -> Vec<String> {
    let mut rules = Vec::new();

    if !field.nullable {
        rules.push("required".to_string());
    }

    if let Some(rule) = type_rule(&field.field_type) {
        rules.push(rule.to_string());
    }

    let constraints = &field.constraints;
    if let Some(max) = constraints.max {
        rules.push(format!("max:{max}"));
    }
    if let Some(min) = constraints.min {
        rules.push(format!("min:{min}"));
    }
    if let Some(pattern) = &constraints.pattern {
        rules.push(format!("regex:{pattern}"));
    }

    if let Some(unique) = &constraints.unique {
        let table = unique.table.as_deref().unwrap_or(&options.default_table);
        let column = unique.column.as_deref().unwrap_or(&field.name);
        let rule = match &options.mode {
            RuleMode::Create => format!("unique:{table},{column}"),
            RuleMode::Update { key } => format!("unique:{table},{column},{{{key}}},{key}"),
        };
        rules.push(rule);
    }

    if let FieldType::Reference { table, column } = &field.field_type {
        rules.push(format!("exists:{table},{column}"));
    }

    rules
}

const fn type_rule(field_type: &FieldType) -> Option<&'static str> {
    match field_type {
        FieldType::String => Some("string"),
        FieldType::Integer | FieldType::BigInt | FieldType::Reference { .. } => Some("integer"),
        FieldType::Decimal | FieldType::Float => Some("numeric"),
        FieldType::Boolean => Some("boolean"),
        FieldType::Date | FieldType::DateTime => Some("date"),
        FieldType::Time => Some("date_format:H:i:s"),
        FieldType::Email => Some("email"),
        FieldType::Uuid => Some("uuid"),
        FieldType::Json => Some("array"),
        FieldType::Text => None,
    }
}

fn escape_quoted(rule: &str) -> String {
    rule.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules_for(spec: &str) -> ValidationRuleSet {
        let fields = FieldCollection::parse_inline(spec).unwrap();
        derive_rules(&fields, &RuleOptions::new("users"))
    }

    #[test]
    fn test_email_and_bio_scenario() {
        let rules = rules_for("email:email:unique(users),bio:text:nullable");
        assert_eq!(
            rules.get("email").unwrap(),
            ["required", "email", "unique:users,email"]
        );
        assert!(rules.get("bio").unwrap().is_empty());
    }

    #[test]
    fn test_stage_order() {
        let rules = rules_for(
            "owner:references:Account:unique(memberships.owner_id):max(10):min(1)",
        );
        assert_eq!(
            rules.get("owner").unwrap(),
            [
                "required",
                "integer",
                "max:10",
                "min:1",
                "unique:memberships,owner_id",
                "exists:accounts,id",
            ]
        );
    }

    #[test]
    fn test_exists_rule_uses_irregular_table_names() {
        let rules = rules_for("author:references:Person,owner:references(people.id):nullable");
        assert_eq!(
            rules.get("author").unwrap(),
            ["required", "integer", "exists:people,id"]
        );
        assert_eq!(rules.get("owner").unwrap(), ["integer", "exists:people,id"]);
    }

    #[test]
    fn test_nullable_never_required() {
        let rules = rules_for("nickname:string:nullable:max(30)");
        assert_eq!(rules.get("nickname").unwrap(), ["string", "max:30"]);
    }

    #[test]
    fn test_unique_falls_back_to_defaults() {
        let rules = rules_for("username:string:unique");
        assert_eq!(
            rules.get("username").unwrap(),
            ["required", "string", "unique:users,username"]
        );
    }

    #[test]
    fn test_update_mode_ignores_current_record() {
        let fields = FieldCollection::parse_inline("email:email:unique(users)").unwrap();
        let rules = derive_rules(&fields, &RuleOptions::new("users").for_update("id"));
        assert_eq!(
            rules.get("email").unwrap(),
            ["required", "email", "unique:users,email,{id},id"]
        );
    }

    #[test]
    fn test_primary_excluded_unless_requested() {
        let fields = FieldCollection::parse_inline("id:bigint:primary,name:string").unwrap();

        let rules = derive_rules(&fields, &RuleOptions::new("users"));
        assert!(rules.get("id").is_none());
        assert_eq!(rules.len(), 1);

        let rules = derive_rules(&fields, &RuleOptions::new("users").with_primary(true));
        assert_eq!(rules.get("id").unwrap(), ["required", "integer"]);
    }

    #[test]
    fn test_type_rules() {
        let rules = rules_for(
            "a:decimal,b:float,c:boolean,d:date,e:datetime,f:time,g:uuid,h:json,i:bigint",
        );
        let types: Vec<_> = rules.iter().map(|entry| entry.rules[1].as_str()).collect();
        assert_eq!(
            types,
            [
                "numeric",
                "numeric",
                "boolean",
                "date",
                "date",
                "date_format:H:i:s",
                "uuid",
                "array",
                "integer",
            ]
        );
    }

    #[test]
    fn test_entries_follow_field_order() {
        let rules = rules_for("zeta:string,alpha:string,mid:text");
        let names: Vec<_> = rules.iter().map(|entry| entry.field.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_array_literal() {
        let rules = rules_for("email:email:unique(users),bio:text:nullable");
        assert_eq!(
            rules.to_array_literal(12),
            "[\n            'email' => ['required', 'email', 'unique:users,email'],\n            'bio' => [],\n        ]"
        );
        assert_eq!(ValidationRuleSet::default().to_array_literal(12), "[]");
    }

    #[test]
    fn test_array_literal_escapes_quotes() {
        let rules = rules_for(r"name:string:nullable:regex(^[a-z']+$)");
        assert!(rules.to_array_literal(4).contains(r"'regex:^[a-z\']+$'"));
    }
}
