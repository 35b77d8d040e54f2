//! Naming helpers for code generation
//!
//! Conventions used when a field or request does not spell out a table or
//! column explicitly.

use inflector::Inflector;
use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Irregular nouns Inflector mangles or misses, as (singular, plural)
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("mouse", "mice"),
    ("louse", "lice"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("ox", "oxen"),
];

/// Verb prefixes of request class names that do not name the resource
const REQUEST_VERBS: &[&str] = &["Store", "Create", "Update", "Edit", "Destroy", "Delete"];

/// Naming helpers shared by the field loader and the rule deriver
pub struct NamingHelpers;

impl NamingHelpers {
    /// Convert string to `snake_case`
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubcraft::scaffold::helpers::NamingHelpers;
    /// assert_eq!(NamingHelpers::to_snake_case("UserProfile"), "user_profile");
    /// ```
    #[must_use]
    pub fn to_snake_case(input: &str) -> String {
        input.to_snake_case()
    }

    /// Convert string to table name (`snake_case` plural)
    ///
    /// Names that are already plural are kept, so a table name can be passed
    /// where a model name is expected.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubcraft::scaffold::helpers::NamingHelpers;
    /// assert_eq!(NamingHelpers::to_table_name("User"), "users");
    /// assert_eq!(NamingHelpers::to_table_name("UserProfile"), "user_profiles");
    /// assert_eq!(NamingHelpers::to_table_name("Category"), "categories");
    /// assert_eq!(NamingHelpers::to_table_name("Person"), "people");
    /// assert_eq!(NamingHelpers::to_table_name("people"), "people");
    /// ```
    #[must_use]
    pub fn to_table_name(model: &str) -> String {
        let snake = Self::to_snake_case(model);
        let (prefix, last) = snake.rsplit_once('_').unwrap_or(("", snake.as_str()));

        let irregular = IRREGULAR_PLURALS
            .iter()
            .find(|(singular, plural)| last == *singular || last == *plural)
            .map(|(_, plural)| *plural);

        match irregular {
            Some(plural) if prefix.is_empty() => plural.to_string(),
            Some(plural) => format!("{prefix}_{plural}"),
            None => snake.to_plural(),
        }
    }

    /// Default table for a request class
    ///
    /// A trailing `Request` suffix and a leading verb (`Store`, `Update`, ...)
    /// are dropped before pluralising, so `StoreUserRequest` maps to `users`.
    #[must_use]
    pub fn to_request_table(class_name: &str) -> String {
        let stem = class_name
            .strip_suffix("Request")
            .filter(|s| !s.is_empty())
            .unwrap_or(class_name);
        let resource = REQUEST_VERBS
            .iter()
            .find_map(|verb| stem.strip_prefix(verb))
            .filter(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
            .unwrap_or(stem);
        Self::to_table_name(resource)
    }

    /// Whether `input` is a valid identifier in the generated language
    #[must_use]
    pub fn is_identifier(input: &str) -> bool {
        IDENTIFIER.is_match(input)
    }
}
