//! Property tests for rule derivation and placeholder substitution

use proptest::prelude::*;
use proptest::sample::select;
use std::collections::BTreeSet;

use stubcraft::scaffold::{derive_rules, substitute, FieldCollection, Placeholders, RuleOptions};

const TYPES: &[&str] = &[
    "string", "text", "integer", "bigint", "boolean", "decimal", "float", "date", "datetime",
    "time", "email", "uuid", "json", "references:User",
];

const MODIFIERS: &[&str] = &["", ":nullable", ":unique", ":max(255)", ":min(1)", ":unique(users)"];

fn field_spec() -> impl Strategy<Value = String> {
    (
        prop::collection::btree_set("[a-z][a-z0-9_]{0,8}", 1..6),
        prop::collection::vec((select(TYPES), select(MODIFIERS)), 6),
    )
        .prop_map(|(names, kinds): (BTreeSet<String>, Vec<(&str, &str)>)| {
            names
                .into_iter()
                .zip(kinds)
                .map(|(name, (ty, modifier))| format!("{name}:{ty}{modifier}"))
                .collect::<Vec<_>>()
                .join(",")
        })
}

proptest! {
    #[test]
    fn derivation_is_deterministic(spec in field_spec()) {
        let fields = FieldCollection::parse_inline(&spec).unwrap();
        let options = RuleOptions::new("things");
        let first = derive_rules(&fields, &options);
        let second = derive_rules(&fields, &options);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.to_array_literal(12), second.to_array_literal(12));
    }

    #[test]
    fn every_field_gets_an_entry_in_order(spec in field_spec()) {
        let fields = FieldCollection::parse_inline(&spec).unwrap();
        let rules = derive_rules(&fields, &RuleOptions::new("things"));

        let field_names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        let rule_names: Vec<_> = rules.iter().map(|r| r.field.as_str()).collect();
        prop_assert_eq!(field_names, rule_names);

        for field in &fields {
            let derived = rules.get(&field.name).unwrap();
            let has_required = derived.first().is_some_and(|r| r == "required");
            prop_assert_eq!(has_required, !field.nullable);
        }
    }

    #[test]
    fn substitution_without_values_is_identity(body in ".*") {
        prop_assert_eq!(substitute(&body, &Placeholders::new()), body);
    }

    #[test]
    fn substitution_leaves_unknown_tokens(prefix in "[^{}]*", suffix in "[^{}]*") {
        let body = format!("{prefix}{{{{known}}}}{{{{unknown}}}}{suffix}");
        let placeholders = Placeholders::new().with("known", "value");

        prop_assert_eq!(
            substitute(&body, &placeholders),
            format!("{prefix}value{{{{unknown}}}}{suffix}")
        );
    }
}
