//! Field-driven stub generation
//!
//! This module implements the generation pipeline: field definitions are parsed
//! into a [`FieldCollection`], turned into a [`ValidationRuleSet`], substituted
//! into a stub and written to disk by the materializer.

pub mod field_source;
pub mod field_type;
pub mod generator;
pub mod helpers;
pub mod materializer;
pub mod rules;
pub mod stub;

pub use field_source::{load_fields, FieldSource};
pub use field_type::{Constraints, Field, FieldCollection, FieldType, UniqueConstraint};
pub use generator::{
    generate, FormRequestGenerator, GenerationOutcome, GenerationRequest, GenerationStage,
    RequestInput, StubGenerator,
};
pub use helpers::NamingHelpers;
pub use materializer::{materialize, MaterializeOutcome};
pub use rules::{derive_rules, FieldRules, RuleMode, RuleOptions, ValidationRuleSet};
pub use stub::{substitute, Placeholders, Stub, StubOrigin, StubRepository};
