//! Generation orchestrator
//!
//! Runs one generation request through a fixed, fail-fast sequence of stages:
//!
//! ```text
//! Start → InputResolved → FieldsLoaded → RulesDerived → StubLoaded
//!       → StubRendered → ConflictCheck → Written | ConflictReported | Failed
//! ```
//!
//! Generators differ only in which stub they render, where the result goes and
//! which placeholders they fill. [`StubGenerator`] captures that, and
//! [`generate`] drives any implementation through the shared stub engine and
//! materializer.

use std::fmt;
use std::path::{Path, PathBuf};

use super::field_source::{load_fields, FieldSource};
use super::helpers::NamingHelpers;
use super::materializer::{materialize, MaterializeOutcome};
use super::rules::{derive_rules, RuleOptions, ValidationRuleSet};
use super::stub::{substitute, Placeholders, StubRepository};
use crate::config::StubcraftConfig;
use crate::error::{GenerationError, Result};

/// Stages of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    /// Nothing done yet
    Start,
    /// Command input resolved into a request
    InputResolved,
    /// Field definitions parsed
    FieldsLoaded,
    /// Validation rules derived
    RulesDerived,
    /// Stub body read
    StubLoaded,
    /// Placeholders substituted
    StubRendered,
    /// Destination existence checked
    ConflictCheck,
    /// File written
    Written,
    /// Destination existed, nothing written
    ConflictReported,
    /// A stage failed
    Failed,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

fn enter(stage: GenerationStage) {
    tracing::debug!(%stage, "generation stage");
}

fn failed(error: &GenerationError) {
    tracing::debug!(stage = %GenerationStage::Failed, %error, "generation stage");
}

/// Raw command input for a form-request generation
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    /// Class name argument
    pub class_name: String,
    /// Inline field spec (`--fields`)
    pub fields: Option<String>,
    /// Fields file (`--fields-file`)
    pub fields_file: Option<PathBuf>,
    /// Template set (`--template-name`)
    pub template_name: Option<String>,
    /// Overwrite an existing file (`--force`)
    pub force: bool,
    /// Identifier column ignored by uniqueness rules (`--update`/`--key`)
    pub update_key: Option<String>,
    /// Default table for uniqueness rules (`--table`)
    pub table: Option<String>,
    /// Derive rules for primary keys too (`--include-primary`)
    pub include_primary: bool,
    /// Render without writing (`--dry-run`)
    pub dry_run: bool,
}

/// A fully resolved, immutable generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Class name, also used as file stem
    pub class_name: String,
    /// Template set to load the stub from
    pub template_set: String,
    /// Where fields come from
    pub field_source: FieldSource,
    /// Overwrite an existing destination
    pub force: bool,
    /// Render only
    pub dry_run: bool,
    /// Directory receiving the generated file
    pub destination_dir: PathBuf,
    /// Extension of the generated file
    pub file_extension: String,
    /// Value of `{{appName}}`
    pub app_name: String,
    /// Value of `{{namespace}}`
    pub namespace: String,
    /// Rule derivation options
    pub rule_options: RuleOptions,
    /// Indentation of the rendered rules literal
    pub rules_indent: usize,
}

impl GenerationRequest {
    /// Resolve command input against configuration and the project root
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Parse`] if the class name is empty or not a
    /// valid identifier.
    pub fn resolve(
        input: RequestInput,
        config: &StubcraftConfig,
        project_root: &Path,
    ) -> Result<Self> {
        Self::resolve_input(input, config, project_root).inspect_err(failed)
    }

    fn resolve_input(
        input: RequestInput,
        config: &StubcraftConfig,
        project_root: &Path,
    ) -> Result<Self> {
        enter(GenerationStage::Start);

        let class_name = input.class_name.trim().to_string();
        if class_name.is_empty() {
            return Err(GenerationError::parse(&class_name, "class name cannot be empty"));
        }
        if !NamingHelpers::is_identifier(&class_name) {
            return Err(GenerationError::parse(
                &class_name,
                "class name must be a valid identifier",
            ));
        }

        let field_source =
            FieldSource::select(input.fields.as_deref(), input.fields_file.as_deref())
                .resolve(project_root);

        let template_set = input
            .template_name
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| config.default_template.clone());

        let default_table = input
            .table
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| NamingHelpers::to_request_table(&class_name));

        let mut rule_options =
            RuleOptions::new(default_table).with_primary(input.include_primary);
        if let Some(key) = input.update_key {
            rule_options = rule_options.for_update(key);
        }

        let request = Self {
            class_name,
            template_set,
            field_source,
            force: input.force,
            dry_run: input.dry_run,
            destination_dir: project_root.join(&config.requests_path),
            file_extension: config.file_extension.clone(),
            app_name: config.app_name.clone(),
            namespace: config.namespace(),
            rule_options,
            rules_indent: config.rules_indent,
        };

        enter(GenerationStage::InputResolved);
        Ok(request)
    }

    /// Destination path of the generated file
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        let file_name = if self.file_extension.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.class_name, self.file_extension)
        };
        self.destination_dir.join(file_name)
    }
}

/// A generator producing one file from one stub
pub trait StubGenerator {
    /// Human-readable artifact kind (e.g., "form-request")
    fn kind(&self) -> &'static str;

    /// Name of the stub within the template set
    fn stub_name(&self) -> &'static str;

    /// Template set to load the stub from
    fn template_set(&self) -> &str;

    /// Destination path
    fn output_path(&self) -> PathBuf;

    /// Placeholder values to substitute into the stub
    fn placeholders(&self) -> Placeholders;
}

/// Result of a generation run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The file was written
    Written(PathBuf),
    /// The destination existed and `force` was not set
    Conflict(PathBuf),
    /// Rendered only; nothing was written
    DryRun {
        /// Where the file would have gone
        path: PathBuf,
        /// Rendered content
        content: String,
    },
}

/// Render a generator's stub and materialize it
///
/// # Errors
///
/// Propagates [`GenerationError::NotFound`] for a missing stub and
/// [`GenerationError::Io`] for read or write failures.
pub fn generate<G: StubGenerator>(
    generator: &G,
    stubs: &StubRepository,
    force: bool,
    dry_run: bool,
) -> Result<GenerationOutcome> {
    let stub = stubs.load(generator.template_set(), generator.stub_name())?;
    enter(GenerationStage::StubLoaded);

    let content = substitute(&stub.body, &generator.placeholders());
    enter(GenerationStage::StubRendered);

    let path = generator.output_path();
    if dry_run {
        return Ok(GenerationOutcome::DryRun { path, content });
    }

    enter(GenerationStage::ConflictCheck);
    let outcome = materialize(&path, &content, force)?;
    tracing::info!(
        kind = generator.kind(),
        path = %outcome.path().display(),
        written = outcome.is_written(),
        "materialized"
    );
    match outcome {
        MaterializeOutcome::Written(path) => {
            enter(GenerationStage::Written);
            Ok(GenerationOutcome::Written(path))
        }
        MaterializeOutcome::Conflict(path) => {
            enter(GenerationStage::ConflictReported);
            Ok(GenerationOutcome::Conflict(path))
        }
    }
}

/// Generator for validation-request classes
#[derive(Debug, Clone)]
pub struct FormRequestGenerator<'a> {
    request: &'a GenerationRequest,
    rules: ValidationRuleSet,
}

impl<'a> FormRequestGenerator<'a> {
    /// Stub name used by this generator
    pub const STUB_NAME: &'static str = "form-request";

    /// Create a generator for `request` with already derived rules
    #[must_use]
    pub const fn new(request: &'a GenerationRequest, rules: ValidationRuleSet) -> Self {
        Self { request, rules }
    }

    /// Derived validation rules
    #[must_use]
    pub const fn rules(&self) -> &ValidationRuleSet {
        &self.rules
    }

    /// Run the complete pipeline for `request`
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any stage; later stages do not run.
    pub fn run(request: &GenerationRequest, stubs: &StubRepository) -> Result<GenerationOutcome> {
        Self::run_stages(request, stubs).inspect_err(failed)
    }

    fn run_stages(
        request: &GenerationRequest,
        stubs: &StubRepository,
    ) -> Result<GenerationOutcome> {
        let fields = load_fields(&request.field_source)?;
        enter(GenerationStage::FieldsLoaded);
        for field in &fields {
            tracing::trace!(%field, "field");
        }

        let generator = FormRequestGenerator::new(
            request,
            derive_rules(&fields, &request.rule_options),
        );
        enter(GenerationStage::RulesDerived);
        tracing::debug!(
            fields = fields.len(),
            validated = generator.rules().len(),
            "rules derived"
        );

        generate(&generator, stubs, request.force, request.dry_run)
    }
}

impl StubGenerator for FormRequestGenerator<'_> {
    fn kind(&self) -> &'static str {
        "form-request"
    }

    fn stub_name(&self) -> &'static str {
        Self::STUB_NAME
    }

    fn template_set(&self) -> &str {
        &self.request.template_set
    }

    fn output_path(&self) -> PathBuf {
        self.request.output_path()
    }

    fn placeholders(&self) -> Placeholders {
        Placeholders::new()
            .with("formRequestClass", self.request.class_name.as_str())
            .with("rules", self.rules.to_array_literal(self.request.rules_indent))
            .with("appName", self.request.app_name.as_str())
            .with("namespace", self.request.namespace.as_str())
    }
}
