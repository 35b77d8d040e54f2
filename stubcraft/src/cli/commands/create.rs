//! File generation commands

use anyhow::{Context, Result};
use clap::Subcommand;
use console::{style, Emoji};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::super::CommandContext;
use crate::scaffold::{FormRequestGenerator, GenerationOutcome, GenerationRequest, RequestInput};

static SUCCESS: Emoji<'_, '_> = Emoji("✓", "√");
static ERROR: Emoji<'_, '_> = Emoji("✗", "x");

/// Generation subcommands
#[derive(Debug, Subcommand)]
pub enum CreateCommand {
    /// Create a form-request class with validation rules derived from fields
    ///
    /// Examples:
    ///   stubcraft create form-request `StoreUser` --fields="email:email:unique(users),bio:text:nullable"
    ///   stubcraft create form-request `UpdateUser` --fields-file=fields/user.json --update
    #[command(name = "form-request")]
    FormRequest {
        /// Name of the form-request class
        class_name: String,

        /// Fields to create the validation rules from (wins over --fields-file)
        #[arg(long)]
        fields: Option<String>,

        /// JSON or TOML file to import fields from
        #[arg(long, value_name = "PATH")]
        fields_file: Option<PathBuf>,

        /// Template set to use when generating the code
        #[arg(long, value_name = "SET")]
        template_name: Option<String>,

        /// Override the form-request if one already exists
        #[arg(long)]
        force: bool,

        /// Generate update rules that ignore the current record on uniqueness checks
        #[arg(long)]
        update: bool,

        /// Identifier column of the record, used with --update
        #[arg(long, default_value = "id", requires = "update")]
        key: String,

        /// Table for uniqueness rules that do not name one
        #[arg(long)]
        table: Option<String>,

        /// Derive rules for primary key fields too
        #[arg(long)]
        include_primary: bool,

        /// Print the rendered file instead of writing it
        #[arg(long)]
        dry_run: bool,
    },
}

impl CreateCommand {
    /// Execute the create command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The class name or field specification is invalid
    /// - The fields file or stub cannot be found
    /// - The file cannot be written
    pub fn execute(&self, context: &CommandContext) -> Result<ExitCode> {
        match self {
            Self::FormRequest {
                class_name,
                fields,
                fields_file,
                template_name,
                force,
                update,
                key,
                table,
                include_primary,
                dry_run,
            } => {
                let input = RequestInput {
                    class_name: class_name.clone(),
                    fields: fields.clone(),
                    fields_file: fields_file.clone(),
                    template_name: template_name.clone(),
                    force: *force,
                    update_key: update.then(|| key.clone()),
                    table: table.clone(),
                    include_primary: *include_primary,
                    dry_run: *dry_run,
                };
                Self::create_form_request(input, context)
            }
        }
    }

    fn create_form_request(input: RequestInput, context: &CommandContext) -> Result<ExitCode> {
        let request = GenerationRequest::resolve(input, &context.config, &context.project_root)
            .context("Invalid form-request input")?;

        let outcome = FormRequestGenerator::run(&request, &context.stubs)
            .with_context(|| format!("Failed to create form-request {}", request.class_name))?;

        Ok(report(&outcome, &context.project_root))
    }
}

/// Print the outcome and map it to an exit code
fn report(outcome: &GenerationOutcome, project_root: &Path) -> ExitCode {
    match outcome {
        GenerationOutcome::Written(path) => {
            println!(
                "  {} A new form-request has been crafted: {}",
                SUCCESS,
                style(display_path(path, project_root)).green()
            );
            ExitCode::SUCCESS
        }
        GenerationOutcome::Conflict(path) => {
            eprintln!(
                "  {} The form-request already exists at {}! To override the existing file, use --force option.",
                ERROR,
                style(display_path(path, project_root)).yellow()
            );
            ExitCode::FAILURE
        }
        GenerationOutcome::DryRun { content, .. } => {
            print!("{content}");
            ExitCode::SUCCESS
        }
    }
}

fn display_path(path: &Path, project_root: &Path) -> String {
    path.strip_prefix(project_root)
        .unwrap_or(path)
        .display()
        .to_string()
}
