//! Template set inspection commands

use clap::Subcommand;
use console::{style, Emoji};

use super::super::CommandContext;

static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static CUSTOM: Emoji<'_, '_> = Emoji("✨ ", "* ");
static DEFAULT: Emoji<'_, '_> = Emoji("  ", "  ");

/// Stub subcommands
#[derive(Debug, Subcommand)]
pub enum StubsCommand {
    /// List available template sets and where they are searched
    List,
}

impl StubsCommand {
    /// Execute the stubs command
    pub fn execute(&self, context: &CommandContext) {
        match self {
            Self::List => list_template_sets(context),
        }
    }
}

fn list_template_sets(context: &CommandContext) {
    println!("{}", style("Template search path:").bold());
    for root in context.stubs.roots() {
        let status = if root.is_dir() {
            style("found").green()
        } else {
            style("missing").dim()
        };
        println!("  {FOLDER}{} ({status})", root.display());
    }

    println!();
    println!("{}", style("Template sets:").bold());
    for set in context.stubs.template_sets() {
        let marker = if set == context.config.default_template {
            &CUSTOM
        } else {
            &DEFAULT
        };
        println!("  {marker}{set}");
    }
    println!();
    println!(
        "{}",
        style(format!(
            "Default set: {} (change with `default_template` in stubcraft.toml)",
            context.config.default_template
        ))
        .dim()
    );
}
