//! stubcraft CLI commands
//!
//! Commands for generating files from stubs:
//! - `create form-request` - Generate a validation-request class
//! - `stubs list` - Show available template sets

pub mod commands;

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::StubcraftConfig;
use crate::scaffold::StubRepository;
pub use commands::{CreateCommand, StubsCommand};

/// Top-level subcommand
#[derive(Debug, Subcommand)]
pub enum StubcraftCommand {
    /// Generate a file from a stub
    Create {
        /// Create subcommand to execute
        #[command(subcommand)]
        command: CreateCommand,
    },
    /// Inspect stub template sets
    Stubs {
        /// Stubs subcommand to execute
        #[command(subcommand)]
        command: StubsCommand,
    },
}

/// Everything a command needs from its environment, resolved once at entry
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Project root all relative paths are resolved against
    pub project_root: PathBuf,
    /// Loaded configuration
    pub config: StubcraftConfig,
    /// Stub lookup
    pub stubs: StubRepository,
}

impl CommandContext {
    /// Load configuration and stub roots for `project_root`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn load(project_root: &Path, config_file: Option<&Path>) -> Result<Self> {
        let config = StubcraftConfig::load(project_root, config_file)
            .context("Failed to load configuration")?;

        let mut roots = vec![project_root.join(&config.templates_path)];
        roots.extend(StubcraftConfig::user_templates_dir());

        Ok(Self {
            project_root: project_root.to_path_buf(),
            config,
            stubs: StubRepository::new(roots),
        })
    }
}

/// Run a stubcraft command
///
/// # Errors
///
/// Returns an error if the command fails to execute. A destination that already
/// exists is not an error; it is reported and mapped to a failing exit code.
pub fn run(command: &StubcraftCommand, context: &CommandContext) -> Result<ExitCode> {
    match command {
        StubcraftCommand::Create { command } => command.execute(context),
        StubcraftCommand::Stubs { command } => {
            command.execute(context);
            Ok(ExitCode::SUCCESS)
        }
    }
}
