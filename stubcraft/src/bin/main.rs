//! stubcraft - generate source files from field specifications and stubs
//!
//! # Usage
//!
//! ```bash
//! stubcraft create form-request StoreUser --fields="email:email:unique(users),bio:text:nullable"
//! stubcraft create form-request UpdateUser --fields-file=fields/user.json --update --force
//! stubcraft stubs list
//! ```

use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use stubcraft::cli::{self, CommandContext, StubcraftCommand};
use stubcraft::observability::{self, ObservabilityConfig};

#[derive(Parser)]
#[command(name = "stubcraft")]
#[command(version)]
#[command(about = "Generate source files from field specifications and stub templates")]
#[command(long_about = None)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(short = 'C', long, global = true, default_value = ".")]
    project: PathBuf,

    /// Configuration file (defaults to <project>/stubcraft.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log pipeline stages
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: StubcraftCommand,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logging = ObservabilityConfig::default().with_verbose(cli.verbose);
    if cli.log_json {
        logging = logging.with_json();
    }
    if let Err(e) = observability::init(&logging) {
        eprintln!("warning: logging disabled: {e}");
    }

    let result = CommandContext::load(&cli.project, cli.config.as_deref())
        .and_then(|context| cli::run(&cli.command, &context));

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("  {} {e:#}", style("✗").red());
            ExitCode::FAILURE
        }
    }
}
