//! artboards: export Sketch artboards without churning unchanged images.
//!
//! # Usage
//!
//! ```text
//! artboards export <file.sketch> [--export-folder <dir>] [--format png] [--scale 1]
//!                                [--overview|--no-overview] [--no-stage] [--dry-run] [--json]
//! artboards list <file.sketch> [--json]
//! artboards init <dir> --export-folder <dir> [--format ...] [--scale ...] [--overview]
//! ```
//!
//! `-v` logs run milestones, `-vv` logs every reconciliation decision.
//! `RUST_LOG` overrides both.

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{export::ExportArgs, init::InitArgs, list::ListArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "artboards",
    version,
    about = "Export Sketch artboards to images, keeping unchanged files untouched",
    long_about = None,
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export every non-ignored artboard of a design file.
    Export(ExportArgs),

    /// List artboards and whether `.sketchignore` excludes them.
    List(ListArgs),

    /// Write a starter `.artboards.yaml` into a directory.
    Init(InitArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Export(args) => args.run(),
        Commands::List(args) => args.run(),
        Commands::Init(args) => args.run(),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
