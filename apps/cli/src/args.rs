//! # CLI Argument Definitions

use bindery_domain::constants::{OPT_OUT_ENV, SERVICES_ENV};
use bindery_logger::LevelFilter;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bindery")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Wires bound services into a hosted server's configuration")]
pub struct Cli {
    /// Settings file (toml, yaml or json). Defaults to `bindery.*` in the working directory.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Server directory; overrides `server.dir` from the settings.
    #[arg(short, long, global = true)]
    pub server_dir: Option<PathBuf>,

    /// File holding the bound-services document. Takes precedence over `--services-json`.
    #[arg(long, global = true)]
    pub services: Option<PathBuf>,

    /// Bound-services document as JSON text.
    #[arg(long, global = true, env = SERVICES_ENV, hide_env_values = true)]
    pub services_json: Option<String>,

    /// Opt-out directive, e.g. `mysql=config redis=all`.
    #[arg(long, global = true, env = OPT_OUT_ENV)]
    pub opt_out: Option<String>,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub const fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            _ => LevelFilter::DEBUG,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show how the bindings resolve and what they need, without writing anything
    Plan {},
    /// Write the binding variables and create or update the server configuration
    Configure {
        /// Start from an empty configuration even if one exists
        #[arg(long)]
        create: bool,
    },
}
