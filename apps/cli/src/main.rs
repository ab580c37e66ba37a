#![allow(clippy::print_stdout, clippy::print_stderr)]

mod args;
mod commands;
mod session;

use crate::args::{Cli, Command};
use crate::session::Session;
use anyhow::{Context, Result};
use bindery_domain::config::BinderyConfig;
use bindery_kernel::config::load_config;
use bindery_logger::Logger;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).level(cli.log_level()).init()?;

    let cfg: BinderyConfig = load_config(cli.config.as_ref()).context("Configuration is malformed")?;
    let session = Session::new(&cli, cfg)?;

    match cli.command {
        Command::Plan {} => commands::plan::run(&session)?,
        Command::Configure { create } => commands::configure::run(&session, create)?,
    }

    Ok(())
}
