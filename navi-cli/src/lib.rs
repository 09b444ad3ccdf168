//! Command-line maintenance tooling for navigation databases.
#![forbid(unsafe_code)]

use std::io::{self, Write};

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use navi_core::StoreConfig;
use serde::Serialize;

mod error;
mod maintenance;
mod way;

pub use error::CliError;

use maintenance::{AllocateArgs, InitArgs};
use way::{DeleteWayArgs, ShowWayArgs};

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_MAX_ROWS_PER_SHARD: &str = "max-rows-per-shard";
pub(crate) const ARG_WAY_ID: &str = "way-id";
pub(crate) const ENV_SHOW_WAY_ID: &str = "NAVI_CMDS_SHOW_WAY_WAY_ID";
pub(crate) const ENV_DELETE_WAY_ID: &str = "NAVI_CMDS_DELETE_WAY_WAY_ID";

/// Run the `navi-db` CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Init(args) => {
            maintenance::run_init(&args.into_config()?, &mut out)?;
        }
        Command::Allocate(args) => {
            maintenance::run_allocate(&args.into_config()?, &mut out)?;
        }
        Command::ShowWay(args) => {
            way::run_show_way(&args.into_config()?, &mut out)?;
        }
        Command::DeleteWay(args) => {
            way::run_delete_way(&args.into_config()?, &mut out)?;
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "navi-db",
    about = "Maintenance utilities for navigation data databases",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the navigation schema and seed the speed limits.
    Init(InitArgs),
    /// Report the next way id and the target navigation shard.
    Allocate(AllocateArgs),
    /// Print a way with its nodes, raw data and navigation entries.
    ShowWay(ShowWayArgs),
    /// Delete a way together with its dependent rows.
    DeleteWay(DeleteWayArgs),
}

/// Store settings for an optional database override.
pub(crate) fn store_config(database: Option<Utf8PathBuf>) -> StoreConfig {
    database.map_or_else(StoreConfig::default, StoreConfig::at_path)
}

pub(crate) fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(CliError::SerializeOutput)?;
    writeln!(out).map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
