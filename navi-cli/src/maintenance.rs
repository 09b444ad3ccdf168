//! `init` and `allocate` subcommands.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use navi_core::{InitOutcome, NaviStore, ShardId, SqliteNaviStore, StoreConfig, WayId};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_DATABASE, ARG_MAX_ROWS_PER_SHARD, CliError, store_config, write_json};

/// CLI arguments for the `init` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "init", about = "Create the navigation schema if it is missing")]
#[ortho_config(prefix = "NAVI")]
pub(crate) struct InitArgs {
    /// Path to the navigation SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl InitArgs {
    pub(crate) fn into_config(self) -> Result<StoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(store_config(merged.database))
    }
}

/// CLI arguments for the `allocate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "allocate",
    long_about = "Print the way id the next insert would receive and the \
                 navigation shard that should hold the next entries, as JSON.",
    about = "Report the next way id and navigation shard"
)]
#[ortho_config(prefix = "NAVI")]
pub(crate) struct AllocateArgs {
    /// Path to the navigation SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Row threshold after which a navigation shard counts as full.
    #[arg(long = ARG_MAX_ROWS_PER_SHARD, value_name = "rows")]
    #[serde(default)]
    pub(crate) max_rows_per_shard: Option<u64>,
}

impl AllocateArgs {
    pub(crate) fn into_config(self) -> Result<StoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(Self::resolve(merged))
    }

    pub(crate) fn resolve(args: Self) -> StoreConfig {
        let config = store_config(args.database);
        match args.max_rows_per_shard {
            Some(rows) => config.with_max_rows_per_shard(rows),
            None => config,
        }
    }
}

/// Output of the `allocate` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct AllocationReport {
    pub(crate) next_way_id: WayId,
    pub(crate) navi_table_shard: ShardId,
}

pub(crate) fn run_init(
    config: &StoreConfig,
    out: &mut impl Write,
) -> Result<InitOutcome, CliError> {
    let mut store = SqliteNaviStore::open(config)?;
    let outcome = store.init_database()?;
    store.close()?;

    let path = &config.database_path;
    match outcome {
        InitOutcome::Created => writeln!(out, "created navigation tables in {path}"),
        InitOutcome::AlreadyInitialised => {
            writeln!(out, "navigation database {path} is already initialised")
        }
    }
    .map_err(CliError::WriteOutput)?;
    info!("init finished for {path}: {outcome:?}");
    Ok(outcome)
}

pub(crate) fn run_allocate(
    config: &StoreConfig,
    out: &mut impl Write,
) -> Result<AllocationReport, CliError> {
    let store = SqliteNaviStore::open_existing(config)?;
    let report = AllocationReport {
        next_way_id: store.next_way_id()?,
        navi_table_shard: store.navi_table_shard()?,
    };
    store.close()?;
    write_json(out, &report)?;
    Ok(report)
}
