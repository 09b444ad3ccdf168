//! `show-way` and `delete-way` subcommands.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use navi_core::{NaviData, NaviStore, Node, SqliteNaviStore, StoreConfig, Way, WayData, WayId};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE, ARG_WAY_ID, CliError, ENV_DELETE_WAY_ID, ENV_SHOW_WAY_ID, store_config,
    write_json,
};

/// CLI arguments for the `show-way` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "show-way", about = "Print a way aggregate as JSON")]
#[ortho_config(prefix = "NAVI")]
pub(crate) struct ShowWayArgs {
    /// Identifier of the way to print.
    #[arg(value_name = ARG_WAY_ID)]
    #[serde(default)]
    pub(crate) way_id: Option<u64>,
    /// Path to the navigation SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl ShowWayArgs {
    pub(crate) fn into_config(self) -> Result<WayCommandConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        WayCommandConfig::try_from(merged)
    }
}

impl TryFrom<ShowWayArgs> for WayCommandConfig {
    type Error = CliError;

    fn try_from(args: ShowWayArgs) -> Result<Self, Self::Error> {
        Self::resolve(args.way_id, args.database, ENV_SHOW_WAY_ID)
    }
}

/// CLI arguments for the `delete-way` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "delete-way",
    about = "Delete a way with its nodes, raw data and navigation entries"
)]
#[ortho_config(prefix = "NAVI")]
pub(crate) struct DeleteWayArgs {
    /// Identifier of the way to delete.
    #[arg(value_name = ARG_WAY_ID)]
    #[serde(default)]
    pub(crate) way_id: Option<u64>,
    /// Path to the navigation SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl DeleteWayArgs {
    pub(crate) fn into_config(self) -> Result<WayCommandConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        WayCommandConfig::try_from(merged)
    }
}

impl TryFrom<DeleteWayArgs> for WayCommandConfig {
    type Error = CliError;

    fn try_from(args: DeleteWayArgs) -> Result<Self, Self::Error> {
        Self::resolve(args.way_id, args.database, ENV_DELETE_WAY_ID)
    }
}

/// Resolved configuration shared by the per-way subcommands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WayCommandConfig {
    pub(crate) store: StoreConfig,
    pub(crate) way_id: WayId,
}

impl WayCommandConfig {
    fn resolve(
        way_id: Option<u64>,
        database: Option<Utf8PathBuf>,
        env: &'static str,
    ) -> Result<Self, CliError> {
        let raw = way_id.ok_or(CliError::MissingArgument {
            field: ARG_WAY_ID,
            env,
        })?;
        Ok(Self {
            store: store_config(database),
            way_id: WayId::try_from(raw)?,
        })
    }
}

/// A way and everything stored for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct WayAggregate {
    pub(crate) way: Way,
    pub(crate) nodes: Vec<Node>,
    pub(crate) way_data: Option<WayData>,
    pub(crate) navi_data: Vec<NaviData>,
}

fn load_aggregate(store: &SqliteNaviStore, way_id: WayId) -> Result<WayAggregate, CliError> {
    let way = store
        .query_way(way_id)?
        .ok_or(CliError::WayNotFound { way_id })?;
    Ok(WayAggregate {
        way,
        nodes: store
            .query_way_nodes(way_id)?
            .map(|way_nodes| way_nodes.nodes)
            .unwrap_or_default(),
        way_data: store.query_way_data(way_id)?,
        navi_data: store.query_navi_data(way_id)?.unwrap_or_default(),
    })
}

pub(crate) fn run_show_way(
    config: &WayCommandConfig,
    out: &mut impl Write,
) -> Result<WayAggregate, CliError> {
    let store = SqliteNaviStore::open_existing(&config.store)?;
    let aggregate = load_aggregate(&store, config.way_id)?;
    store.close()?;
    write_json(out, &aggregate)?;
    Ok(aggregate)
}

pub(crate) fn run_delete_way(
    config: &WayCommandConfig,
    out: &mut impl Write,
) -> Result<bool, CliError> {
    let mut store = SqliteNaviStore::open_existing(&config.store)?;
    let existed = store.delete_way(config.way_id)?;
    store.close()?;

    let way_id = config.way_id;
    if existed {
        writeln!(out, "deleted way {way_id}")
    } else {
        writeln!(out, "way {way_id} did not exist")
    }
    .map_err(CliError::WriteOutput)?;
    info!("delete-way {way_id}: existed = {existed}");
    Ok(existed)
}
