//! Error types emitted by the `navi-db` CLI.

use std::sync::Arc;

use navi_core::{NaviStoreError, WayId, ZeroWayIdError};
use thiserror::Error;

/// Errors emitted by the `navi-db` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A way id of zero was supplied.
    #[error("invalid way id: {0}")]
    InvalidWayId(#[from] ZeroWayIdError),
    /// The navigation store reported a failure.
    #[error(transparent)]
    Store(#[from] NaviStoreError),
    /// The requested way is not stored.
    #[error("way {way_id} does not exist")]
    WayNotFound { way_id: WayId },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
