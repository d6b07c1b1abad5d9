//! Error types emitted by the carpool CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use carpool_core::{DistanceError, SolveError};
use carpool_data::routing::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the carpool CLI.
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
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading the solve request file failed.
    #[error("failed to read solve request at {path:?}: {source}")]
    OpenSolveRequest {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Solve request JSON could not be decoded.
    #[error("failed to parse solve request JSON at {path:?}: {source}")]
    ParseSolveRequest {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Reading the distance matrix file failed.
    #[error("failed to read distance matrix at {path:?}: {source}")]
    OpenMatrix {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Distance matrix JSON could not be decoded.
    #[error("failed to parse distance matrix JSON at {path:?}: {source}")]
    ParseMatrix {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The distance matrix file decoded but is not a usable table.
    #[error("distance matrix at {path:?} is invalid: {source}")]
    InvalidMatrix {
        path: Utf8PathBuf,
        #[source]
        source: DistanceError,
    },
    /// Constructing the HTTP distance provider failed.
    #[error("failed to build distance provider for {base_url:?}: {source}")]
    BuildDistanceProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Installing the logger failed.
    #[error("failed to initialise logging: {0}")]
    InitLogging(#[source] std::io::Error),
    /// The solver rejected the request.
    #[error("solver failed: {source}")]
    Solve { source: SolveError },
    /// Serializing the solve output failed.
    #[error("failed to serialize solve output: {0}")]
    SerializeSolveOutput(#[source] serde_json::Error),
    /// Writing the solve output failed.
    #[error("failed to write solve output: {0}")]
    WriteSolveOutput(#[source] std::io::Error),
}
