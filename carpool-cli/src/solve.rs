//! Solve command implementation for the carpool CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use carpool_core::{
    CachingDistanceProvider, DistanceProvider, DistanceTable, SolveRequest, SolveResponse,
    StaticDistanceProvider,
};
use carpool_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig};
use carpool_fs::read_utf8_file;
use carpool_solver::{InsertionSolver, SolutionReport};
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::logging::{LogLevel, init_logger};
use crate::{
    ARG_LOG_LEVEL, ARG_SOLVE_FORMAT, ARG_SOLVE_MAPS_API_KEY, ARG_SOLVE_MAPS_BASE_URL,
    ARG_SOLVE_MATRIX, ARG_SOLVE_REQUEST, CliError, ENV_SOLVE_MAPS_API_KEY, ENV_SOLVE_REQUEST,
};

/// How solve output is rendered on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON solve response.
    #[default]
    Json,
    /// One human readable block per vehicle.
    Text,
}

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Solve a carpool request. The request is a JSON document \
                 naming vehicles, stops and the shared destination address. \
                 Distances come from a local matrix file when --matrix is \
                 given, otherwise from a Distance Matrix service.",
    about = "Plan pickup routes for a carpool request"
)]
#[ortho_config(prefix = "CARPOOL")]
pub(crate) struct SolveArgs {
    /// Path to a JSON file containing a SolveRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// JSON file of `{"addresses": [...], "distances": [[...]]}` used instead
    /// of the distance service.
    #[arg(long = ARG_SOLVE_MATRIX, value_name = "path")]
    #[serde(default)]
    pub(crate) matrix: Option<Utf8PathBuf>,
    /// Root URL of the Distance Matrix service.
    #[arg(long = ARG_SOLVE_MAPS_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) maps_base_url: Option<String>,
    /// API key for the Distance Matrix service.
    #[arg(long = ARG_SOLVE_MAPS_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) maps_api_key: Option<String>,
    /// Output format.
    #[arg(long = ARG_SOLVE_FORMAT, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
    /// Log verbosity on stderr.
    #[arg(long = ARG_LOG_LEVEL, value_enum)]
    #[serde(default)]
    pub(crate) log_level: Option<LogLevel>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Where distances come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DistanceSource {
    /// A local matrix file.
    Matrix(Utf8PathBuf),
    /// A Distance Matrix service.
    Service { base_url: String, api_key: String },
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Distance source.
    pub(crate) distances: DistanceSource,
    /// Output rendering.
    pub(crate) format: OutputFormat,
    /// Log verbosity.
    pub(crate) log_level: LogLevel,
}

impl SolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.request_path, ARG_SOLVE_REQUEST)?;
        if let DistanceSource::Matrix(path) = &self.distances {
            Self::require_existing(path, ARG_SOLVE_MATRIX)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match carpool_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_SOLVE_REQUEST,
            env: ENV_SOLVE_REQUEST,
        })?;

        let distances = match args.matrix {
            Some(path) => DistanceSource::Matrix(path),
            None => {
                let api_key = args.maps_api_key.ok_or(CliError::MissingArgument {
                    field: ARG_SOLVE_MAPS_API_KEY,
                    env: ENV_SOLVE_MAPS_API_KEY,
                })?;
                let default_base_url = HttpDistanceProviderConfig::default().base_url;
                DistanceSource::Service {
                    base_url: args.maps_base_url.unwrap_or(default_base_url),
                    api_key,
                }
            }
        };

        Ok(Self {
            request_path,
            distances,
            format: args.format.unwrap_or_default(),
            log_level: args.log_level.unwrap_or_default(),
        })
    }
}

/// A provider usable behind the solver.
pub(crate) type BoxedProvider = Box<dyn DistanceProvider + Send + Sync>;

/// Builds the distance provider for the current solve invocation.
pub(crate) trait SolveProviderBuilder {
    fn build(&self, config: &SolveConfig) -> Result<BoxedProvider, CliError>;
}

pub(crate) struct DefaultSolveProviderBuilder;

impl SolveProviderBuilder for DefaultSolveProviderBuilder {
    fn build(&self, config: &SolveConfig) -> Result<BoxedProvider, CliError> {
        match &config.distances {
            DistanceSource::Matrix(path) => Ok(Box::new(load_matrix(path)?)),
            DistanceSource::Service { base_url, api_key } => {
                Ok(Box::new(service_provider(base_url, api_key)?))
            }
        }
    }
}

/// HTTP provider behind a table cache, so repeated address lists are
/// fetched once per process.
pub(crate) fn service_provider(
    base_url: &str,
    api_key: &str,
) -> Result<CachingDistanceProvider<HttpDistanceProvider>, CliError> {
    let provider =
        HttpDistanceProvider::with_config(HttpDistanceProviderConfig::new(base_url, api_key))
            .map_err(|source| CliError::BuildDistanceProvider {
                base_url: base_url.to_owned(),
                source,
            })?;
    Ok(CachingDistanceProvider::new(provider))
}

pub(crate) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let config = resolve_solve_config(args)?;
    init_logger(config.log_level).map_err(CliError::InitLogging)?;
    let mut stdout = std::io::stdout().lock();
    execute_solve(&config, &DefaultSolveProviderBuilder, &mut stdout)
}

pub(crate) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn SolveProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_solve_config(args)?;
    execute_solve(&config, builder, writer)
}

fn resolve_solve_config(args: SolveArgs) -> Result<SolveConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Solve and print. A solver failure prints its structured body before the
/// error is returned.
fn execute_solve(
    config: &SolveConfig,
    builder: &dyn SolveProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let request = load_solve_request(&config.request_path)?;
    let provider = builder.build(config)?;
    let solver = InsertionSolver::new(provider);
    match solver.solve_report(&request) {
        Ok(summary) => write_solve_report(writer, summary, config.format),
        Err(source) => {
            log::warn!("solve failed: {source}");
            let body = serde_json::to_string_pretty(&source.to_body())
                .map_err(CliError::SerializeSolveOutput)?;
            write_line(writer, &body)?;
            Err(CliError::Solve { source })
        }
    }
}

/// Loads a JSON-encoded [`SolveRequest`] from disk.
pub(crate) fn load_solve_request(path: &Utf8Path) -> Result<SolveRequest, CliError> {
    let contents = read_utf8_file(path).map_err(|source| CliError::OpenSolveRequest {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::ParseSolveRequest {
        path: path.to_path_buf(),
        source,
    })
}

/// On-disk form of an offline distance matrix.
#[derive(Debug, Deserialize)]
struct MatrixFile {
    addresses: Vec<String>,
    distances: DistanceTable,
}

/// Loads an address-keyed distance matrix from disk.
pub(crate) fn load_matrix(path: &Utf8Path) -> Result<StaticDistanceProvider, CliError> {
    let contents = read_utf8_file(path).map_err(|source| CliError::OpenMatrix {
        path: path.to_path_buf(),
        source,
    })?;
    let matrix: MatrixFile = serde_json::from_str(&contents).map_err(|source| {
        CliError::ParseMatrix {
            path: path.to_path_buf(),
            source,
        }
    })?;
    StaticDistanceProvider::new(matrix.addresses, matrix.distances).map_err(|source| {
        CliError::InvalidMatrix {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn write_solve_report(
    writer: &mut dyn Write,
    summary: SolutionReport,
    format: OutputFormat,
) -> Result<(), CliError> {
    let payload = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&SolveResponse::from(summary))
            .map_err(CliError::SerializeSolveOutput)?,
        OutputFormat::Text => summary.to_string(),
    };
    write_line(writer, &payload)
}

fn write_line(writer: &mut dyn Write, payload: &str) -> Result<(), CliError> {
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteSolveOutput)?;
    writer
        .write_all(b"\n")
        .map_err(CliError::WriteSolveOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
