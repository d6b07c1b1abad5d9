//! Focused unit tests covering solve CLI configuration and input loading.

use super::helpers::{Workspace, town_request, write_utf8};
use super::*;
use crate::solve::{
    DefaultSolveProviderBuilder, DistanceSource, SolveConfig, SolveProviderBuilder,
    config_from_layers_for_test, load_matrix, load_solve_request, service_provider,
};
use carpool_core::DistanceProvider;
use log::LevelFilter;
use rstest::rstest;

fn matrix_config(workspace: &Workspace) -> SolveConfig {
    SolveConfig {
        request_path: workspace.request_path.clone(),
        distances: DistanceSource::Matrix(workspace.matrix_path.clone()),
        format: OutputFormat::Json,
        log_level: LogLevel::Warn,
    }
}

#[rstest]
fn converting_solve_without_request_errors() {
    let args = SolveArgs {
        request_path: None,
        ..SolveArgs::default()
    };

    let err = SolveConfig::try_from(args).expect_err("missing request should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_SOLVE_REQUEST);
            assert_eq!(env, ENV_SOLVE_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn converting_solve_without_any_distance_source_errors() {
    let args = SolveArgs {
        request_path: Some("request.json".into()),
        ..SolveArgs::default()
    };

    let err = SolveConfig::try_from(args).expect_err("missing key should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_SOLVE_MAPS_API_KEY);
            assert_eq!(env, ENV_SOLVE_MAPS_API_KEY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn service_source_defaults_base_url_and_output() {
    let args = SolveArgs {
        request_path: Some("request.json".into()),
        maps_api_key: Some("secret".to_owned()),
        ..SolveArgs::default()
    };

    let config = SolveConfig::try_from(args).expect("config should build");
    assert_eq!(
        config.distances,
        DistanceSource::Service {
            base_url: "https://maps.googleapis.com".to_owned(),
            api_key: "secret".to_owned(),
        }
    );
    assert_eq!(config.format, OutputFormat::Json);
    assert_eq!(config.log_level, LogLevel::Warn);
}

#[rstest]
fn matrix_source_wins_over_service_settings() {
    let args = SolveArgs {
        request_path: Some("request.json".into()),
        matrix: Some("matrix.json".into()),
        maps_api_key: Some("secret".to_owned()),
        format: Some(OutputFormat::Text),
        ..SolveArgs::default()
    };

    let config = SolveConfig::try_from(args).expect("config should build");
    assert_eq!(config.distances, DistanceSource::Matrix("matrix.json".into()));
    assert_eq!(config.format, OutputFormat::Text);
}

#[rstest]
#[case::missing_request(ARG_SOLVE_REQUEST, true, false)]
#[case::missing_matrix(ARG_SOLVE_MATRIX, false, true)]
fn validate_sources_reports_missing_inputs(
    #[case] expected_field: &'static str,
    #[case] drop_request: bool,
    #[case] drop_matrix: bool,
) {
    let workspace = Workspace::new();
    if !drop_request {
        workspace.write_request(&town_request(2));
    }
    if !drop_matrix {
        workspace.write_town_matrix();
    }

    let err = matrix_config(&workspace)
        .validate_sources()
        .expect_err("expected failure");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, expected_field),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_not_file() {
    let workspace = Workspace::new();
    std::fs::create_dir(&workspace.request_path).expect("request directory");

    let err = matrix_config(&workspace)
        .validate_sources()
        .expect_err("expected directory path to fail validation");
    match err {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_SOLVE_REQUEST);
            assert_eq!(path, workspace.request_path);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_skips_matrix_for_service_source() {
    let workspace = Workspace::new();
    workspace.write_request(&town_request(2));
    let config = SolveConfig {
        distances: DistanceSource::Service {
            base_url: "http://localhost:1".to_owned(),
            api_key: "secret".to_owned(),
        },
        ..matrix_config(&workspace)
    };

    config.validate_sources().expect("request exists");
}

#[rstest]
fn load_solve_request_decodes_json() {
    let workspace = Workspace::new();
    let request = town_request(2);
    workspace.write_request(&request);

    let decoded = load_solve_request(&workspace.request_path).expect("request should decode");
    assert_eq!(decoded, request);
}

#[rstest]
fn load_solve_request_accepts_camel_case_fields() {
    let workspace = Workspace::new();
    write_utf8(
        &workspace.request_path,
        br#"{
            "vehicles": [{"id": "v", "originAddress": "Home", "capacity": 3}],
            "stops": [{"id": "s", "address": "Corner"}],
            "destinationAddress": "Office",
            "budget": 50
        }"#,
    );

    let decoded = load_solve_request(&workspace.request_path).expect("request should decode");
    assert_eq!(decoded.vehicles.len(), 1);
    assert_eq!(decoded.destination_address.as_deref(), Some("Office"));
    assert_eq!(decoded.budget, Some(50));
}

#[rstest]
fn load_solve_request_rejects_invalid_json() {
    let workspace = Workspace::new();
    write_utf8(&workspace.request_path, b"{ not valid json");

    let err = load_solve_request(&workspace.request_path).expect_err("invalid json should error");
    match err {
        CliError::ParseSolveRequest { path, .. } => assert_eq!(path, workspace.request_path),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn load_solve_request_io_error_returns_open_error() {
    let workspace = Workspace::new();

    let err = load_solve_request(&workspace.request_path).expect_err("missing request should error");
    match err {
        CliError::OpenSolveRequest { path, .. } => assert_eq!(path, workspace.request_path),
        other => panic!("expected OpenSolveRequest, found {other:?}"),
    }
}

#[rstest]
fn load_matrix_resolves_addresses() {
    let workspace = Workspace::new();
    workspace.write_town_matrix();

    let provider = load_matrix(&workspace.matrix_path).expect("matrix should load");
    let table = provider
        .resolve_matrix(&["N1".to_owned(), "Office".to_owned()])
        .expect("addresses are known");
    assert_eq!(table, vec![vec![0, 8], vec![8, 0]]);
}

#[rstest]
#[case::ragged(br#"{"addresses": ["A", "B"], "distances": [[0, 1], [1]]}"#.as_slice())]
#[case::too_few_rows(br#"{"addresses": ["A", "B"], "distances": [[0, 1]]}"#.as_slice())]
fn load_matrix_rejects_unusable_tables(#[case] payload: &[u8]) {
    let workspace = Workspace::new();
    write_utf8(&workspace.matrix_path, payload);

    let err = load_matrix(&workspace.matrix_path).expect_err("table should be rejected");
    match err {
        CliError::InvalidMatrix { path, .. } => assert_eq!(path, workspace.matrix_path),
        other => panic!("expected InvalidMatrix, found {other:?}"),
    }
}

#[rstest]
fn load_matrix_rejects_invalid_json() {
    let workspace = Workspace::new();
    write_utf8(&workspace.matrix_path, b"[1, 2");

    let err = load_matrix(&workspace.matrix_path).expect_err("invalid json should error");
    assert!(matches!(err, CliError::ParseMatrix { .. }), "{err:?}");
}

#[rstest]
fn default_builder_reports_bad_service_url() {
    let workspace = Workspace::new();
    let config = SolveConfig {
        distances: DistanceSource::Service {
            base_url: "not a url".to_owned(),
            api_key: "secret".to_owned(),
        },
        ..matrix_config(&workspace)
    };

    let err = DefaultSolveProviderBuilder
        .build(&config)
        .err()
        .expect("invalid base URL should fail");
    match err {
        CliError::BuildDistanceProvider { base_url, .. } => assert_eq!(base_url, "not a url"),
        other => panic!("expected BuildDistanceProvider, found {other:?}"),
    }
}

#[rstest]
fn service_provider_starts_with_an_empty_cache() {
    let provider =
        service_provider("http://localhost:8080", "secret").expect("provider should build");
    assert_eq!(provider.cached_entries(), 0);
    assert_eq!(provider.inner().config().base_url, "http://localhost:8080");
    assert_eq!(provider.inner().config().api_key, "secret");
}

#[rstest]
fn load_solve_request_reports_directories_as_read_errors() {
    let workspace = Workspace::new();
    std::fs::create_dir(&workspace.request_path).expect("request directory");

    let err = load_solve_request(&workspace.request_path).expect_err("directory is not JSON");
    assert!(matches!(err, CliError::OpenSolveRequest { .. }), "{err:?}");
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "request_path": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let workspace = Workspace::new();
    let env_request = workspace.root.join("from-env-request.json");
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "maps_base_url": "http://from-file:8080",
            "maps_api_key": "file-key",
            "format": "text",
        }),
        None,
    );
    composer.push_environment(json!({
        "request_path": env_request.as_str(),
        "maps_api_key": "env-key",
        "log_level": "debug",
    }));
    composer.push_cli(json!({
        "maps_api_key": "cli-key",
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.request_path, env_request);
    assert_eq!(
        config.distances,
        DistanceSource::Service {
            base_url: "http://from-file:8080".to_owned(),
            api_key: "cli-key".to_owned(),
        }
    );
    assert_eq!(config.format, OutputFormat::Text);
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[rstest]
#[case(LogLevel::Error, LevelFilter::Error)]
#[case(LogLevel::Warn, LevelFilter::Warn)]
#[case(LogLevel::Info, LevelFilter::Info)]
#[case(LogLevel::Debug, LevelFilter::Debug)]
#[case(LogLevel::Trace, LevelFilter::Trace)]
#[case(LogLevel::Off, LevelFilter::Off)]
fn log_levels_map_to_filters(#[case] level: LogLevel, #[case] expected: LevelFilter) {
    assert_eq!(level.to_filter(), expected);
}

#[rstest]
#[case("warning", LogLevel::Warn)]
#[case("trace", LogLevel::Trace)]
fn log_level_flag_accepts_names_and_aliases(#[case] raw: &str, #[case] expected: LogLevel) {
    let cli = Cli::try_parse_from(["carpool", "solve", "request.json", "--log-level", raw])
        .expect("log level should parse");
    let Command::Solve(args) = cli.command;
    assert_eq!(args.log_level, Some(expected));
}
