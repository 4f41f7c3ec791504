//! Focused unit tests covering probe configuration and execution.

use super::helpers::{POINTS_CSV, ProbeFiles};
use super::*;
use crate::probe::DEFAULT_OUTPUT_DIR;
use camino::Utf8PathBuf;
use chrono::NaiveDate;
use rap_core::{Point, RoutingProfile};
use rap_data::routing::{BuildClientError, Provider};
use rstest::{fixture, rstest};
use std::{fs, time::Duration};

#[fixture]
fn files() -> ProbeFiles {
    ProbeFiles::new()
}

fn probe_args(files: &ProbeFiles) -> ProbeArgs {
    ProbeArgs {
        router: Some("graphhopper".to_owned()),
        profile: Some("cycling".to_owned()),
        input: Some(files.points().to_path_buf()),
        output_dir: Some(files.output_dir()),
        router_config: Some(files.router_config().to_path_buf()),
        ..ProbeArgs::default()
    }
}

#[rstest]
#[case(None, Some("walking"), Some("points.csv"), ARG_ROUTER, ENV_PROBE_ROUTER)]
#[case(Some("mapbox"), None, Some("points.csv"), ARG_PROFILE, ENV_PROBE_PROFILE)]
#[case(Some("mapbox"), Some("walking"), None, ARG_INPUT, ENV_PROBE_INPUT)]
fn converting_without_required_fields_errors(
    #[case] router: Option<&str>,
    #[case] profile: Option<&str>,
    #[case] input: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = ProbeArgs {
        router: router.map(str::to_owned),
        profile: profile.map(str::to_owned),
        input: input.map(Utf8PathBuf::from),
        ..ProbeArgs::default()
    };
    let err = ProbeConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn landmark_subcommand_names_its_own_variables() {
    let args = LandmarkArgs {
        landmark: Some(Utf8PathBuf::from("hbf.geojson")),
        profile: Some("walking".to_owned()),
        input: Some(Utf8PathBuf::from("points.csv")),
        ..LandmarkArgs::default()
    };
    let err = LandmarkConfig::try_from(args).expect_err("router is missing");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_ROUTER);
            assert_eq!(env, ENV_LANDMARK_ROUTER);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }

    let args = LandmarkArgs {
        router: Some("ors".to_owned()),
        profile: Some("walking".to_owned()),
        input: Some(Utf8PathBuf::from("points.csv")),
        ..LandmarkArgs::default()
    };
    match LandmarkConfig::try_from(args).expect_err("landmark is missing") {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_LANDMARK);
            assert_eq!(env, ENV_LANDMARK);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn defaults_fill_optional_settings() {
    let args = ProbeArgs {
        router: Some("OpenRouteService".to_owned()),
        profile: Some("cycling.road".to_owned()),
        input: Some(Utf8PathBuf::from("points.csv")),
        ..ProbeArgs::default()
    };
    let config = ProbeConfig::try_from(args).expect("valid arguments");
    assert_eq!(
        config,
        ProbeConfig {
            router: Provider::OpenRouteService,
            profile: RoutingProfile::CyclingRoad,
            input: Utf8PathBuf::from("points.csv"),
            output_dir: Utf8PathBuf::from(DEFAULT_OUTPUT_DIR),
            params: None,
            router_config: Utf8PathBuf::from("routerconf.json"),
            timeout: Duration::from_secs(30),
            save_routes: true,
        }
    );
}

#[rstest]
fn unknown_router_is_rejected() {
    let args = ProbeArgs {
        router: Some("osrm".to_owned()),
        profile: Some("walking".to_owned()),
        input: Some(Utf8PathBuf::from("points.csv")),
        ..ProbeArgs::default()
    };
    match ProbeConfig::try_from(args).expect_err("unknown router") {
        CliError::BuildClient(BuildClientError::UnknownProvider(name)) => assert_eq!(name, "osrm"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn unknown_profile_is_rejected() {
    let args = ProbeArgs {
        router: Some("mapbox".to_owned()),
        profile: Some("skating".to_owned()),
        input: Some(Utf8PathBuf::from("points.csv")),
        ..ProbeArgs::default()
    };
    assert!(matches!(
        ProbeConfig::try_from(args),
        Err(CliError::InvalidProfile(_))
    ));
}

#[rstest]
fn zero_timeout_is_rejected() {
    let args = ProbeArgs {
        router: Some("mapbox".to_owned()),
        profile: Some("walking".to_owned()),
        input: Some(Utf8PathBuf::from("points.csv")),
        timeout_secs: Some(0),
        ..ProbeArgs::default()
    };
    assert!(matches!(
        ProbeConfig::try_from(args),
        Err(CliError::InvalidTimeout)
    ));
}

#[rstest]
fn validate_sources_reports_missing_files(files: ProbeFiles) {
    let mut config = ProbeConfig::try_from(probe_args(&files)).expect("valid arguments");
    config.input = files.path("missing.csv");
    match config.validate_sources().expect_err("expected failure") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_INPUT),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_directories(files: ProbeFiles) {
    let mut config = ProbeConfig::try_from(probe_args(&files)).expect("valid arguments");
    fs::create_dir_all(files.path("conf.d")).expect("mkdir");
    config.router_config = files.path("conf.d");
    match config.validate_sources().expect_err("expected directory rejection") {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_ROUTER_CONFIG),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn validate_sources_checks_optional_params(files: ProbeFiles) {
    let mut config = ProbeConfig::try_from(probe_args(&files)).expect("valid arguments");
    config.params = Some(files.path("extra.json"));
    match config.validate_sources().expect_err("params file is missing") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_PARAMS),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_output_file(files: ProbeFiles) {
    let mut config = ProbeConfig::try_from(probe_args(&files)).expect("valid arguments");
    let output_file = files.path("results.txt");
    fs::write(&output_file, b"existing results").expect("write output file");
    config.output_dir = output_file;
    match config.validate_sources().expect_err("expected output validation to fail") {
        CliError::OutputDirectoryNotDirectory { .. } => {}
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn validate_sources_accepts_a_missing_output_directory(files: ProbeFiles) {
    let config = ProbeConfig::try_from(probe_args(&files)).expect("valid arguments");
    assert!(!files.output_dir().exists());
    config.validate_sources().expect("output directory is created later");
}

#[rstest]
fn landmark_validation_requires_the_landmark_file(files: ProbeFiles) {
    let config = LandmarkConfig {
        landmark: files.path("absent.geojson"),
        probe: ProbeConfig::try_from(probe_args(&files)).expect("valid arguments"),
    };
    match config.validate_sources().expect_err("landmark is missing") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_LANDMARK),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn unreachable_router_still_writes_the_table(files: ProbeFiles) {
    let config = ProbeConfig::try_from(probe_args(&files)).expect("valid arguments");
    let table = config.execute(None, None).expect("run completes");

    assert_eq!(table, files.output_dir().join("graphhopper.csv"));
    let written = fs::read_to_string(&table).expect("read table");
    assert_eq!(
        written,
        "id,x,y,accessibility\n1,13.38,52.52,0\n2,13.41,52.5,0\n3,13.45,52.51,0\n"
    );
    assert!(!files.output_dir().join("graphhopper").exists());
}

#[rstest]
fn landmark_run_scores_every_point(files: ProbeFiles) {
    let config = LandmarkConfig {
        landmark: files.landmark().to_path_buf(),
        probe: ProbeConfig::try_from(probe_args(&files)).expect("valid arguments"),
    };
    let date = NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid date");
    let table = config.execute(date).expect("run completes");

    let written = fs::read_to_string(&table).expect("read table");
    let rows: Vec<&str> = written.lines().collect();
    assert_eq!(rows.len(), POINTS_CSV.lines().count());
    assert!(rows.iter().skip(1).all(|row| row.ends_with(",0")));
}

#[rstest]
fn landmark_run_rejects_the_reserved_point_id(files: ProbeFiles) {
    fs::write(files.points(), "id,x,y\n-1,13.38,52.52\n2,13.41,52.5\n").expect("write points");
    let config = LandmarkConfig {
        landmark: files.landmark().to_path_buf(),
        probe: ProbeConfig::try_from(probe_args(&files)).expect("valid arguments"),
    };
    let date = NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid date");

    match config.execute(date).expect_err("id -1 collides with the landmark") {
        CliError::ReservedPointId { id, path } => {
            assert_eq!(id, Point::LANDMARK_ID);
            assert_eq!(path, files.points());
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!files.output_dir().exists());
}

#[rstest]
fn all_pairs_run_accepts_negative_ids(files: ProbeFiles) {
    fs::write(files.points(), "id,x,y\n-1,13.38,52.52\n2,13.41,52.5\n").expect("write points");
    let config = ProbeConfig::try_from(probe_args(&files)).expect("valid arguments");

    let table = config.execute(None, None).expect("run completes");

    let written = fs::read_to_string(&table).expect("read table");
    assert!(written.contains("\n-1,13.38,52.52,0\n"));
}

#[rstest]
fn unconfigured_provider_fails_before_writing(files: ProbeFiles) {
    let mut args = probe_args(&files);
    args.router = Some("mapbox".to_owned());
    let config = ProbeConfig::try_from(args).expect("valid arguments");
    match config.execute(None, None).expect_err("no mapbox key") {
        CliError::BuildClient(BuildClientError::MissingCredentials { provider }) => {
            assert_eq!(provider, Provider::Mapbox);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!files.output_dir().exists());
}

#[rstest]
#[case(&["rapy", "-v", "probe", "--router", "ors"], true)]
#[case(&["rapy", "probe", "--router", "ors", "--verbose"], true)]
#[case(&["rapy", "probe", "--router", "ors"], false)]
fn verbosity_flag_is_global(#[case] argv: &[&str], #[case] verbose: bool) {
    let cli = Cli::try_parse_from(argv).expect("valid invocation");
    assert_eq!(cli.verbose, verbose);
    match cli.command {
        Command::Probe(args) => assert_eq!(args.router.as_deref(), Some("ors")),
        other => panic!("unexpected command {other:?}"),
    }
}

#[rstest]
fn no_save_routes_flag_disables_persistence() {
    let cli = Cli::try_parse_from([
        "rapy",
        "landmark",
        "--landmark",
        "hbf.geojson",
        "--router",
        "google",
        "--profile",
        "driving",
        "--input",
        "points.csv",
        "--no-save-routes",
        "--timeout-secs",
        "5",
    ])
    .expect("valid invocation");
    let Command::Landmark(args) = cli.command else {
        panic!("expected the landmark command");
    };
    let config = LandmarkConfig::try_from(args).expect("valid arguments");
    assert!(!config.probe.save_routes);
    assert_eq!(config.probe.timeout, Duration::from_secs(5));
    assert_eq!(config.probe.router, Provider::Google);
}
