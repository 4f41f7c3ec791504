//! `probe` and `landmark` subcommands.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rap_core::{
    ExtraParams, Point, RoutingProfile, compute_accessibility, compute_landmark_accessibility,
};
use rap_data::io::{
    FileRouteSink, accessibility_csv_path, load_extra_params, load_landmark, load_points,
    route_dir, write_accessibility_csv,
};
use rap_data::routing::{
    ClientOptions, DEFAULT_ROUTER_CONFIG, DEFAULT_TIMEOUT_SECS, Provider, RoutersConfig,
    create_client_with,
};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_INPUT, ARG_LANDMARK, ARG_NO_SAVE_ROUTES, ARG_OUTPUT_DIR, ARG_PARAMS, ARG_PROFILE,
    ARG_ROUTER, ARG_ROUTER_CONFIG, ARG_TIMEOUT_SECS, CliError, ENV_LANDMARK, ENV_LANDMARK_INPUT,
    ENV_LANDMARK_PROFILE, ENV_LANDMARK_ROUTER, ENV_PROBE_INPUT, ENV_PROBE_PROFILE,
    ENV_PROBE_ROUTER,
};

pub(crate) const DEFAULT_OUTPUT_DIR: &str = "output";

/// CLI arguments for the `probe` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Query the routing provider for every ordered pair of input \
                 points and count, for each point, how many other points can \
                 reach it. Options can come from CLI flags, configuration \
                 files, or RAPY_ environment variables.",
    about = "Count how many input points can reach each point"
)]
#[ortho_config(prefix = "RAPY")]
pub(crate) struct ProbeArgs {
    /// Routing provider: mapbox, google, ors or graphhopper.
    #[arg(long = ARG_ROUTER, value_name = "name")]
    #[serde(default)]
    pub(crate) router: Option<String>,
    /// Canonical routing profile, e.g. `walking` or `cycling.road`.
    #[arg(long = ARG_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// CSV file with `id`, `x` and `y` columns.
    #[arg(long = ARG_INPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Directory receiving the accessibility table and route files.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// JSON object of extra query parameters sent with every request.
    #[arg(long = ARG_PARAMS, value_name = "path")]
    #[serde(default)]
    pub(crate) params: Option<Utf8PathBuf>,
    /// Router keys and rate limits (default `routerconf.json`).
    #[arg(long = ARG_ROUTER_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) router_config: Option<Utf8PathBuf>,
    /// Per-request timeout in seconds (default 30).
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Do not write a JSON file per found route.
    #[arg(long = ARG_NO_SAVE_ROUTES)]
    #[serde(default)]
    pub(crate) no_save_routes: bool,
}

impl ProbeArgs {
    pub(crate) fn into_config(self) -> Result<ProbeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ProbeConfig::try_from(merged)
    }
}

/// CLI arguments for the `landmark` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Query the routing provider once per input point, starting \
                 from a landmark read from a GeoJSON Point feature. Each \
                 point scores 1 when the landmark reaches it and 0 otherwise. \
                 Route files land in a directory named after today's date.",
    about = "Check which points a landmark can reach"
)]
#[ortho_config(prefix = "RAPY")]
pub(crate) struct LandmarkArgs {
    /// GeoJSON file holding the landmark Point feature.
    #[arg(long = ARG_LANDMARK, value_name = "path")]
    #[serde(default)]
    pub(crate) landmark: Option<Utf8PathBuf>,
    /// Routing provider: mapbox, google, ors or graphhopper.
    #[arg(long = ARG_ROUTER, value_name = "name")]
    #[serde(default)]
    pub(crate) router: Option<String>,
    /// Canonical routing profile, e.g. `walking` or `cycling.road`.
    #[arg(long = ARG_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// CSV file with `id`, `x` and `y` columns.
    #[arg(long = ARG_INPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Directory receiving the accessibility table and route files.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// JSON object of extra query parameters sent with every request.
    #[arg(long = ARG_PARAMS, value_name = "path")]
    #[serde(default)]
    pub(crate) params: Option<Utf8PathBuf>,
    /// Router keys and rate limits (default `routerconf.json`).
    #[arg(long = ARG_ROUTER_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) router_config: Option<Utf8PathBuf>,
    /// Per-request timeout in seconds (default 30).
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Do not write a JSON file per found route.
    #[arg(long = ARG_NO_SAVE_ROUTES)]
    #[serde(default)]
    pub(crate) no_save_routes: bool,
}

impl LandmarkArgs {
    pub(crate) fn into_config(self) -> Result<LandmarkConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        LandmarkConfig::try_from(merged)
    }

    fn split(self) -> (Option<Utf8PathBuf>, ProbeArgs) {
        let probe = ProbeArgs {
            router: self.router,
            profile: self.profile,
            input: self.input,
            output_dir: self.output_dir,
            params: self.params,
            router_config: self.router_config,
            timeout_secs: self.timeout_secs,
            no_save_routes: self.no_save_routes,
        };
        (self.landmark, probe)
    }
}

/// Environment variables named in missing-argument errors.
struct RequiredEnv {
    router: &'static str,
    profile: &'static str,
    input: &'static str,
}

const PROBE_ENV: RequiredEnv = RequiredEnv {
    router: ENV_PROBE_ROUTER,
    profile: ENV_PROBE_PROFILE,
    input: ENV_PROBE_INPUT,
};

const LANDMARK_ENV: RequiredEnv = RequiredEnv {
    router: ENV_LANDMARK_ROUTER,
    profile: ENV_LANDMARK_PROFILE,
    input: ENV_LANDMARK_INPUT,
};

/// Resolved `probe` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProbeConfig {
    pub(crate) router: Provider,
    pub(crate) profile: RoutingProfile,
    pub(crate) input: Utf8PathBuf,
    pub(crate) output_dir: Utf8PathBuf,
    pub(crate) params: Option<Utf8PathBuf>,
    pub(crate) router_config: Utf8PathBuf,
    pub(crate) timeout: Duration,
    pub(crate) save_routes: bool,
}

impl ProbeConfig {
    fn resolve(args: ProbeArgs, env: &RequiredEnv) -> Result<Self, CliError> {
        let router = args.router.ok_or(CliError::MissingArgument {
            field: ARG_ROUTER,
            env: env.router,
        })?;
        let profile = args.profile.ok_or(CliError::MissingArgument {
            field: ARG_PROFILE,
            env: env.profile,
        })?;
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: env.input,
        })?;
        let timeout_secs = args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(CliError::InvalidTimeout);
        }

        Ok(Self {
            router: router.parse()?,
            profile: profile.parse()?,
            input,
            output_dir: args
                .output_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_DIR)),
            params: args.params,
            router_config: args
                .router_config
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_ROUTER_CONFIG)),
            timeout: Duration::from_secs(timeout_secs),
            save_routes: !args.no_save_routes,
        })
    }

    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.input, ARG_INPUT)?;
        require_existing(&self.router_config, ARG_ROUTER_CONFIG)?;
        if let Some(params) = &self.params {
            require_existing(params, ARG_PARAMS)?;
        }
        require_output_dir(&self.output_dir)
    }

    /// Probe the input points and write `<output-dir>/<provider>.csv`.
    ///
    /// With a `landmark`, only landmark-to-point queries are issued. Found
    /// routes go under `route_date` when one is given. Returns the path of
    /// the accessibility table.
    pub(crate) fn execute(
        &self,
        landmark: Option<Point>,
        route_date: Option<NaiveDate>,
    ) -> Result<Utf8PathBuf, CliError> {
        let points = load_points(&self.input)?;
        if let Some(landmark) = landmark
            && points.iter().any(|point| point.id == landmark.id)
        {
            return Err(CliError::ReservedPointId {
                id: landmark.id,
                path: self.input.clone(),
            });
        }
        let params = match &self.params {
            Some(path) => load_extra_params(path)?,
            None => ExtraParams::new(),
        };
        let routers = RoutersConfig::load(&self.router_config)?;
        let options = ClientOptions::default().with_timeout(self.timeout);
        let service = create_client_with(self.router.name(), self.profile, &routers, &options)?;

        let mut sink = self.save_routes.then(|| {
            FileRouteSink::new(route_dir(
                &self.output_dir,
                self.router.name(),
                self.profile.as_str(),
                route_date,
            ))
        });
        let run = match landmark {
            Some(landmark) => compute_landmark_accessibility(service.as_ref(), landmark, &points),
            None => compute_accessibility(service.as_ref(), &points),
        }
        .with_params(&params);
        let run = match sink.as_mut() {
            Some(sink) => run.with_sink(sink),
            None => run,
        };
        log::info!(
            "probing {} points with {} ({} queries)",
            points.len(),
            self.router,
            run.total_queries()
        );

        let table = accessibility_csv_path(&self.output_dir, self.router.name());
        write_accessibility_csv(&table, run)?;
        Ok(table)
    }
}

impl TryFrom<ProbeArgs> for ProbeConfig {
    type Error = CliError;

    fn try_from(args: ProbeArgs) -> Result<Self, Self::Error> {
        Self::resolve(args, &PROBE_ENV)
    }
}

/// Resolved `landmark` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LandmarkConfig {
    pub(crate) landmark: Utf8PathBuf,
    pub(crate) probe: ProbeConfig,
}

impl LandmarkConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.landmark, ARG_LANDMARK)?;
        self.probe.validate_sources()
    }

    /// Probe from the landmark, storing routes under `date`.
    pub(crate) fn execute(&self, date: NaiveDate) -> Result<Utf8PathBuf, CliError> {
        let landmark = load_landmark(&self.landmark)?;
        self.probe.execute(Some(landmark), Some(date))
    }
}

impl TryFrom<LandmarkArgs> for LandmarkConfig {
    type Error = CliError;

    fn try_from(args: LandmarkArgs) -> Result<Self, Self::Error> {
        let (landmark, probe) = args.split();
        let landmark = landmark.ok_or(CliError::MissingArgument {
            field: ARG_LANDMARK,
            env: ENV_LANDMARK,
        })?;
        Ok(Self {
            landmark,
            probe: ProbeConfig::resolve(probe, &LANDMARK_ENV)?,
        })
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match rap_fs::file_is_file(path) {
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

/// A missing output directory is created on write.
fn require_output_dir(path: &Utf8Path) -> Result<(), CliError> {
    match rap_fs::dir_is_dir(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::OutputDirectoryNotDirectory {
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CliError::InspectSourcePath {
            field: ARG_OUTPUT_DIR,
            path: path.to_path_buf(),
            source,
        }),
    }
}
