//! Command-line interface for probing point accessibility with routing
//! services.
#![forbid(unsafe_code)]

use chrono::Local;
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};

mod error;
mod probe;

pub use error::CliError;
use probe::{LandmarkArgs, LandmarkConfig, ProbeArgs, ProbeConfig};

const ARG_ROUTER: &str = "router";
const ARG_PROFILE: &str = "profile";
const ARG_INPUT: &str = "input";
const ARG_LANDMARK: &str = "landmark";
const ARG_OUTPUT_DIR: &str = "output-dir";
const ARG_PARAMS: &str = "params";
const ARG_ROUTER_CONFIG: &str = "router-config";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_NO_SAVE_ROUTES: &str = "no-save-routes";
const ENV_PROBE_ROUTER: &str = "RAPY_CMDS_PROBE_ROUTER";
const ENV_PROBE_PROFILE: &str = "RAPY_CMDS_PROBE_PROFILE";
const ENV_PROBE_INPUT: &str = "RAPY_CMDS_PROBE_INPUT";
const ENV_LANDMARK_ROUTER: &str = "RAPY_CMDS_LANDMARK_ROUTER";
const ENV_LANDMARK_PROFILE: &str = "RAPY_CMDS_LANDMARK_PROFILE";
const ENV_LANDMARK_INPUT: &str = "RAPY_CMDS_LANDMARK_INPUT";
const ENV_LANDMARK: &str = "RAPY_CMDS_LANDMARK_LANDMARK";

/// Run the `rapy` CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose);
    let table = match cli.command {
        Command::Probe(args) => resolve_probe_config(args)?.execute(None, None)?,
        Command::Landmark(args) => {
            resolve_landmark_config(args)?.execute(Local::now().date_naive())?
        }
    };
    log::info!("accessibility table written to {table}");
    Ok(())
}

fn resolve_probe_config(args: ProbeArgs) -> Result<ProbeConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn resolve_landmark_config(args: LandmarkArgs) -> Result<LandmarkConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// `RUST_LOG` wins over the verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let outcome = Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init();
    if let Err(err) = outcome {
        log::debug!("logger already installed: {err}");
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "rapy",
    about = "Probe point accessibility through commercial routing services",
    version
)]
struct Cli {
    /// Log every route query.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Count, for every point, how many other points can reach it.
    Probe(ProbeArgs),
    /// Check which points can be reached from a single landmark.
    Landmark(LandmarkArgs),
}

#[cfg(test)]
mod tests;
