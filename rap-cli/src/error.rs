//! Error types emitted by the `rapy` CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use rap_core::ParseProfileError;
use rap_data::io::{InputError, OutputError};
use rap_data::routing::{BuildClientError, RouterConfigError};
use thiserror::Error;

/// Errors emitted by the `rapy` CLI.
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
    /// A referenced path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The output directory exists but is not a directory.
    #[error("output directory {path:?} is not a directory")]
    OutputDirectoryNotDirectory { path: Utf8PathBuf },
    /// A points row uses the id reserved for the landmark.
    #[error("points file {path:?} uses id {id}, which is reserved for the landmark")]
    ReservedPointId { id: i64, path: Utf8PathBuf },
    /// The request timeout must be at least one second.
    #[error("timeout must be at least one second")]
    InvalidTimeout,
    /// The profile is not one of the canonical names.
    #[error(transparent)]
    InvalidProfile(#[from] ParseProfileError),
    /// The router configuration file could not be loaded.
    #[error(transparent)]
    RouterConfig(#[from] RouterConfigError),
    /// No routing client could be built for the provider and profile.
    #[error("failed to build routing client: {0}")]
    BuildClient(#[from] BuildClientError),
    /// Points, landmark or extra parameters could not be loaded.
    #[error(transparent)]
    Input(#[from] InputError),
    /// Results could not be written.
    #[error(transparent)]
    Output(#[from] OutputError),
}
