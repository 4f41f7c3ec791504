//! Destinations for routes found during an accessibility run.

use thiserror::Error;

use crate::{FoundRoute, Point};

/// Errors reported by a [`RouteSink`].
#[derive(Debug, Error)]
pub enum RouteSinkError {
    /// Serialising the route failed.
    #[error("failed to serialise route {source_id}->{target_id}: {message}")]
    Serialise {
        source_id: i64,
        target_id: i64,
        message: String,
    },
    /// Writing the route failed.
    #[error("failed to write route {source_id}->{target_id} to {location}: {source}")]
    Write {
        source_id: i64,
        target_id: i64,
        location: String,
        #[source]
        source: std::io::Error,
    },
}

/// Receives every route found by the accessibility driver.
///
/// Routes are keyed by `(source.id, target.id)`. Implementations should
/// overwrite an earlier route for the same pair rather than accumulate.
pub trait RouteSink {
    /// Store the route found from `source` to `target`.
    fn persist(
        &mut self,
        source: &Point,
        target: &Point,
        route: &FoundRoute,
    ) -> Result<(), RouteSinkError>;
}
