//! The routing-service contract shared by every provider adapter.
//!
//! A [`RoutingService`] answers one question: is there a path from `source`
//! to `target`? Adapters are bound to a single provider and profile for their
//! whole lifetime, so the call carries only coordinates and optional extra
//! query parameters.
//!
//! [`RouteResult::NotFound`] is a confirmed negative answer from the
//! provider. A [`RoutingError`] means the question could not be answered at
//! all, for example because of bad input or a provider outage.

use std::time::Duration;

use geo::Coord;
use thiserror::Error;

use crate::{CoordinateError, ExtraParams, RouteResult};

/// Errors from [`RoutingService::find_path`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// A coordinate was outside the WGS84 range.
    #[error("invalid coordinate ({lng}, {lat}): {source}")]
    InvalidCoordinate {
        lng: f64,
        lat: f64,
        #[source]
        source: CoordinateError,
    },
    /// The request could not be delivered (DNS, connection refused, TLS).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    /// The provider answered with a failure status or error payload.
    #[error("provider error (HTTP {status}, {code}): {message}")]
    Provider {
        status: u16,
        code: String,
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse provider response: {message}")]
    Parse { message: String },
    /// The calling thread cannot block on a request.
    #[error("cannot wait for the provider here: {message}")]
    Runtime { message: String },
}

impl RoutingError {
    /// Whether the error happened below the HTTP layer.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

/// Find a path between two coordinates with a bound provider and profile.
///
/// Coordinates are `(lng, lat)`: `x` is the longitude and `y` the latitude.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use rap_core::{ExtraParams, RouteResult, RoutingError, RoutingService};
///
/// /// Finds a route only when travelling eastwards.
/// struct Eastbound;
///
/// impl RoutingService for Eastbound {
///     fn find_path(
///         &self,
///         source: Coord<f64>,
///         target: Coord<f64>,
///         _params: &ExtraParams,
///     ) -> Result<RouteResult, RoutingError> {
///         if target.x > source.x {
///             let line = serde_json::json!([[source.x, source.y], [target.x, target.y]]);
///             Ok(RouteResult::Found(rap_core::FoundRoute::new(line, serde_json::Value::Null)))
///         } else {
///             Ok(RouteResult::NotFound)
///         }
///     }
/// }
///
/// let result = Eastbound.find_path(
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 0.0 },
///     &ExtraParams::new(),
/// )?;
/// assert!(result.is_found());
/// # Ok::<(), RoutingError>(())
/// ```
pub trait RoutingService {
    /// Query the provider for a path from `source` to `target`.
    ///
    /// Implementations must return [`RoutingError::InvalidCoordinate`] for
    /// out-of-range coordinates without contacting the provider.
    fn find_path(
        &self,
        source: Coord<f64>,
        target: Coord<f64>,
        params: &ExtraParams,
    ) -> Result<RouteResult, RoutingError>;
}

impl<T: RoutingService + ?Sized> RoutingService for &T {
    fn find_path(
        &self,
        source: Coord<f64>,
        target: Coord<f64>,
        params: &ExtraParams,
    ) -> Result<RouteResult, RoutingError> {
        (**self).find_path(source, target, params)
    }
}

impl<T: RoutingService + ?Sized> RoutingService for Box<T> {
    fn find_path(
        &self,
        source: Coord<f64>,
        target: Coord<f64>,
        params: &ExtraParams,
    ) -> Result<RouteResult, RoutingError> {
        (**self).find_path(source, target, params)
    }
}

/// Validate both ends of a query, mapping failures to
/// [`RoutingError::InvalidCoordinate`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use rap_core::service::check_endpoints;
///
/// assert!(check_endpoints(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }).is_ok());
/// assert!(check_endpoints(Coord { x: 0.0, y: 0.0 }, Coord { x: 200.0, y: 1.0 }).is_err());
/// ```
pub fn check_endpoints(source: Coord<f64>, target: Coord<f64>) -> Result<(), RoutingError> {
    for coord in [source, target] {
        crate::validate_coordinate(coord).map_err(|source| RoutingError::InvalidCoordinate {
            lng: coord.x,
            lat: coord.y,
            source,
        })?;
    }
    Ok(())
}
