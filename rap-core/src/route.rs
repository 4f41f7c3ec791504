use serde_json::Value;

/// A route returned by a provider.
///
/// `geometry` is the provider's path geometry as found in its response
/// (GeoJSON, an encoded polyline string, ...). `raw` is the complete decoded
/// response body.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundRoute {
    pub geometry: Value,
    pub raw: Value,
}

impl FoundRoute {
    /// Construct a route from its geometry and the raw response.
    pub const fn new(geometry: Value, raw: Value) -> Self {
        Self { geometry, raw }
    }
}

/// Outcome of a single path query.
///
/// `NotFound` is a valid negative answer from the provider, not an error.
/// Transport and provider failures are reported through
/// [`RoutingError`](crate::RoutingError) instead.
///
/// # Examples
/// ```
/// use rap_core::{FoundRoute, RouteResult};
/// use serde_json::json;
///
/// let found = RouteResult::Found(FoundRoute::new(json!("_p~iF~ps|U"), json!({})));
/// assert!(found.is_found());
/// assert!(!RouteResult::NotFound.is_found());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResult {
    /// The provider confirmed that no route exists.
    NotFound,
    /// The provider returned a route.
    Found(FoundRoute),
}

impl RouteResult {
    /// Whether a route was found.
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Borrow the found route, if any.
    pub const fn route(&self) -> Option<&FoundRoute> {
        match self {
            Self::Found(route) => Some(route),
            Self::NotFound => None,
        }
    }
}
