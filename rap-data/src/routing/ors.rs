//! OpenRouteService directions.
//!
//! ORS signals unroutable input through numbered error codes rather than an
//! empty result: 2009 when no route exists between routable points and 2010
//! when a point cannot be snapped to the network. Both count as "no route".
//!
//! See: <https://openrouteservice.org/dev/#/api-docs/directions>

use geo::Coord;
use rap_core::{ExtraParams, FoundRoute, RouteResult, RoutingError, RoutingProfile};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::client::{
    DirectionsApi, append_params, excerpt, join_path, lng_lat, parse_body, status_reason,
    unexpected_response,
};
use super::factory::Provider;

/// Public OpenRouteService endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Route could not be found between the given points.
const ROUTE_NOT_FOUND: u64 = 2009;
/// A point could not be matched to a routable road.
const POINT_NOT_FOUND: u64 = 2010;

/// ORS profile for a canonical profile.
///
/// ORS covers every canonical profile. Base modes map to the default
/// variant of their family.
pub const fn profile_name(profile: RoutingProfile) -> Option<&'static str> {
    Some(match profile {
        RoutingProfile::Driving | RoutingProfile::DrivingCar => "driving-car",
        RoutingProfile::DrivingHgv => "driving-hgv",
        RoutingProfile::Walking | RoutingProfile::WalkingNormal => "foot-walking",
        RoutingProfile::WalkingHiking => "foot-hiking",
        RoutingProfile::Cycling | RoutingProfile::CyclingNormal => "cycling-regular",
        RoutingProfile::CyclingRoad => "cycling-road",
        RoutingProfile::CyclingSafe => "cycling-safe",
        RoutingProfile::CyclingMountain => "cycling-mountain",
        RoutingProfile::CyclingTour => "cycling-tour",
        RoutingProfile::CyclingEbike => "cycling-electric",
    })
}

/// Adapter for OpenRouteService.
#[derive(Debug, Clone)]
pub struct OpenRouteService {
    profile: &'static str,
    api_key: String,
}

impl OpenRouteService {
    /// Bind an API key to a profile, or `None` if ORS lacks it.
    pub fn new(profile: RoutingProfile, api_key: impl Into<String>) -> Option<Self> {
        Some(Self {
            profile: profile_name(profile)?,
            api_key: api_key.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Coded { code: u64, message: Option<String> },
    Text(String),
}

impl DirectionsApi for OpenRouteService {
    fn provider(&self) -> Provider {
        Provider::OpenRouteService
    }

    fn profile(&self) -> &str {
        self.profile
    }

    fn request_url(
        &self,
        base_url: &Url,
        source: Coord<f64>,
        target: Coord<f64>,
        params: &ExtraParams,
    ) -> Url {
        let mut url = join_path(base_url, &["directions"]);
        url.query_pairs_mut()
            .append_pair(
                "coordinates",
                &format!("{}|{}", lng_lat(source), lng_lat(target)),
            )
            .append_pair("profile", self.profile)
            .append_pair("api_key", &self.api_key);
        append_params(&mut url, params);
        url
    }

    fn interpret(&self, status: u16, body: &str) -> Result<RouteResult, RoutingError> {
        if status != 200 {
            return interpret_failure(status, body);
        }
        let raw = parse_body(body)?;
        let response =
            DirectionsResponse::deserialize(&raw).map_err(|err| RoutingError::Parse {
                message: format!("unexpected ORS response ({err}): {}", excerpt(body)),
            })?;
        let Some(route) = response.routes.first() else {
            return Ok(RouteResult::NotFound);
        };
        let geometry = route
            .get("geometry")
            .cloned()
            .ok_or_else(|| RoutingError::Parse {
                message: "ORS route carries no geometry".to_owned(),
            })?;
        Ok(RouteResult::Found(FoundRoute::new(geometry, raw)))
    }
}

fn interpret_failure(status: u16, body: &str) -> Result<RouteResult, RoutingError> {
    let Ok(response) = serde_json::from_str::<ErrorResponse>(body) else {
        return Err(unexpected_response(status, body));
    };
    match response.error {
        ErrorDetail::Coded {
            code: ROUTE_NOT_FOUND | POINT_NOT_FOUND,
            message,
        } => {
            log::debug!(
                "ORS reports no route: {}",
                message.as_deref().unwrap_or("no message")
            );
            Ok(RouteResult::NotFound)
        }
        ErrorDetail::Coded { code, message } => Err(RoutingError::Provider {
            status,
            code: code.to_string(),
            message: message.unwrap_or_default(),
        }),
        ErrorDetail::Text(message) => Err(RoutingError::Provider {
            status,
            code: status_reason(status).to_owned(),
            message,
        }),
    }
}
