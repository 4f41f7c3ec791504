//! GraphHopper Routing API v1.
//!
//! GraphHopper answers unroutable queries with HTTP 400 and names the cause
//! in `hints[].details`. Connection-not-found and point-not-found causes are
//! treated as "no route".
//!
//! See: <https://docs.graphhopper.com/#operation/getRoute>

use geo::Coord;
use rap_core::{ExtraParams, FoundRoute, RouteResult, RoutingError, RoutingProfile};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::client::{
    DirectionsApi, append_params, excerpt, join_path, lat_lng, parse_body, status_reason,
    unexpected_response,
};
use super::factory::Provider;

/// Public GraphHopper endpoint.
pub const DEFAULT_BASE_URL: &str = "https://graphhopper.com";

const NO_ROUTE_CAUSES: [&str; 2] = ["ConnectionNotFoundException", "PointNotFoundException"];

/// GraphHopper profile for a canonical profile.
pub const fn profile_name(profile: RoutingProfile) -> Option<&'static str> {
    match profile {
        RoutingProfile::Driving | RoutingProfile::DrivingCar => Some("car"),
        RoutingProfile::DrivingHgv => Some("truck"),
        RoutingProfile::Walking | RoutingProfile::WalkingNormal => Some("foot"),
        RoutingProfile::WalkingHiking => Some("hike"),
        RoutingProfile::Cycling | RoutingProfile::CyclingNormal => Some("bike"),
        RoutingProfile::CyclingRoad => Some("racingbike"),
        RoutingProfile::CyclingMountain => Some("mtb"),
        RoutingProfile::CyclingSafe | RoutingProfile::CyclingTour | RoutingProfile::CyclingEbike => {
            None
        }
    }
}

/// Adapter for the GraphHopper Routing API.
#[derive(Debug, Clone)]
pub struct GraphHopper {
    profile: &'static str,
    key: String,
}

impl GraphHopper {
    /// Bind an API key to a profile, or `None` if GraphHopper lacks it.
    pub fn new(profile: RoutingProfile, key: impl Into<String>) -> Option<Self> {
        Some(Self {
            profile: profile_name(profile)?,
            key: key.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    paths: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    #[serde(default)]
    hints: Vec<Hint>,
}

#[derive(Debug, Deserialize)]
struct Hint {
    details: Option<String>,
}

impl ErrorResponse {
    fn is_no_route(&self) -> bool {
        self.hints.iter().filter_map(|hint| hint.details.as_deref()).any(|details| {
            NO_ROUTE_CAUSES
                .iter()
                .any(|cause| details.ends_with(cause))
        })
    }
}

impl DirectionsApi for GraphHopper {
    fn provider(&self) -> Provider {
        Provider::GraphHopper
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
        let mut url = join_path(base_url, &["api", "1", "route"]);
        url.query_pairs_mut()
            .append_pair("point", &lat_lng(source))
            .append_pair("point", &lat_lng(target))
            .append_pair("profile", self.profile)
            .append_pair("key", &self.key);
        append_params(&mut url, params);
        url
    }

    fn interpret(&self, status: u16, body: &str) -> Result<RouteResult, RoutingError> {
        if status != 200 {
            let Ok(error) = serde_json::from_str::<ErrorResponse>(body) else {
                return Err(unexpected_response(status, body));
            };
            if error.is_no_route() {
                log::debug!(
                    "GraphHopper reports no route: {}",
                    error.message.as_deref().unwrap_or("no message")
                );
                return Ok(RouteResult::NotFound);
            }
            return Err(RoutingError::Provider {
                status,
                code: status_reason(status).to_owned(),
                message: error.message.unwrap_or_else(|| excerpt(body)),
            });
        }
        let raw = parse_body(body)?;
        let response = RouteResponse::deserialize(&raw).map_err(|err| RoutingError::Parse {
            message: format!("unexpected GraphHopper response ({err}): {}", excerpt(body)),
        })?;
        let Some(path) = response.paths.first() else {
            return Ok(RouteResult::NotFound);
        };
        let geometry = path
            .get("points")
            .cloned()
            .ok_or_else(|| RoutingError::Parse {
                message: "GraphHopper path carries no points".to_owned(),
            })?;
        Ok(RouteResult::Found(FoundRoute::new(geometry, raw)))
    }
}
