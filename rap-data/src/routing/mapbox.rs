//! Mapbox Directions API v5.
//!
//! See: <https://docs.mapbox.com/api/navigation/directions/>

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

/// Public Mapbox endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

/// Mapbox spelling of a canonical profile.
///
/// Mapbox only knows the three base modes.
pub const fn profile_name(profile: RoutingProfile) -> Option<&'static str> {
    match profile {
        RoutingProfile::Driving => Some("driving"),
        RoutingProfile::Walking => Some("walking"),
        RoutingProfile::Cycling => Some("cycling"),
        _ => None,
    }
}

/// Adapter for the Mapbox Directions API.
#[derive(Debug, Clone)]
pub struct Mapbox {
    profile: &'static str,
    access_token: String,
}

impl Mapbox {
    /// Bind an access token to a profile, or `None` if Mapbox lacks it.
    pub fn new(profile: RoutingProfile, access_token: impl Into<String>) -> Option<Self> {
        Some(Self {
            profile: profile_name(profile)?,
            access_token: access_token.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Value>,
}

impl DirectionsApi for Mapbox {
    fn provider(&self) -> Provider {
        Provider::Mapbox
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
        let coordinates = format!("{};{}", lng_lat(source), lng_lat(target));
        let mut url = join_path(
            base_url,
            &["directions", "v5", "mapbox", self.profile, &coordinates],
        );
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token);
        append_params(&mut url, params);
        url
    }

    fn interpret(&self, status: u16, body: &str) -> Result<RouteResult, RoutingError> {
        let Ok(raw) = parse_body(body) else {
            return Err(if status == 200 {
                RoutingError::Parse {
                    message: format!("Mapbox body is not JSON: {}", excerpt(body)),
                }
            } else {
                unexpected_response(status, body)
            });
        };
        let Ok(response) = DirectionsResponse::deserialize(&raw) else {
            return Err(unexpected_response(status, body));
        };
        match (status, response.code.as_deref()) {
            (200, Some("Ok")) => {
                let geometry = response
                    .routes
                    .first()
                    .and_then(|route| route.get("geometry"))
                    .cloned()
                    .ok_or_else(|| RoutingError::Parse {
                        message: "Mapbox answered Ok without a route geometry".to_owned(),
                    })?;
                Ok(RouteResult::Found(FoundRoute::new(geometry, raw)))
            }
            (200, _) | (_, Some("NoRoute" | "NoSegment")) => Ok(RouteResult::NotFound),
            (_, code) => Err(RoutingError::Provider {
                status,
                code: code.unwrap_or_else(|| status_reason(status)).to_owned(),
                message: response.message.unwrap_or_else(|| excerpt(body)),
            }),
        }
    }
}
