//! Google Maps Directions API.
//!
//! Google reports the outcome in a `status` string that accompanies an HTTP
//! 200 for most failures, so the body decides the result.
//!
//! See: <https://developers.google.com/maps/documentation/directions/get-directions>

use geo::Coord;
use rap_core::{ExtraParams, FoundRoute, RouteResult, RoutingError, RoutingProfile};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::client::{
    DirectionsApi, append_params, excerpt, join_path, lat_lng, parse_body, unexpected_response,
};
use super::factory::Provider;

/// Public Google Maps endpoint.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Google travel mode for a canonical profile.
pub const fn profile_name(profile: RoutingProfile) -> Option<&'static str> {
    match profile {
        RoutingProfile::Driving => Some("driving"),
        RoutingProfile::Walking => Some("walking"),
        RoutingProfile::Cycling => Some("bicycling"),
        _ => None,
    }
}

/// Adapter for the Google Maps Directions API.
#[derive(Debug, Clone)]
pub struct GoogleMaps {
    mode: &'static str,
    key: String,
}

impl GoogleMaps {
    /// Bind an API key to a travel mode, or `None` if Google lacks it.
    pub fn new(profile: RoutingProfile, key: impl Into<String>) -> Option<Self> {
        Some(Self {
            mode: profile_name(profile)?,
            key: key.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<Value>,
}

impl DirectionsApi for GoogleMaps {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn profile(&self) -> &str {
        self.mode
    }

    fn request_url(
        &self,
        base_url: &Url,
        source: Coord<f64>,
        target: Coord<f64>,
        params: &ExtraParams,
    ) -> Url {
        let mut url = join_path(base_url, &["maps", "api", "directions", "json"]);
        url.query_pairs_mut()
            .append_pair("origin", &lat_lng(source))
            .append_pair("destination", &lat_lng(target))
            .append_pair("mode", self.mode)
            .append_pair("key", &self.key);
        append_params(&mut url, params);
        url
    }

    fn interpret(&self, status: u16, body: &str) -> Result<RouteResult, RoutingError> {
        if status != 200 {
            return Err(unexpected_response(status, body));
        }
        let raw = parse_body(body)?;
        let response =
            DirectionsResponse::deserialize(&raw).map_err(|err| RoutingError::Parse {
                message: format!("unexpected Google response ({err}): {}", excerpt(body)),
            })?;
        match response.status.as_str() {
            "OK" => {
                let geometry = response
                    .routes
                    .first()
                    .and_then(|route| route.pointer("/overview_polyline/points"))
                    .cloned()
                    .ok_or_else(|| RoutingError::Parse {
                        message: "Google answered OK without an overview polyline".to_owned(),
                    })?;
                Ok(RouteResult::Found(FoundRoute::new(geometry, raw)))
            }
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(RouteResult::NotFound),
            code => Err(RoutingError::Provider {
                status,
                code: code.to_owned(),
                message: response.error_message.unwrap_or_default(),
            }),
        }
    }
}
