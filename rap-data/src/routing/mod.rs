//! HTTP routing clients for the supported directions providers.
//!
//! Each provider module contributes a [`DirectionsApi`] adapter: the request
//! URL for a coordinate pair and the reading of the provider's response.
//! [`HttpRoutingClient`] wraps an adapter with the shared transport
//! (throttling, timeouts, error conversion) and implements
//! [`rap_core::RoutingService`]. [`create_client`] picks the adapter by name
//! and wires in credentials from a [`RoutersConfig`].
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use geo::Coord;
//! use rap_core::{ExtraParams, RoutingProfile, RoutingService};
//! use rap_data::routing::{RoutersConfig, create_client};
//!
//! let config = RoutersConfig::load(Utf8Path::new("routerconf.json"))?;
//! let client = create_client("ors", RoutingProfile::CyclingRoad, &config)?;
//!
//! let result = client.find_path(
//!     Coord { x: 8.681495, y: 49.41461 },
//!     Coord { x: 8.687872, y: 49.420318 },
//!     &ExtraParams::new(),
//! )?;
//! println!("route found: {}", result.is_found());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod config;
mod factory;
pub mod google;
pub mod graphhopper;
pub mod mapbox;
pub mod ors;

pub use client::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, DirectionsApi, HttpClientConfig, HttpRoutingClient,
    redact,
};
pub use config::{DEFAULT_ROUTER_CONFIG, RouterConfig, RouterConfigError, RoutersConfig};
pub use factory::{
    BuildClientError, ClientOptions, Provider, create_client, create_client_with,
};
pub use google::GoogleMaps;
pub use graphhopper::GraphHopper;
pub use mapbox::Mapbox;
pub use ors::OpenRouteService;
