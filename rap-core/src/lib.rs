//! Core domain types for probing point accessibility with routing services.
//!
//! The crate defines the [`RoutingService`] contract that provider adapters
//! implement, the canonical [`RoutingProfile`] vocabulary, the request
//! [`Throttle`], and the accessibility driver that turns pairwise route
//! queries into per-point counts. It performs no network or file I/O itself;
//! adapters live in `rap-data`.

pub mod accessibility;
pub mod params;
pub mod point;
pub mod profile;
pub mod route;
pub mod service;
pub mod sink;
pub mod throttle;

#[doc(hidden)]
pub mod test_support;

pub use accessibility::{
    Accessibility, AccessibilityRecord, compute_accessibility, compute_landmark_accessibility,
};
pub use params::{ExtraParams, ExtraParamsError};
pub use point::{CoordinateError, Point, validate_coordinate};
pub use profile::{ParseProfileError, RoutingProfile};
pub use route::{FoundRoute, RouteResult};
pub use service::{RoutingError, RoutingService};
pub use sink::{RouteSink, RouteSinkError};
pub use throttle::{RateLimit, Throttle};
