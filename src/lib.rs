//! Facade crate for probing point accessibility with routing services.
//!
//! This crate re-exports the core domain types and, behind the `http`
//! feature, the provider adapters and file I/O.

#![forbid(unsafe_code)]

pub use rap_core::{
    Accessibility, AccessibilityRecord, ExtraParams, FoundRoute, Point, RateLimit, RouteResult,
    RouteSink, RoutingError, RoutingProfile, RoutingService, Throttle, compute_accessibility,
    compute_landmark_accessibility,
};

#[cfg(feature = "http")]
pub use rap_data::{
    BuildClientError, ClientOptions, Provider, RouterConfig, RoutersConfig, create_client,
    create_client_with, io,
};
