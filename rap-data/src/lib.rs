//! Provider adapters and file I/O for accessibility probing.
//!
//! Responsibilities:
//! - Talk to routing providers over HTTP ([`routing`]).
//! - Load points, landmarks and extra parameters, and write results ([`io`]).
//!
//! Boundaries:
//! - Domain rules (profiles, accessibility counting, throttling policy) live
//!   in `rap-core`.
//! - No global mutable state; configuration is passed to constructors.

pub mod io;
pub mod routing;

pub use routing::{
    BuildClientError, ClientOptions, Provider, RouterConfig, RouterConfigError, RoutersConfig,
    create_client, create_client_with,
};
