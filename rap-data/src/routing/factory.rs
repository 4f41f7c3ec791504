//! Provider registry: turns a provider name into a ready routing client.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rap_core::{RoutingProfile, RoutingService};
use thiserror::Error;
use url::Url;

use super::client::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, DirectionsApi, HttpClientConfig, HttpRoutingClient,
};
use super::config::RoutersConfig;
use super::google::{self, GoogleMaps};
use super::graphhopper::{self, GraphHopper};
use super::mapbox::{self, Mapbox};
use super::ors::{self, OpenRouteService};

/// Errors raised while constructing a routing client.
#[derive(Debug, Error)]
pub enum BuildClientError {
    /// The provider name is not recognised.
    #[error("unknown routing provider '{0}' (expected one of: mapbox, google, ors, graphhopper)")]
    UnknownProvider(String),
    /// The provider does not offer the requested profile.
    #[error("{provider} does not support the '{profile}' profile")]
    UnsupportedProfile {
        provider: Provider,
        profile: RoutingProfile,
    },
    /// The router configuration holds no usable key for the provider.
    #[error("no API key configured for {provider}")]
    MissingCredentials { provider: Provider },
    /// The configured endpoint is not a usable base URL.
    #[error("invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Supported routing providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Mapbox,
    Google,
    OpenRouteService,
    GraphHopper,
}

impl Provider {
    /// Every provider.
    pub const ALL: [Self; 4] = [
        Self::Mapbox,
        Self::Google,
        Self::OpenRouteService,
        Self::GraphHopper,
    ];

    /// Canonical lower-case name, also used for output file names.
    pub const fn name(self) -> &'static str {
        self.names()[0]
    }

    /// Every accepted spelling, canonical name first.
    pub const fn names(self) -> &'static [&'static str] {
        match self {
            Self::Mapbox => &["mapbox"],
            Self::Google => &["google"],
            Self::OpenRouteService => &["ors", "openrouteservice"],
            Self::GraphHopper => &["graphhopper"],
        }
    }

    /// Public endpoint used when the config gives no override.
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Mapbox => mapbox::DEFAULT_BASE_URL,
            Self::Google => google::DEFAULT_BASE_URL,
            Self::OpenRouteService => ors::DEFAULT_BASE_URL,
            Self::GraphHopper => graphhopper::DEFAULT_BASE_URL,
        }
    }

    /// Provider spelling of `profile`, or `None` if unsupported.
    ///
    /// # Examples
    /// ```
    /// use rap_core::RoutingProfile;
    /// use rap_data::routing::Provider;
    ///
    /// assert_eq!(Provider::Google.profile_name(RoutingProfile::Cycling), Some("bicycling"));
    /// assert_eq!(Provider::Mapbox.profile_name(RoutingProfile::DrivingHgv), None);
    /// ```
    pub const fn profile_name(self, profile: RoutingProfile) -> Option<&'static str> {
        match self {
            Self::Mapbox => mapbox::profile_name(profile),
            Self::Google => google::profile_name(profile),
            Self::OpenRouteService => ors::profile_name(profile),
            Self::GraphHopper => graphhopper::profile_name(profile),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = BuildClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|provider| provider.names().contains(&wanted.as_str()))
            .ok_or_else(|| BuildClientError::UnknownProvider(s.to_owned()))
    }
}

/// Transport options applied to every client the factory builds.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Build a client for `provider_name` bound to `profile`, with default
/// transport options.
///
/// # Errors
///
/// See [`create_client_with`].
///
/// # Examples
/// ```
/// use rap_core::RoutingProfile;
/// use rap_data::routing::{BuildClientError, RouterConfig, RoutersConfig, create_client};
/// use rap_data::routing::Provider;
///
/// let config = RoutersConfig::new().with(Provider::Mapbox, RouterConfig::new("pk.test"));
///
/// assert!(create_client("Mapbox", RoutingProfile::Walking, &config).is_ok());
/// assert!(matches!(
///     create_client("mapbox", RoutingProfile::CyclingTour, &config),
///     Err(BuildClientError::UnsupportedProfile { .. })
/// ));
/// assert!(matches!(
///     create_client("osrm", RoutingProfile::Walking, &config),
///     Err(BuildClientError::UnknownProvider(_))
/// ));
/// ```
pub fn create_client(
    provider_name: &str,
    profile: RoutingProfile,
    config: &RoutersConfig,
) -> Result<Box<dyn RoutingService>, BuildClientError> {
    create_client_with(provider_name, profile, config, &ClientOptions::default())
}

/// Build a client for `provider_name` bound to `profile`.
///
/// # Errors
///
/// - [`BuildClientError::UnknownProvider`] for an unrecognised name.
/// - [`BuildClientError::MissingCredentials`] when the config has no entry
///   or an empty key for the provider.
/// - [`BuildClientError::UnsupportedProfile`] when the provider lacks the
///   profile.
/// - [`BuildClientError::InvalidBaseUrl`], [`BuildClientError::HttpClient`]
///   or [`BuildClientError::Runtime`] when the transport cannot be built.
pub fn create_client_with(
    provider_name: &str,
    profile: RoutingProfile,
    config: &RoutersConfig,
    options: &ClientOptions,
) -> Result<Box<dyn RoutingService>, BuildClientError> {
    let provider: Provider = provider_name.parse()?;
    let entry = config
        .get(provider)
        .filter(|entry| !entry.key.trim().is_empty())
        .ok_or(BuildClientError::MissingCredentials { provider })?;
    let unsupported = || BuildClientError::UnsupportedProfile { provider, profile };

    let base_url = entry
        .base_url
        .as_deref()
        .unwrap_or_else(|| provider.default_base_url());
    let base_url = Url::parse(base_url).map_err(|err| BuildClientError::InvalidBaseUrl {
        url: base_url.to_owned(),
        message: err.to_string(),
    })?;
    let http = HttpClientConfig::new(base_url)
        .with_timeout(options.timeout)
        .with_user_agent(options.user_agent.clone())
        .with_rate_limit(entry.rate_limit());

    let key = entry.key.trim();
    match provider {
        Provider::Mapbox => boxed(Mapbox::new(profile, key).ok_or_else(unsupported)?, http),
        Provider::Google => boxed(GoogleMaps::new(profile, key).ok_or_else(unsupported)?, http),
        Provider::OpenRouteService => boxed(
            OpenRouteService::new(profile, key).ok_or_else(unsupported)?,
            http,
        ),
        Provider::GraphHopper => {
            boxed(GraphHopper::new(profile, key).ok_or_else(unsupported)?, http)
        }
    }
}

fn boxed<A>(api: A, config: HttpClientConfig) -> Result<Box<dyn RoutingService>, BuildClientError>
where
    A: DirectionsApi + 'static,
{
    log::info!(
        "routing with {} using profile '{}'",
        api.provider(),
        api.profile()
    );
    Ok(Box::new(HttpRoutingClient::new(api, config)?))
}
