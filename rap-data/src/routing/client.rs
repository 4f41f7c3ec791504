//! Generic HTTP client shared by every provider adapter.
//!
//! [`HttpRoutingClient`] owns the transport concerns: coordinate checks,
//! throttling, the `reqwest` client, timeouts and error conversion. A
//! [`DirectionsApi`] adapter contributes only the request URL and the
//! interpretation of the provider's response.
//!
//! [`RoutingService`] is synchronous, so the client blocks on its async HTTP
//! call using a Tokio runtime it owns.

use std::fmt;
use std::time::Duration;

use geo::Coord;
use rap_core::service::check_endpoints;
use rap_core::{ExtraParams, RateLimit, RouteResult, RoutingError, RoutingService, Throttle};
use reqwest::Client;
use serde_json::Value;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::factory::{BuildClientError, Provider};

/// Default user agent for provider requests.
pub const DEFAULT_USER_AGENT: &str = concat!("rap/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Query parameters that carry credentials and are masked in logs.
const CREDENTIAL_PARAMS: [&str; 3] = ["access_token", "key", "api_key"];

/// Longest response excerpt kept in error messages.
const MAX_EXCERPT_CHARS: usize = 200;

/// Provider-specific half of an HTTP routing client.
pub trait DirectionsApi: fmt::Debug {
    /// Provider this adapter talks to.
    fn provider(&self) -> Provider;

    /// Provider spelling of the bound profile.
    fn profile(&self) -> &str;

    /// Build the full request URL, credentials included.
    fn request_url(
        &self,
        base_url: &Url,
        source: Coord<f64>,
        target: Coord<f64>,
        params: &ExtraParams,
    ) -> Url;

    /// Turn an HTTP status and body into a route answer.
    fn interpret(&self, status: u16, body: &str) -> Result<RouteResult, RoutingError>;
}

/// Transport settings for [`HttpRoutingClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Provider endpoint root, e.g. `https://api.mapbox.com`.
    pub base_url: Url,
    /// Request and connect timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Minimum spacing between requests.
    pub rate_limit: RateLimit,
}

impl HttpClientConfig {
    /// Create a configuration for `base_url` with default transport settings.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            rate_limit: RateLimit::UNLIMITED,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request rate limit.
    #[must_use]
    pub const fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

/// [`RoutingService`] over HTTP for one provider and profile.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime, requests run on the client's own runtime.
/// Inside a multi-threaded runtime the caller's handle is used through
/// [`tokio::task::block_in_place`]. A `current_thread` runtime cannot be
/// blocked on, so calls made from one fail with [`RoutingError::Runtime`]
/// before any request is sent; call from a plain [`std::thread`] or a
/// multi-threaded runtime instead.
pub struct HttpRoutingClient<A> {
    api: A,
    config: HttpClientConfig,
    client: Client,
    runtime: Runtime,
    throttle: Throttle,
}

impl<A: fmt::Debug> fmt::Debug for HttpRoutingClient<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRoutingClient")
            .field("api", &"<redacted>")
            .field("config", &self.config)
            .field("throttle", &self.throttle)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl<A: DirectionsApi> HttpRoutingClient<A> {
    /// Create a client throttled to `config.rate_limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path, or if the HTTP
    /// client or Tokio runtime fails to build.
    pub fn new(api: A, config: HttpClientConfig) -> Result<Self, BuildClientError> {
        if config.base_url.cannot_be_a_base() {
            return Err(BuildClientError::InvalidBaseUrl {
                url: config.base_url.to_string(),
                message: "URL cannot carry a path".to_owned(),
            });
        }
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(BuildClientError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(BuildClientError::Runtime)?;
        let throttle = Throttle::new(config.rate_limit);
        log::debug!(
            "created {} client for profile '{}' at {} ({:?} between requests)",
            api.provider(),
            api.profile(),
            config.base_url,
            throttle.interval()
        );
        Ok(Self {
            api,
            config,
            client,
            runtime,
            throttle,
        })
    }

    /// The provider adapter.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Transport settings in use.
    pub const fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Request URL for a query, credentials included.
    pub fn request_url(
        &self,
        source: Coord<f64>,
        target: Coord<f64>,
        params: &ExtraParams,
    ) -> Url {
        self.api
            .request_url(&self.config.base_url, source, target, params)
    }

    async fn fetch(&self, url: Url) -> Result<RouteResult, RoutingError> {
        self.throttle.acquire().await;
        let shown = redact(&url);
        log::debug!("GET {shown}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &shown))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &shown))?;
        log::debug!("{} answered HTTP {status}: {body}", self.api.provider());
        self.api.interpret(status, &body)
    }

    fn convert_reqwest_error(&self, error: reqwest::Error, url: &str) -> RoutingError {
        if error.is_timeout() {
            return RoutingError::Timeout {
                url: url.to_owned(),
                timeout: self.config.timeout,
            };
        }
        RoutingError::Transport {
            url: url.to_owned(),
            message: error.without_url().to_string(),
        }
    }
}

impl<A: DirectionsApi> RoutingService for HttpRoutingClient<A> {
    fn find_path(
        &self,
        source: Coord<f64>,
        target: Coord<f64>,
        params: &ExtraParams,
    ) -> Result<RouteResult, RoutingError> {
        check_endpoints(source, target)?;
        let url = self.request_url(source, target, params);
        let result = match Handle::try_current() {
            Err(_) => self.runtime.block_on(self.fetch(url)),
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(self.fetch(url)))
            }
            Ok(handle) => {
                return Err(RoutingError::Runtime {
                    message: format!(
                        "{} request issued from a {:?} Tokio runtime; \
                         call it from a plain thread or a multi-threaded runtime",
                        self.api.provider(),
                        handle.runtime_flavor()
                    ),
                });
            }
        };
        if let Err(RoutingError::Provider {
            status,
            code,
            message,
        }) = &result
        {
            log::error!(
                "{} rejected the request (HTTP {status}, {code}): {message}",
                self.api.provider()
            );
        }
        result
    }
}

/// Render `url` with credential parameters masked.
///
/// # Examples
/// ```
/// use rap_data::routing::redact;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/route?profile=car&key=secret")?;
/// assert_eq!(redact(&url), "https://example.com/route?profile=car&key=***");
/// # Ok::<(), url::ParseError>(())
/// ```
pub fn redact(url: &Url) -> String {
    if !url
        .query_pairs()
        .any(|(name, _)| CREDENTIAL_PARAMS.contains(&name.as_ref()))
    {
        return url.to_string();
    }
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if CREDENTIAL_PARAMS.contains(&name.as_ref()) {
                "***".to_owned()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

/// Append `segments` to the path of `base`.
pub(crate) fn join_path(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Append extra parameters after the provider's own query.
pub(crate) fn append_params(url: &mut Url, params: &ExtraParams) {
    if params.is_empty() {
        return;
    }
    let mut query = url.query_pairs_mut();
    for (name, value) in params.iter() {
        query.append_pair(name, value);
    }
}

/// Decode a JSON body, keeping the raw value alongside.
pub(crate) fn parse_body(body: &str) -> Result<Value, RoutingError> {
    serde_json::from_str(body).map_err(|err| RoutingError::Parse {
        message: err.to_string(),
    })
}

/// Provider error for a response the adapter has no specific reading of.
pub(crate) fn unexpected_response(status: u16, body: &str) -> RoutingError {
    RoutingError::Provider {
        status,
        code: status_reason(status).to_owned(),
        message: excerpt(body),
    }
}

/// Canonical reason phrase for an HTTP status.
pub(crate) fn status_reason(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unexpected status")
}

/// Shorten a body for inclusion in an error message.
pub(crate) fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_EXCERPT_CHARS {
        return trimmed.to_owned();
    }
    let mut short: String = trimmed.chars().take(MAX_EXCERPT_CHARS).collect();
    short.push('…');
    short
}

/// Format a coordinate as `lng,lat`.
pub(crate) fn lng_lat(coord: Coord<f64>) -> String {
    format!("{},{}", coord.x, coord.y)
}

/// Format a coordinate as `lat,lng`.
pub(crate) fn lat_lng(coord: Coord<f64>) -> String {
    format!("{},{}", coord.y, coord.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://api.mapbox.com/directions?access_token=pk.abc", "https://api.mapbox.com/directions?access_token=***")]
    #[case("https://api.openrouteservice.org/directions?profile=foot-walking&api_key=k", "https://api.openrouteservice.org/directions?profile=foot-walking&api_key=***")]
    #[case("https://graphhopper.com/api/1/route?point=1%2C2", "https://graphhopper.com/api/1/route?point=1%2C2")]
    fn redact_masks_credentials(#[case] raw: &str, #[case] expected: &str) {
        let url = Url::parse(raw).expect("valid url");
        assert_eq!(redact(&url), expected);
    }

    #[rstest]
    #[case("https://api.example.com", "https://api.example.com/a/b")]
    #[case("https://api.example.com/", "https://api.example.com/a/b")]
    #[case("https://proxy.example.com/ors/", "https://proxy.example.com/ors/a/b")]
    fn join_path_appends_segments(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid url");
        assert_eq!(join_path(&base, &["a", "b"]).as_str(), expected);
    }

    #[rstest]
    fn extra_params_follow_provider_params() {
        let mut url = Url::parse("https://api.example.com/route?profile=car").expect("valid url");
        let params = ExtraParams::new().with("alternatives", "false");
        append_params(&mut url, &params);
        assert_eq!(url.query(), Some("profile=car&alternatives=false"));
    }

    #[rstest]
    fn unexpected_response_uses_reason_phrase() {
        let err = unexpected_response(404, "  <html>Not Found</html>\n");
        assert_eq!(
            err,
            RoutingError::Provider {
                status: 404,
                code: "Not Found".to_owned(),
                message: "<html>Not Found</html>".to_owned(),
            }
        );
    }

    #[rstest]
    fn excerpt_truncates_long_bodies() {
        let body = "x".repeat(MAX_EXCERPT_CHARS + 50);
        assert_eq!(excerpt(&body).chars().count(), MAX_EXCERPT_CHARS + 1);
    }

    #[rstest]
    fn coordinate_formatting() {
        let coord = Coord { x: 11.5, y: 48.1 };
        assert_eq!(lng_lat(coord), "11.5,48.1");
        assert_eq!(lat_lng(coord), "48.1,11.5");
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpClientConfig::new(Url::parse("https://example.com").expect("url"))
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("rap-tests/1.0")
            .with_rate_limit(RateLimit::per_second(2.0));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "rap-tests/1.0");
        assert_eq!(config.rate_limit, RateLimit::per_second(2.0));
    }
}
