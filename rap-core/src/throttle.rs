//! Client-side request spacing.
//!
//! Providers publish per-key quotas in requests per second. A [`Throttle`]
//! wraps a `governor` limiter with a burst of one, so consecutive dispatches
//! on one client are at least `1 / rate_limit` seconds apart; it offers no
//! cross-process guarantee.

use std::fmt;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock, ReasonablyRealtime};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

/// Configured request rate.
///
/// Non-positive or non-finite values mean "unlimited", matching the `-1`
/// convention of router configuration files.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use rap_core::RateLimit;
///
/// assert_eq!(RateLimit::per_second(4.0).interval(), Some(Duration::from_millis(250)));
/// assert_eq!(RateLimit::per_second(-1.0).interval(), None);
/// assert_eq!(RateLimit::UNLIMITED.interval(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimit(f64);

impl RateLimit {
    /// No throttling.
    pub const UNLIMITED: Self = Self(-1.0);

    /// Limit to `requests` per second.
    pub const fn per_second(requests: f64) -> Self {
        Self(requests)
    }

    /// Requests per second as configured.
    pub const fn requests_per_second(&self) -> f64 {
        self.0
    }

    /// Minimum spacing between requests, or `None` when unlimited.
    pub fn interval(&self) -> Option<Duration> {
        (self.0.is_finite() && self.0 > 0.0)
            .then(|| Duration::try_from_secs_f64(self.0.recip()).ok())
            .flatten()
    }

    /// Governor quota admitting one request per interval, or `None` when
    /// unlimited.
    pub fn quota(&self) -> Option<Quota> {
        self.interval().and_then(Quota::with_period)
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self::UNLIMITED
    }
}

/// Unkeyed in-memory limiter reading time from `C`.
pub type DirectLimiter<C = DefaultClock> =
    RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Enforces a minimum interval between consecutive requests.
///
/// The first request passes immediately; each later one waits for whatever
/// remains of the interval since the previous dispatch.
pub struct Throttle<C: Clock = DefaultClock> {
    interval: Option<Duration>,
    limiter: Option<DirectLimiter<C>>,
    clock: C,
}

impl<C: Clock> fmt::Debug for Throttle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttle")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl Throttle {
    /// Create a throttle on the monotonic system clock.
    pub fn new(limit: RateLimit) -> Self {
        Self::with_clock(limit, DefaultClock::default())
    }
}

impl<C: Clock + Clone> Throttle<C> {
    /// Create a throttle reading time from `clock`.
    pub fn with_clock(limit: RateLimit, clock: C) -> Self {
        let limiter = limit
            .quota()
            .map(|quota| RateLimiter::direct_with_clock(quota, clock.clone()));
        Self {
            interval: limit.interval(),
            limiter,
            clock,
        }
    }

    /// Minimum spacing enforced, if any.
    pub const fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Claim a dispatch slot without waiting.
    ///
    /// # Errors
    ///
    /// Returns how long until a slot frees up; nothing is claimed then.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };
        limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }
}

impl<C: ReasonablyRealtime + Clone> Throttle<C> {
    /// Wait until the next request may be dispatched and claim the slot.
    pub async fn acquire(&self) {
        let Some(limiter) = &self.limiter else {
            return;
        };
        if let Err(wait) = self.try_acquire() {
            log::debug!("throttling request for {wait:?}");
            limiter.until_ready().await;
        }
    }
}
