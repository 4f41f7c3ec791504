//! Deterministic test doubles for routing services and sinks.
//!
//! [`StubRoutingService`] answers from a script instead of the network and
//! records every query; [`RecordingSink`] keeps persisted routes in memory.

use std::sync::{Mutex, PoisonError};

use geo::Coord;
use serde_json::{Value, json};

use crate::{
    ExtraParams, FoundRoute, Point, RouteResult, RouteSink, RouteSinkError, RoutingError,
    RoutingService,
};

/// Scripted answer of a [`StubRoutingService`].
#[derive(Debug, Clone, PartialEq)]
pub enum StubOutcome {
    /// Return a straight-line route between the endpoints.
    Found,
    /// Return [`RouteResult::NotFound`].
    NotFound,
    /// Fail with the given error.
    Error(RoutingError),
}

/// `RoutingService` answering from a script.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use rap_core::test_support::StubRoutingService;
/// use rap_core::{ExtraParams, RoutingService};
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 1.0, y: 1.0 };
/// let stub = StubRoutingService::always_found().without_route(b, a);
///
/// assert!(stub.find_path(a, b, &ExtraParams::new())?.is_found());
/// assert!(!stub.find_path(b, a, &ExtraParams::new())?.is_found());
/// assert_eq!(stub.call_count(), 2);
/// # Ok::<(), rap_core::RoutingError>(())
/// ```
#[derive(Debug)]
pub struct StubRoutingService {
    default: StubOutcome,
    overrides: Vec<(Coord<f64>, Coord<f64>, StubOutcome)>,
    calls: Mutex<Vec<(Coord<f64>, Coord<f64>, ExtraParams)>>,
}

impl StubRoutingService {
    /// Create a stub answering every query with `outcome`.
    pub const fn with_default(outcome: StubOutcome) -> Self {
        Self {
            default: outcome,
            overrides: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a stub that finds a route for every pair.
    pub const fn always_found() -> Self {
        Self::with_default(StubOutcome::Found)
    }

    /// Create a stub that never finds a route.
    pub const fn never_found() -> Self {
        Self::with_default(StubOutcome::NotFound)
    }

    /// Create a stub failing every query with `error`.
    pub const fn failing(error: RoutingError) -> Self {
        Self::with_default(StubOutcome::Error(error))
    }

    /// Override the answer for the directed pair `source -> target`.
    #[must_use]
    pub fn with_outcome(
        mut self,
        source: Coord<f64>,
        target: Coord<f64>,
        outcome: StubOutcome,
    ) -> Self {
        self.overrides.push((source, target, outcome));
        self
    }

    /// Report no route for the directed pair `source -> target`.
    #[must_use]
    pub fn without_route(self, source: Coord<f64>, target: Coord<f64>) -> Self {
        self.with_outcome(source, target, StubOutcome::NotFound)
    }

    /// Number of `find_path` calls received so far.
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Every `(source, target)` pair queried, in order.
    pub fn calls(&self) -> Vec<(Coord<f64>, Coord<f64>)> {
        self.lock_calls()
            .iter()
            .map(|(source, target, _)| (*source, *target))
            .collect()
    }

    /// Extra parameters received by the most recent call.
    pub fn last_params(&self) -> Option<ExtraParams> {
        self.lock_calls().last().map(|(_, _, params)| params.clone())
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<(Coord<f64>, Coord<f64>, ExtraParams)>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn outcome_for(&self, source: Coord<f64>, target: Coord<f64>) -> &StubOutcome {
        self.overrides
            .iter()
            .find(|(s, t, _)| *s == source && *t == target)
            .map_or(&self.default, |(_, _, outcome)| outcome)
    }
}

/// Geometry returned by [`StubRoutingService`] for a found route.
pub fn straight_line(source: Coord<f64>, target: Coord<f64>) -> Value {
    json!({
        "type": "LineString",
        "coordinates": [[source.x, source.y], [target.x, target.y]],
    })
}

impl RoutingService for StubRoutingService {
    fn find_path(
        &self,
        source: Coord<f64>,
        target: Coord<f64>,
        params: &ExtraParams,
    ) -> Result<RouteResult, RoutingError> {
        self.lock_calls().push((source, target, params.clone()));
        match self.outcome_for(source, target) {
            StubOutcome::Found => {
                let geometry = straight_line(source, target);
                let raw = json!({ "code": "Ok", "routes": [{ "geometry": geometry.clone() }] });
                Ok(RouteResult::Found(FoundRoute::new(geometry, raw)))
            }
            StubOutcome::NotFound => Ok(RouteResult::NotFound),
            StubOutcome::Error(error) => Err(error.clone()),
        }
    }
}

/// In-memory [`RouteSink`] keyed by `(source_id, target_id)`.
#[derive(Debug, Default)]
pub struct RecordingSink {
    routes: Vec<(i64, i64, Value)>,
    fail_writes: bool,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink whose every write fails.
    pub fn failing() -> Self {
        Self {
            routes: Vec::new(),
            fail_writes: true,
        }
    }

    /// Stored `(source_id, target_id, geometry)` triples in insertion order.
    pub fn routes(&self) -> &[(i64, i64, Value)] {
        &self.routes
    }

    /// Geometry stored for a pair, if any.
    pub fn geometry(&self, source_id: i64, target_id: i64) -> Option<&Value> {
        self.routes
            .iter()
            .find(|(s, t, _)| *s == source_id && *t == target_id)
            .map(|(_, _, geometry)| geometry)
    }
}

impl RouteSink for RecordingSink {
    fn persist(
        &mut self,
        source: &Point,
        target: &Point,
        route: &FoundRoute,
    ) -> Result<(), RouteSinkError> {
        if self.fail_writes {
            return Err(RouteSinkError::Write {
                source_id: source.id,
                target_id: target.id,
                location: "memory".to_owned(),
                source: std::io::Error::other("sink configured to fail"),
            });
        }
        self.routes
            .retain(|(s, t, _)| !(*s == source.id && *t == target.id));
        self.routes
            .push((source.id, target.id, route.geometry.clone()));
        Ok(())
    }
}
