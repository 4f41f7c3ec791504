//! Accessibility computation over a set of points.
//!
//! The accessibility of a target is the number of sources from which the
//! routing service finds a path to it. In all-pairs mode every other input
//! point is a source, which costs `n·(n−1)` queries for `n` points; in
//! landmark mode a single fixed landmark is the only source and each point
//! scores 0 or 1.
//!
//! Results are produced lazily, one [`AccessibilityRecord`] per target in
//! input order. Nothing is cached: iterating again re-issues every query.
//! Per-query failures are logged and count as "no route", so a run always
//! yields a record for every point.

use serde::{Deserialize, Serialize};

use crate::{ExtraParams, Point, RouteResult, RouteSink, RoutingService};

static NO_PARAMS: ExtraParams = ExtraParams::new();

/// Accessibility of a single target point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityRecord {
    #[serde(rename = "id")]
    pub point_id: i64,
    pub x: f64,
    pub y: f64,
    pub accessibility: u32,
}

impl AccessibilityRecord {
    /// Build a record for `point` with the given count.
    pub const fn new(point: &Point, accessibility: u32) -> Self {
        Self {
            point_id: point.id,
            x: point.location.x,
            y: point.location.y,
            accessibility,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Sources {
    AllOthers,
    Landmark(Point),
}

/// Lazy accessibility computation, created by [`compute_accessibility`] or
/// [`compute_landmark_accessibility`].
pub struct Accessibility<'a, S: ?Sized> {
    service: &'a S,
    points: &'a [Point],
    sources: Sources,
    params: &'a ExtraParams,
    sink: Option<&'a mut dyn RouteSink>,
    next: usize,
}

/// Count, for every point, how many other points can reach it.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use rap_core::test_support::StubRoutingService;
/// use rap_core::{Point, compute_accessibility};
///
/// let points = [
///     Point::new(1, Coord { x: 0.0, y: 0.0 }),
///     Point::new(2, Coord { x: 1.0, y: 1.0 }),
///     Point::new(3, Coord { x: 2.0, y: 2.0 }),
/// ];
/// let service = StubRoutingService::always_found()
///     .without_route(points[1].location, points[2].location);
///
/// let counts: Vec<u32> = compute_accessibility(&service, &points)
///     .map(|record| record.accessibility)
///     .collect();
///
/// assert_eq!(counts, [2, 2, 1]);
/// assert_eq!(service.call_count(), 6);
/// ```
pub fn compute_accessibility<'a, S>(service: &'a S, points: &'a [Point]) -> Accessibility<'a, S>
where
    S: RoutingService + ?Sized,
{
    Accessibility::new(service, points, Sources::AllOthers)
}

/// Check, for every point, whether `landmark` can reach it.
///
/// Each record's accessibility is `1` when a route from the landmark was
/// found and `0` otherwise.
pub fn compute_landmark_accessibility<'a, S>(
    service: &'a S,
    landmark: Point,
    points: &'a [Point],
) -> Accessibility<'a, S>
where
    S: RoutingService + ?Sized,
{
    if points.iter().any(|point| point.id == landmark.id) {
        log::warn!(
            "point id {} is also the landmark id; its routes share file names with the landmark's",
            landmark.id
        );
    }
    Accessibility::new(service, points, Sources::Landmark(landmark))
}

impl<'a, S> Accessibility<'a, S>
where
    S: RoutingService + ?Sized,
{
    const fn new(service: &'a S, points: &'a [Point], sources: Sources) -> Self {
        Self {
            service,
            points,
            sources,
            params: &NO_PARAMS,
            sink: None,
            next: 0,
        }
    }

    /// Forward `params` with every query.
    #[must_use]
    pub const fn with_params(mut self, params: &'a ExtraParams) -> Self {
        self.params = params;
        self
    }

    /// Hand every found route to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: &'a mut dyn RouteSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Total number of `find_path` calls a full iteration issues.
    pub const fn total_queries(&self) -> usize {
        let n = self.points.len();
        match self.sources {
            Sources::AllOthers => n.saturating_mul(n.saturating_sub(1)),
            Sources::Landmark(_) => n,
        }
    }

    fn probe(&mut self, source: &Point, target: &Point) -> bool {
        log::debug!(
            "searching for a path from point {} to point {}",
            source.id,
            target.id
        );
        match self
            .service
            .find_path(source.location, target.location, self.params)
        {
            Ok(RouteResult::Found(route)) => {
                if let Some(sink) = self.sink.as_deref_mut()
                    && let Err(err) = sink.persist(source, target, &route)
                {
                    log::error!("{err}");
                }
                true
            }
            Ok(RouteResult::NotFound) => {
                log::debug!("no path from point {} to point {}", source.id, target.id);
                false
            }
            Err(err) => {
                log::warn!(
                    "query from point {} to point {} failed, counting as unreachable: {err}",
                    source.id,
                    target.id
                );
                false
            }
        }
    }

    fn count_sources(&mut self, index: usize, target: &Point) -> u32 {
        match self.sources {
            Sources::AllOthers => {
                let points = self.points;
                let mut count = 0;
                for (position, source) in points.iter().enumerate() {
                    if position != index && self.probe(source, target) {
                        count += 1;
                    }
                }
                count
            }
            Sources::Landmark(landmark) => u32::from(self.probe(&landmark, target)),
        }
    }
}

impl<S> Iterator for Accessibility<'_, S>
where
    S: RoutingService + ?Sized,
{
    type Item = AccessibilityRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next;
        let target = *self.points.get(index)?;
        self.next += 1;
        let accessibility = self.count_sources(index, &target);
        log::info!(
            "point {} ({}, {}): accessibility {accessibility}",
            target.id,
            target.location.x,
            target.location.y
        );
        Some(AccessibilityRecord::new(&target, accessibility))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.points.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<S> ExactSizeIterator for Accessibility<'_, S> where S: RoutingService + ?Sized {}
