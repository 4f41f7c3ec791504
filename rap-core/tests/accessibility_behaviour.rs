//! Behavioural tests for the accessibility driver.

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

use rap_core::test_support::StubRoutingService;
use rap_core::{
    Point, RoutingError, compute_accessibility, compute_landmark_accessibility,
};

const LANDMARK: Coord<f64> = Coord { x: 11.56, y: 48.14 };

#[derive(Default)]
struct Run {
    points: Vec<Point>,
    service: Option<StubRoutingService>,
    counts: Vec<u32>,
}

impl Run {
    fn service(&self) -> &StubRoutingService {
        self.service.as_ref().expect("service configured")
    }
}

#[fixture]
fn run() -> RefCell<Run> {
    RefCell::new(Run::default())
}

#[given("three points A, B and C")]
fn three_points(#[from(run)] run: &RefCell<Run>) {
    run.borrow_mut().points = vec![
        Point::new(1, Coord { x: 11.50, y: 48.10 }),
        Point::new(2, Coord { x: 11.52, y: 48.12 }),
        Point::new(3, Coord { x: 11.54, y: 48.16 }),
    ];
}

#[given("a routing service finding every route except from B to C")]
fn missing_b_to_c(#[from(run)] run: &RefCell<Run>) {
    let mut run = run.borrow_mut();
    let (b, c) = (run.points[1].location, run.points[2].location);
    run.service = Some(StubRoutingService::always_found().without_route(b, c));
}

#[given("a routing service failing with HTTP 404")]
fn failing_404(#[from(run)] run: &RefCell<Run>) {
    run.borrow_mut().service = Some(StubRoutingService::failing(RoutingError::Provider {
        status: 404,
        code: "NotFound".to_owned(),
        message: "Not Found".to_owned(),
    }));
}

#[given("a routing service finding every route except from the landmark to A")]
fn missing_landmark_to_a(#[from(run)] run: &RefCell<Run>) {
    let mut run = run.borrow_mut();
    let a = run.points[0].location;
    run.service = Some(StubRoutingService::always_found().without_route(LANDMARK, a));
}

#[when("I compute accessibility")]
fn compute(#[from(run)] run: &RefCell<Run>) {
    let mut run = run.borrow_mut();
    let counts: Vec<u32> = compute_accessibility(run.service(), &run.points)
        .map(|record| record.accessibility)
        .collect();
    run.counts = counts;
}

#[when("I compute accessibility from the landmark")]
fn compute_from_landmark(#[from(run)] run: &RefCell<Run>) {
    let mut run = run.borrow_mut();
    let landmark = Point::landmark(LANDMARK);
    let counts: Vec<u32> = compute_landmark_accessibility(run.service(), landmark, &run.points)
        .map(|record| record.accessibility)
        .collect();
    run.counts = counts;
}

#[then("the accessibilities are 2, 2 and 1")]
fn two_two_one(#[from(run)] run: &RefCell<Run>) {
    assert_eq!(run.borrow().counts, vec![2, 2, 1]);
}

#[then("the accessibilities are 0, 0 and 0")]
fn all_zero(#[from(run)] run: &RefCell<Run>) {
    assert_eq!(run.borrow().counts, vec![0, 0, 0]);
}

#[then("the accessibilities are 0, 1 and 1")]
fn zero_one_one(#[from(run)] run: &RefCell<Run>) {
    assert_eq!(run.borrow().counts, vec![0, 1, 1]);
}

#[then("six queries were issued")]
fn six_queries(#[from(run)] run: &RefCell<Run>) {
    assert_eq!(run.borrow().service().call_count(), 6);
}

#[then("three queries were issued")]
fn three_queries(#[from(run)] run: &RefCell<Run>) {
    assert_eq!(run.borrow().service().call_count(), 3);
}

#[scenario(path = "tests/features/accessibility.feature", index = 0)]
fn one_pair_unreachable(run: RefCell<Run>) {
    let _ = run;
}

#[scenario(path = "tests/features/accessibility.feature", index = 1)]
fn provider_404_counts_as_unreachable(run: RefCell<Run>) {
    let _ = run;
}

#[scenario(path = "tests/features/accessibility.feature", index = 2)]
fn landmark_reachability(run: RefCell<Run>) {
    let _ = run;
}
