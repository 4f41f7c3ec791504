use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A location probed for accessibility.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Identity is
/// the `id`; two points with equal coordinates but different ids are distinct.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use rap_core::Point;
///
/// let point = Point::new(7, Coord { x: 11.55, y: 48.18 });
///
/// assert_eq!(point.id, 7);
/// assert_eq!(point.longitude(), 11.55);
/// assert_eq!(point.latitude(), 48.18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: i64,
    pub location: Coord<f64>,
}

impl Point {
    /// Identifier given to a landmark that does not come from the points file.
    pub const LANDMARK_ID: i64 = -1;

    /// Construct a `Point` from an id and a `(lng, lat)` coordinate.
    pub const fn new(id: i64, location: Coord<f64>) -> Self {
        Self { id, location }
    }

    /// Construct the landmark source point for a coordinate.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use rap_core::Point;
    ///
    /// let landmark = Point::landmark(Coord { x: 11.56, y: 48.14 });
    /// assert_eq!(landmark.id, Point::LANDMARK_ID);
    /// ```
    pub const fn landmark(location: Coord<f64>) -> Self {
        Self::new(Self::LANDMARK_ID, location)
    }

    /// Longitude in degrees.
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }

    /// Latitude in degrees.
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }
}

/// Errors returned by [`validate_coordinate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Longitude outside `[-180, 180]` or not finite.
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
    /// Latitude outside `[-90, 90]` or not finite.
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
}

/// Check that `coord` is a valid WGS84 `(lng, lat)` pair.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use rap_core::{CoordinateError, validate_coordinate};
///
/// assert!(validate_coordinate(Coord { x: 11.5, y: 48.1 }).is_ok());
/// assert_eq!(
///     validate_coordinate(Coord { x: 48.1, y: 181.0 }),
///     Err(CoordinateError::Latitude(181.0)),
/// );
/// ```
pub fn validate_coordinate(coord: Coord<f64>) -> Result<(), CoordinateError> {
    if !(-180.0..=180.0).contains(&coord.x) {
        return Err(CoordinateError::Longitude(coord.x));
    }
    if !(-90.0..=90.0).contains(&coord.y) {
        return Err(CoordinateError::Latitude(coord.y));
    }
    Ok(())
}
