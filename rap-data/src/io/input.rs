use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use csv::{ReaderBuilder, Trim};
use geo::Coord;
use geojson::GeoJson;
use rap_core::{ExtraParams, ExtraParamsError, Point};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading run inputs.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A points row could not be decoded.
    #[error("invalid points CSV {path}: {source}")]
    Csv {
        path: Utf8PathBuf,
        #[source]
        source: csv::Error,
    },
    /// The landmark is not a GeoJSON Point feature.
    #[error("invalid landmark {path}: {message}")]
    Landmark { path: Utf8PathBuf, message: String },
    /// The extra parameters file is not a flat JSON object.
    #[error("invalid extra parameters {path}: {message}")]
    Params { path: Utf8PathBuf, message: String },
}

#[derive(Debug, Deserialize)]
struct PointRow {
    id: i64,
    x: f64,
    y: f64,
}

/// Decode points from CSV text.
///
/// Columns are matched by header name; other columns are ignored.
///
/// # Examples
/// ```
/// use rap_data::io::read_points;
///
/// let points = read_points("name,y,x,id\nhbf,48.14,11.56,7\n".as_bytes())?;
/// assert_eq!(points[0].id, 7);
/// assert_eq!(points[0].location.x, 11.56);
/// # Ok::<(), csv::Error>(())
/// ```
pub fn read_points<R: Read>(reader: R) -> Result<Vec<Point>, csv::Error> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    csv_reader
        .deserialize::<PointRow>()
        .map(|row| row.map(|row| Point::new(row.id, Coord { x: row.x, y: row.y })))
        .collect()
}

/// Load the points to probe from a CSV file.
///
/// # Errors
///
/// Returns [`InputError::Read`] when the file cannot be opened and
/// [`InputError::Csv`] when a row lacks a column or holds a non-number.
pub fn load_points(path: &Utf8Path) -> Result<Vec<Point>, InputError> {
    let file = rap_fs::open_utf8_file(path).map_err(|source| InputError::Read {
        path: path.to_owned(),
        source,
    })?;
    let points = read_points(file).map_err(|source| InputError::Csv {
        path: path.to_owned(),
        source,
    })?;
    log::info!("loaded {} points from {path}", points.len());
    Ok(points)
}

/// Load a landmark from a GeoJSON Point feature.
///
/// The landmark gets id [`Point::LANDMARK_ID`].
///
/// # Errors
///
/// Returns [`InputError::Landmark`] when the file is not GeoJSON or the
/// geometry is missing or not a point.
pub fn load_landmark(path: &Utf8Path) -> Result<Point, InputError> {
    let text = read_text(path)?;
    let invalid = |message: String| InputError::Landmark {
        path: path.to_owned(),
        message,
    };
    let geojson: GeoJson = text.parse().map_err(|err| invalid(format!("{err}")))?;
    let geometry = match geojson {
        GeoJson::Feature(feature) => feature
            .geometry
            .ok_or_else(|| invalid("feature has no geometry".to_owned()))?,
        GeoJson::Geometry(geometry) => geometry,
        GeoJson::FeatureCollection(_) => {
            return Err(invalid("expected a Feature, found a FeatureCollection".to_owned()));
        }
    };
    let geojson::Value::Point(position) = geometry.value else {
        return Err(invalid("expected a Point geometry".to_owned()));
    };
    let [x, y, ..] = position[..] else {
        return Err(invalid("point needs a longitude and a latitude".to_owned()));
    };
    let landmark = Point::landmark(Coord { x, y });
    log::info!("loaded landmark ({x}, {y}) from {path}");
    Ok(landmark)
}

/// Load extra routing parameters from a JSON object.
///
/// # Errors
///
/// Returns [`InputError::Params`] when the file is not a flat JSON object of
/// strings, numbers and booleans.
pub fn load_extra_params(path: &Utf8Path) -> Result<ExtraParams, InputError> {
    let text = read_text(path)?;
    let invalid = |message: String| InputError::Params {
        path: path.to_owned(),
        message,
    };
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|err| invalid(err.to_string()))?;
    let params = ExtraParams::from_json(&value)
        .map_err(|err: ExtraParamsError| invalid(err.to_string()))?;
    log::debug!("loaded extra parameters {params:?} from {path}");
    Ok(params)
}

fn read_text(path: &Utf8Path) -> Result<String, InputError> {
    rap_fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn workdir() -> (TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        (dir, root)
    }

    fn write(root: &Utf8Path, name: &str, contents: &str) -> Utf8PathBuf {
        let path = root.join(name);
        rap_fs::write_file(&path, contents.as_bytes()).expect("write fixture");
        path
    }

    #[rstest]
    fn points_keep_file_order_and_ignore_extra_columns(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let path = write(
            &root,
            "points.csv",
            "x, y, id, district\n11.50, 48.10, 3, Altstadt\n11.52, 48.12, 1, Au\n",
        );

        let points = load_points(&path).expect("valid csv");

        assert_eq!(
            points,
            vec![
                Point::new(3, Coord { x: 11.50, y: 48.10 }),
                Point::new(1, Coord { x: 11.52, y: 48.12 }),
            ]
        );
    }

    #[rstest]
    #[case("x,y\n1.0,2.0\n")]
    #[case("x,y,id\n1.0,north,1\n")]
    fn malformed_points_are_rejected(#[case] text: &str) {
        assert!(read_points(text.as_bytes()).is_err());
    }

    #[rstest]
    fn header_only_file_yields_no_points() {
        assert!(read_points("id,x,y\n".as_bytes()).expect("valid").is_empty());
    }

    #[rstest]
    fn missing_points_file_is_a_read_error(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let err = load_points(&root.join("absent.csv")).expect_err("missing");
        assert!(matches!(err, InputError::Read { .. }));
    }

    #[rstest]
    fn landmark_feature_becomes_source_point(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let path = write(
            &root,
            "hbf.json",
            r#"{"type":"Feature","properties":{"name":"Hauptbahnhof"},
                "geometry":{"type":"Point","coordinates":[11.5583,48.1402]}}"#,
        );

        let landmark = load_landmark(&path).expect("valid landmark");

        assert_eq!(landmark, Point::landmark(Coord { x: 11.5583, y: 48.1402 }));
    }

    #[rstest]
    #[case(r#"{"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]}}"#)]
    #[case(r#"{"type":"Feature","properties":{},"geometry":null}"#)]
    #[case(r#"{"type":"FeatureCollection","features":[]}"#)]
    #[case("not json")]
    fn invalid_landmarks_are_rejected(workdir: (TempDir, Utf8PathBuf), #[case] text: &str) {
        let (_guard, root) = workdir;
        let path = write(&root, "landmark.json", text);
        let err = load_landmark(&path).expect_err("invalid");
        assert!(matches!(err, InputError::Landmark { .. }));
    }

    #[rstest]
    fn params_are_stringified(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let path = write(
            &root,
            "params.json",
            r#"{"alternatives": false, "radiuses": "50;50", "instructions": 0}"#,
        );

        let params = load_extra_params(&path).expect("valid params");

        assert_eq!(params.get("alternatives"), Some("false"));
        assert_eq!(params.get("radiuses"), Some("50;50"));
        assert_eq!(params.get("instructions"), Some("0"));
    }

    #[rstest]
    fn nested_params_are_rejected(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let path = write(&root, "params.json", r#"{"avoid": {"features": ["ferries"]}}"#);
        let err = load_extra_params(&path).expect_err("nested");
        assert!(matches!(err, InputError::Params { .. }));
    }
}
