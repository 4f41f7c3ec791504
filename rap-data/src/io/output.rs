use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use csv::WriterBuilder;
use rap_core::{AccessibilityRecord, FoundRoute, Point, RouteSink, RouteSinkError};
use thiserror::Error;

const CSV_HEADER: [&str; 4] = ["id", "x", "y", "accessibility"];

/// Errors raised while writing run results.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The output file could not be created or flushed.
    #[error("failed to write {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A record could not be encoded.
    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: Utf8PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Location of the accessibility table: `<output_dir>/<provider>.csv`.
pub fn accessibility_csv_path(output_dir: &Utf8Path, provider: &str) -> Utf8PathBuf {
    output_dir.join(format!("{provider}.csv"))
}

/// Directory for route files:
/// `<output_dir>/<provider>/<profile>[/<YYYY-MM-DD>]`.
///
/// # Examples
/// ```
/// use camino::Utf8Path;
/// use chrono::NaiveDate;
/// use rap_data::io::route_dir;
///
/// let day = NaiveDate::from_ymd_opt(2024, 5, 17);
/// assert_eq!(
///     route_dir(Utf8Path::new("output"), "mapbox", "walking", day),
///     "output/mapbox/walking/2024-05-17"
/// );
/// assert_eq!(
///     route_dir(Utf8Path::new("output"), "ors", "cycling.road", None),
///     "output/ors/cycling.road"
/// );
/// ```
pub fn route_dir(
    output_dir: &Utf8Path,
    provider: &str,
    profile: &str,
    date: Option<NaiveDate>,
) -> Utf8PathBuf {
    let dir = output_dir.join(provider).join(profile);
    match date {
        Some(date) => dir.join(date.format("%Y-%m-%d").to_string()),
        None => dir,
    }
}

/// Stream records to `writer` as CSV, header first.
///
/// The header is written even when `records` is empty. Returns the number of
/// records written.
pub fn write_accessibility<W, I>(writer: W, records: I) -> Result<usize, csv::Error>
where
    W: Write,
    I: IntoIterator<Item = AccessibilityRecord>,
{
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    let mut written = 0;
    for record in records {
        csv_writer.serialize(record)?;
        csv_writer.flush()?;
        written += 1;
    }
    csv_writer.flush()?;
    Ok(written)
}

/// Create `path` and stream records into it.
///
/// The file is created before the first record is pulled, so a run that
/// yields nothing still leaves a header-only table behind.
///
/// # Errors
///
/// Returns [`OutputError`] when the file cannot be created or written.
pub fn write_accessibility_csv<I>(path: &Utf8Path, records: I) -> Result<usize, OutputError>
where
    I: IntoIterator<Item = AccessibilityRecord>,
{
    let file = rap_fs::create_file(path).map_err(|source| OutputError::Io {
        path: path.to_owned(),
        source,
    })?;
    let written = write_accessibility(file, records).map_err(|source| OutputError::Csv {
        path: path.to_owned(),
        source,
    })?;
    log::info!("wrote {written} accessibility records to {path}");
    Ok(written)
}

/// Writes each found route's geometry to `<dir>/<source>_<target>.json`.
///
/// Existing files for the same pair are replaced.
#[derive(Debug, Clone)]
pub struct FileRouteSink {
    dir: Utf8PathBuf,
}

impl FileRouteSink {
    /// Store routes under `dir`, creating it on first write.
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory receiving the route files.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// File that holds the route from `source_id` to `target_id`.
    pub fn route_path(&self, source_id: i64, target_id: i64) -> Utf8PathBuf {
        self.dir.join(format!("{source_id}_{target_id}.json"))
    }
}

impl RouteSink for FileRouteSink {
    fn persist(
        &mut self,
        source: &Point,
        target: &Point,
        route: &FoundRoute,
    ) -> Result<(), RouteSinkError> {
        let bytes =
            serde_json::to_vec(&route.geometry).map_err(|err| RouteSinkError::Serialise {
                source_id: source.id,
                target_id: target.id,
                message: err.to_string(),
            })?;
        let path = self.route_path(source.id, target.id);
        rap_fs::write_file(&path, &bytes).map_err(|err| RouteSinkError::Write {
            source_id: source.id,
            target_id: target.id,
            location: path.to_string(),
            source: err,
        })?;
        log::debug!("saved route {}->{} to {path}", source.id, target.id);
        Ok(())
    }
}
