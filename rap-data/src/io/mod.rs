//! File formats read and written by a probing run.
//!
//! - Points: CSV with at least `id`, `x` and `y` columns.
//! - Landmark: a GeoJSON `Feature` with a `Point` geometry.
//! - Extra parameters: a flat JSON object.
//! - Results: `<provider>.csv` with `id,x,y,accessibility`, plus one JSON
//!   file per found route.

mod input;
mod output;

pub use input::{InputError, load_extra_params, load_landmark, load_points, read_points};
pub use output::{
    FileRouteSink, OutputError, accessibility_csv_path, route_dir, write_accessibility,
    write_accessibility_csv,
};
