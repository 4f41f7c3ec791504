//! Test helpers that lay out probe inputs in a temporary directory.

use camino::{Utf8Path, Utf8PathBuf};
use std::{fs, net::TcpListener};
use tempfile::TempDir;

pub(super) const POINTS_CSV: &str = "id,x,y,name\n\
                                     1,13.38,52.52,Mitte\n\
                                     2,13.41,52.5,Kreuzberg\n\
                                     3,13.45,52.51,Friedrichshain\n";

const LANDMARK_GEOJSON: &str = r#"{
  "type": "Feature",
  "properties": { "name": "Hauptbahnhof" },
  "geometry": { "type": "Point", "coordinates": [13.369, 52.525] }
}"#;

/// Probe inputs whose router config points at a port nobody listens on, so
/// every route query fails at the transport layer.
pub(super) struct ProbeFiles {
    _dir: TempDir,
    root: Utf8PathBuf,
    points: Utf8PathBuf,
    landmark: Utf8PathBuf,
    router_config: Utf8PathBuf,
}

impl ProbeFiles {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        let points = root.join("points.csv");
        let landmark = root.join("hbf.geojson");
        let router_config = root.join("routerconf.json");
        fs::write(&points, POINTS_CSV).expect("write points");
        fs::write(&landmark, LANDMARK_GEOJSON).expect("write landmark");
        let routers = format!(
            r#"{{"graphhopper": {{"key": "gh-test", "base_url": "{}"}}}}"#,
            closed_port_url()
        );
        fs::write(&router_config, routers).expect("write router config");
        Self {
            _dir: dir,
            root,
            points,
            landmark,
            router_config,
        }
    }

    pub(super) fn points(&self) -> &Utf8Path {
        &self.points
    }

    pub(super) fn landmark(&self) -> &Utf8Path {
        &self.landmark
    }

    pub(super) fn router_config(&self) -> &Utf8Path {
        &self.router_config
    }

    pub(super) fn output_dir(&self) -> Utf8PathBuf {
        self.root.join("output")
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{addr}")
}
