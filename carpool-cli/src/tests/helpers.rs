//! Test helpers for writing solve requests and distance matrices to disk.

use camino::{Utf8Path, Utf8PathBuf};
use carpool_core::{SolveRequest, StopRequest, VehicleRequest};
use serde_json::json;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

/// A temporary directory holding `request.json` and `matrix.json`.
pub(super) struct Workspace {
    _tmp: TempDir,
    pub(super) root: Utf8PathBuf,
    pub(super) request_path: Utf8PathBuf,
    pub(super) matrix_path: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        let request_path = root.join("request.json");
        let matrix_path = root.join("matrix.json");
        Self {
            _tmp: tmp,
            root,
            request_path,
            matrix_path,
        }
    }

    pub(super) fn write_request(&self, request: &SolveRequest) {
        let payload = serde_json::to_string_pretty(request).expect("serialize request");
        write_utf8(&self.request_path, payload.as_bytes());
    }

    pub(super) fn write_town_matrix(&self) {
        let payload = json!({
            "addresses": ["North", "South", "N1", "N2", "S1", "Office"],
            "distances": [
                [0, 20, 2, 3, 18, 10],
                [20, 0, 18, 17, 2, 10],
                [2, 18, 0, 1, 16, 8],
                [3, 17, 1, 0, 15, 7],
                [18, 2, 16, 15, 0, 8],
                [10, 10, 8, 7, 8, 0]
            ]
        });
        write_utf8(&self.matrix_path, payload.to_string().as_bytes());
    }
}

/// Two drivers on opposite sides of town and three passengers.
pub(super) fn town_request(north_seats: u32) -> SolveRequest {
    SolveRequest {
        vehicles: vec![
            VehicleRequest {
                id: "north".to_owned(),
                origin_address: "North".to_owned(),
                capacity: north_seats,
            },
            VehicleRequest {
                id: "south".to_owned(),
                origin_address: "South".to_owned(),
                capacity: 1,
            },
        ],
        stops: vec![
            StopRequest {
                id: "n1".to_owned(),
                address: "N1".to_owned(),
            },
            StopRequest {
                id: "n2".to_owned(),
                address: "N2".to_owned(),
            },
            StopRequest {
                id: "s1".to_owned(),
                address: "S1".to_owned(),
            },
        ],
        destination_address: Some("Office".to_owned()),
        budget: None,
    }
}
