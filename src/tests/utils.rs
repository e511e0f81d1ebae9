use crate::config::AppConfig;
use crate::state::AppState;
use astra::{Body, Request, Response};
use http::Method;
use rusqlite::Connection;
use std::io::Read;
use std::path::PathBuf;
use tempfile::TempDir;

/// Two bundles with events, one without. `BAD/1` has no usable timestamp
/// and must be dropped at load time.
pub const SEED_SQL: &str = r#"
CREATE TABLE site_bundles (
    site_bundle_id TEXT, n_apps INTEGER, council_name TEXT,
    sample_address TEXT, first_app TEXT, last_app TEXT
);
INSERT INTO site_bundles VALUES
    ('S1', 12, 'Camden', '1 High Street', '2021-01-05', '2021-09-01'),
    ('S2', 3, 'Camden', '2 Low Road', NULL, NULL),
    ('S3', 40, 'Islington', '3 High Street', '2019-02-01', '2019-02-01');

CREATE TABLE site_index_repo (
    site_bundle_id TEXT, planning_reference TEXT, event_dt TEXT, proposal TEXT,
    heading TEXT, url TEXT, normalised_application_type TEXT,
    normalised_decision TEXT, raw_address TEXT
);
INSERT INTO site_index_repo VALUES
    ('S1', '21/0003/NMA', '2021-09-01', 'Erection of rear extension
New doors', 'Minor changes', 'https://planning.test/21-0003', 'Non-Material Amendment', 'Withdrawn', '1 High Street'),
    ('S1', '21/0001/FUL', '2021-01-05 00:00:00+00:00', 'Erection of rear extension
New windows', 'Rear extension', 'https://planning.test/21-0001', 'Full Planning Permission', 'Approved', '1 High Street'),
    ('S1', '21/0002/DIS', '2021-06-10T09:00:00Z', 'Discharge of condition 3 (drainage strategy)', NULL, 'https://planning.test/21-0002', 'Discharge of Conditions', 'Approved', '1 High Street'),
    ('S1', 'BAD/1', 'not a date', '', '', '', 'Householder', 'Approved', ''),
    ('S3', '19/0100/HH', '2019-02-01', 'Loft conversion', 'Loft', '', 'Householder', 'Refused', '3 High Street');
"#;

/// Write the seed tables into a fresh SQLite file inside `dir`.
pub fn seed_db(dir: &TempDir, sql: &str) -> PathBuf {
    let path = dir.path().join("planning.sqlite3");
    let conn = Connection::open(&path).expect("Failed to create test DB");
    conn.execute_batch(sql).expect("Failed to seed test DB");
    path
}

pub fn test_config(db_path: PathBuf) -> AppConfig {
    AppConfig {
        db_path,
        ..AppConfig::default()
    }
}

/// App state over the seed dataset. Keep the `TempDir` alive for the test.
pub fn init_test_state() -> (TempDir, AppState) {
    init_test_state_with(|_| {})
}

pub fn init_test_state_with<F: FnOnce(&mut AppConfig)>(tweak: F) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut cfg = test_config(seed_db(&dir, SEED_SQL));
    tweak(&mut cfg);
    let state = AppState::from_config(&cfg)
        .unwrap_or_else(|e| panic!("State initialization failed: {e}"));
    (dir, state)
}

pub fn get(uri: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request {
    http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_json(resp: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(resp)).expect("body is not JSON")
}
