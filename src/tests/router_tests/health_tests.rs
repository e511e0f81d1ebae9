use crate::config::AppConfig;
use crate::errors::ServerError;
use crate::router::{handle, respond};
use crate::state::AppState;
use crate::tests::utils::{body_json, get, init_test_state, seed_db, test_config};
use astra::Body;
use http::{Method, Request};

#[test]
fn root_lists_entry_points() {
    let (_dir, state) = init_test_state();

    let resp = handle(get("/"), &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_json(resp);
    assert_eq!(body["name"], "Planning GitHub API");
    assert_eq!(body["try"][0], "/health");
}

#[test]
fn health_reports_loaded_rows() {
    let (_dir, state) = init_test_state();

    let body = body_json(handle(get("/health"), &state).unwrap());
    assert_eq!(body["ok"], true);
    assert_eq!(body["bundles"], 3);
    // BAD/1 has no parseable timestamp
    assert_eq!(body["repo_rows"], 4);
    assert_eq!(body["dropped_rows"], 1);
    assert!(body["data_dir"].as_str().unwrap().len() > 1);
}

#[test]
fn unknown_route_is_json_404() {
    let (_dir, state) = init_test_state();

    let resp = respond(get("/nope"), &state);
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp)["detail"], "Not Found");
}

#[test]
fn missing_database_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path().join("absent.sqlite3"));

    let err = AppState::from_config(&cfg).err().expect("load should fail");
    assert!(matches!(err, ServerError::Schema(_)));
}

#[test]
fn missing_column_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_db(
        &dir,
        "CREATE TABLE site_bundles (site_bundle_id TEXT, n_apps INTEGER, council_name TEXT,
             sample_address TEXT, first_app TEXT, last_app TEXT);
         CREATE TABLE site_index_repo (site_bundle_id TEXT, planning_reference TEXT,
             event_dt TEXT, proposal TEXT, heading TEXT, url TEXT,
             normalised_application_type TEXT, normalised_decision TEXT);",
    );

    let err = AppState::from_config(&AppConfig {
        db_path: path,
        ..AppConfig::default()
    })
    .err()
    .expect("load should fail");
    assert_eq!(err.to_string(), "Schema Error: repo missing column: raw_address");
}

#[test]
fn cors_headers_for_allowed_origin() {
    let (_dir, state) = init_test_state();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let resp = respond(req, &state);
    assert_eq!(
        resp.headers()["Access-Control-Allow-Origin"],
        "http://localhost:3000"
    );

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/chat")
        .header("Origin", "http://127.0.0.1:3000")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = respond(preflight, &state);
    assert_eq!(resp.status(), 204);
    assert_eq!(resp.headers()["Access-Control-Allow-Headers"], "content-type");
}
