use crate::router::{handle, respond};
use crate::tests::utils::{body_json, get, init_test_state};

fn ids(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|b| b["site_bundle_id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn default_listing_hides_small_bundles() {
    let (_dir, state) = init_test_state();

    let body = body_json(handle(get("/bundles"), &state).unwrap());
    assert_eq!(ids(&body), vec!["S3", "S1"]);
    assert_eq!(body[0]["n_apps"], 40);
    assert_eq!(body[0]["council_name"], "Islington");
}

#[test]
fn council_and_address_filters_are_case_insensitive() {
    let (_dir, state) = init_test_state();

    let body = body_json(handle(get("/bundles?council=CAMDEN&min_apps=1"), &state).unwrap());
    assert_eq!(ids(&body), vec!["S1", "S2"]);

    let body = body_json(handle(get("/bundles?q=high+street&min_apps=1"), &state).unwrap());
    assert_eq!(ids(&body), vec!["S3", "S1"]);

    let body = body_json(handle(get("/bundles?council=%20%20&min_apps=1"), &state).unwrap());
    assert_eq!(ids(&body).len(), 3);
}

#[test]
fn out_of_range_parameters_are_rejected() {
    let (_dir, state) = init_test_state();

    for uri in [
        "/bundles?limit=5",
        "/bundles?limit=5000",
        "/bundles?min_apps=0",
        "/bundles?min_apps=lots",
    ] {
        let resp = respond(get(uri), &state);
        assert_eq!(resp.status(), 422, "{uri} should be rejected");
    }
}
