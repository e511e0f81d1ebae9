use crate::router::{handle, respond};
use crate::tests::utils::{body_json, body_string, get, init_test_state};
use astra::Body;
use http::{Method, Request};

#[test]
fn detail_lists_commits_oldest_first() {
    let (_dir, state) = init_test_state();

    let body = body_json(handle(get("/repo/S1"), &state).unwrap());
    assert_eq!(body["bundle_id"], "S1");

    let commits = body["commits"].as_array().unwrap();
    let refs: Vec<_> = commits
        .iter()
        .map(|c| c["planning_reference"].as_str().unwrap())
        .collect();
    assert_eq!(refs, vec!["21/0001/FUL", "21/0002/DIS", "21/0003/NMA"]);

    assert_eq!(commits[0]["event_dt"], "2021-01-05T00:00:00Z");
    assert_eq!(commits[0]["normalised_application_type"], "Full Planning Permission");
    assert_eq!(commits[1]["heading"], "");
    assert_eq!(commits[2]["raw_address"], "1 High Street");
}

#[test]
fn unknown_bundle_is_404() {
    let (_dir, state) = init_test_state();

    for uri in ["/repo/S404", "/repo/S404/overview", "/repo/S404/diff?a=x&b=y"] {
        let resp = respond(get(uri), &state);
        assert_eq!(resp.status(), 404, "{uri}");
        assert_eq!(body_json(resp)["detail"], "bundle not found");
    }
}

#[test]
fn bundle_without_events_is_404() {
    let (_dir, state) = init_test_state();

    // S2 is indexed but has no repo rows
    let resp = respond(get("/repo/S2/overview"), &state);
    assert_eq!(resp.status(), 404);
}

#[test]
fn overview_derives_stage_and_metrics() {
    let (_dir, state) = init_test_state();

    let resp = handle(get("/repo/S1/overview"), &state).unwrap();
    assert!(resp.headers().get("ETag").is_some());
    let o = body_json(resp);

    assert_eq!(o["bundle_id"], "S1");
    assert_eq!(o["n_commits"], 3);
    assert_eq!(o["stage"], "Post-permission delivery (conditions/discharges)");
    assert_eq!(o["days_span"], 239);
    assert_eq!(o["main_count"], 1);
    assert_eq!(o["amend_count"], 1);
    assert_eq!(o["cond_count"], 1);
    assert_eq!(o["churn_score"], 0.333);
    assert_eq!(o["condition_debt"], 0.5);
    assert_eq!(o["decision_counts"]["Approved"], 2);
    assert_eq!(o["decision_counts"]["Withdrawn"], 1);
    assert_eq!(o["type_counts"].as_object().unwrap().len(), 3);

    assert_eq!(o["latest"]["planning_reference"], "21/0003/NMA");
    assert_eq!(o["latest"]["date"], "2021-09-01");
    assert_eq!(o["latest"]["type"], "Non-Material Amendment");
    assert_eq!(o["latest"]["heading"], "Minor changes");

    assert_eq!(o["insights"].as_array().unwrap().len(), 2);
    assert_eq!(o["next_actions"].as_array().unwrap().len(), 3);
}

#[test]
fn overview_is_byte_identical_and_revalidates() {
    let (_dir, state) = init_test_state();

    let first = handle(get("/repo/S1/overview"), &state).unwrap();
    let etag = first.headers()["ETag"].to_str().unwrap().to_string();
    let first_body = body_string(first);
    let second_body = body_string(handle(get("/repo/S1/overview"), &state).unwrap());
    assert_eq!(first_body, second_body);

    let req = Request::builder()
        .method(Method::GET)
        .uri("/repo/S1/overview")
        .header("If-None-Match", etag.as_str())
        .body(Body::empty())
        .unwrap();
    let resp = handle(req, &state).unwrap();
    assert_eq!(resp.status(), 304);
    assert_eq!(body_string(resp), "");
}

#[test]
fn diff_compares_two_proposals() {
    let (_dir, state) = init_test_state();

    let body = body_json(
        handle(get("/repo/S1/diff?a=21%2F0001%2FFUL&b=21%2F0003%2FNMA"), &state).unwrap(),
    );
    assert_eq!(body["a"], "21/0001/FUL");
    assert_eq!(body["b"], "21/0003/NMA");

    let lines: Vec<_> = body["diff"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l.as_str().unwrap())
        .collect();
    assert!(lines.contains(&"-New windows"));
    assert!(lines.contains(&"+New doors"));
    assert!(lines.contains(&" Erection of rear extension"));
}

#[test]
fn diff_requires_known_commits() {
    let (_dir, state) = init_test_state();

    let resp = respond(get("/repo/S1/diff?a=21%2F0001%2FFUL&b=nope"), &state);
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp)["detail"], "commit not found");

    // references from another bundle do not count
    let resp = respond(get("/repo/S1/diff?a=21%2F0001%2FFUL&b=19%2F0100%2FHH"), &state);
    assert_eq!(resp.status(), 404);

    let resp = respond(get("/repo/S1/diff?a=21%2F0001%2FFUL"), &state);
    assert_eq!(resp.status(), 422);
}
