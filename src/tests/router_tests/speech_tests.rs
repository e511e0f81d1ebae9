use crate::router::{handle, respond};
use crate::tests::utils::{body_json, init_test_state, init_test_state_with, post_json};
use httpmock::prelude::*;
use serde_json::json;
use std::io::Read;

#[test]
fn tts_requires_text() {
    let (_dir, state) = init_test_state();

    let resp = respond(post_json("/tts", json!({"text": "   "})), &state);
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["detail"], "text required");
}

#[test]
fn tts_requires_credentials() {
    let (_dir, state) = init_test_state();

    let resp = respond(post_json("/tts", json!({"text": "hello"})), &state);
    assert_eq!(resp.status(), 400);
    assert_eq!(
        body_json(resp)["detail"],
        "ELEVEN_API_KEY and ELEVEN_VOICE_ID must be set"
    );
}

#[test]
fn tts_proxies_audio() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/text-to-speech/v1/stream");
        then.status(200).body(vec![1u8, 2, 3, 4]);
    });

    let (_dir, state) = init_test_state_with(|cfg| {
        cfg.speech.api_key = "key".into();
        cfg.speech.voice_id = "v1".into();
        cfg.speech.base_url = server.base_url();
    });

    let resp = handle(post_json("/tts", json!({"text": "Stage is delivery"})), &state).unwrap();
    mock.assert();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["Content-Type"], "audio/mpeg");

    let mut audio = Vec::new();
    resp.into_body().reader().read_to_end(&mut audio).unwrap();
    assert_eq!(audio, vec![1, 2, 3, 4]);
}
