use crate::dataset::{BundleFilter, LIMIT_RANGE, MIN_APPS_RANGE};
use crate::diff::{diff_proposals, ProposalDiff};
use crate::domain::event::PlanningEvent;
use crate::domain::overview::derive_overview;
use crate::errors::ServerError;
use crate::responses::{
    apply_cors, audio_response, error_to_response, json_response, json_response_with_etag,
    preflight_response, ResultResp,
};
use crate::retrieval::{retrieve, DEFAULT_TOP_K};
use crate::state::AppState;
use astra::{Request, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::io::Read;
use std::time::Instant;
use tracing::{info, warn};

const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Entry point for the server: dispatch, render errors, add CORS, log.
pub fn respond(req: Request, state: &AppState) -> Response {
    let started = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let origin = header(&req, "Origin").map(str::to_string);

    let mut resp = match handle(req, state) {
        Ok(resp) => resp,
        Err(err) => {
            if err.status() >= 500 {
                warn!(%method, %path, error = %err, "request failed");
            }
            error_to_response(err)
        }
    };
    apply_cors(&mut resp, origin.as_deref(), &state.cors_origins);

    info!(
        %method,
        %path,
        status = resp.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "served"
    );
    resp
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let segments = path_segments(req.uri().path());
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    match (method.as_str(), segments.as_slice()) {
        ("OPTIONS", _) => preflight_response(
            header(&req, "Origin"),
            header(&req, "Access-Control-Request-Headers"),
            &state.cors_origins,
        ),
        ("GET", []) => json_response(&json!({
            "name": "Planning GitHub API",
            "try": ["/health", "/bundles?limit=10"]
        })),
        ("GET", ["health"]) => health(state),
        ("GET", ["bundles"]) => list_bundles(&parse_query(&req), state),
        ("GET", ["repo", bundle_id]) => repo_detail(bundle_id, state),
        ("GET", ["repo", bundle_id, "diff"]) => repo_diff(bundle_id, &parse_query(&req), state),
        ("GET", ["repo", bundle_id, "overview"]) => {
            let overview = derive_overview(bundle_id, state.dataset.events_for(bundle_id)?)?;
            json_response_with_etag(&overview, header(&req, "If-None-Match"))
        }
        ("POST", ["chat"]) => chat(req, state),
        ("POST", ["tts"]) => tts(req, state),
        _ => Err(ServerError::NotFound("Not Found".into())),
    }
}

fn health(state: &AppState) -> ResultResp {
    json_response(&json!({
        "ok": true,
        "bundles": state.dataset.bundle_count(),
        "repo_rows": state.dataset.repo_rows(),
        "dropped_rows": state.dataset.dropped_rows(),
        "data_dir": state.dataset.data_dir().display().to_string(),
    }))
}

fn list_bundles(params: &HashMap<String, String>, state: &AppState) -> ResultResp {
    let defaults = BundleFilter::default();
    let filter = BundleFilter {
        council: params.get("council").cloned().unwrap_or_default(),
        q: params.get("q").cloned().unwrap_or_default(),
        min_apps: int_param(params, "min_apps", defaults.min_apps, MIN_APPS_RANGE)?,
        limit: int_param(
            params,
            "limit",
            defaults.limit as i64,
            (LIMIT_RANGE.0 as i64, LIMIT_RANGE.1 as i64),
        )? as usize,
    };

    json_response(&state.dataset.list_bundles(&filter))
}

#[derive(Serialize)]
struct RepoDetail<'a> {
    bundle_id: &'a str,
    commits: &'a [PlanningEvent],
}

fn repo_detail(bundle_id: &str, state: &AppState) -> ResultResp {
    let commits = state.dataset.events_for(bundle_id)?;
    json_response(&RepoDetail { bundle_id, commits })
}

fn repo_diff(bundle_id: &str, params: &HashMap<String, String>, state: &AppState) -> ResultResp {
    let a = required_param(params, "a")?;
    let b = required_param(params, "b")?;

    let events = state.dataset.events_for(bundle_id)?;
    let find = |reference: &str| {
        events
            .iter()
            .find(|e| e.reference == reference)
            .ok_or_else(|| ServerError::not_found("commit"))
    };
    let (ea, eb) = (find(a)?, find(b)?);

    json_response(&ProposalDiff {
        a: a.to_string(),
        b: b.to_string(),
        diff: diff_proposals(&ea.proposal_text, &eb.proposal_text),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    bundle_id: Option<String>,
    #[serde(default)]
    question: Option<String>,
}

fn chat(req: Request, state: &AppState) -> ResultResp {
    let payload: ChatRequest = read_json(req)?;
    let bundle_id = payload.bundle_id.as_deref().unwrap_or("").trim();
    let question = payload.question.as_deref().unwrap_or("").trim();
    if bundle_id.is_empty() || question.is_empty() {
        return Err(ServerError::BadRequest(
            "bundle_id and question required".into(),
        ));
    }

    let events = state.dataset.events_for(bundle_id)?;
    let ctx = retrieve(events, question, DEFAULT_TOP_K);
    let overview = derive_overview(bundle_id, events)?;

    let answer = state.answerer.answer(question, &ctx, overview)?;
    json_response(&answer)
}

#[derive(Debug, Default, Deserialize)]
struct TtsRequest {
    #[serde(default)]
    text: Option<String>,
}

fn tts(req: Request, state: &AppState) -> ResultResp {
    let payload: TtsRequest = read_json(req)?;
    let audio = state
        .speech
        .synthesize(payload.text.as_deref().unwrap_or(""))?;
    audio_response(audio)
}

fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn read_json<T: DeserializeOwned>(mut req: Request) -> Result<T, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;

    serde_json::from_slice(&buf)
        .map_err(|e| ServerError::Validation(format!("invalid JSON body: {e}")))
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn required_param<'a>(params: &'a HashMap<String, String>, name: &str) -> Result<&'a str, ServerError> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| ServerError::Validation(format!("query parameter '{name}' is required")))
}

fn int_param(
    params: &HashMap<String, String>,
    name: &str,
    default: i64,
    (min, max): (i64, i64),
) -> Result<i64, ServerError> {
    let Some(raw) = params.get(name) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or_else(|| {
            ServerError::Validation(format!("{name} must be an integer between {min} and {max}"))
        })
}

/// Split a path into percent-decoded, non-empty segments.
fn path_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(percent_decode)
        .collect()
}

fn percent_decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
