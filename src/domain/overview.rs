// src/domain/overview.rs

use crate::domain::event::PlanningEvent;
use crate::domain::rules::classify;
use crate::domain::tally::Tally;
use serde::Serialize;
use thiserror::Error;

pub const MAX_INSIGHTS: usize = 5;
pub const MAX_NEXT_ACTIONS: usize = 6;
pub const MAX_TYPE_COUNTS: usize = 8;
pub const HEADLINE_CHARS: usize = 140;
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverviewError {
    #[error("bundle has no events")]
    EmptyBundle,
}

/// Where a site sits in its planning lifecycle.
///
/// The order of checks in [`Stage::derive`] determines precedence: a site
/// with approvals and condition work is in delivery even if it also has
/// amendments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PostPermission,
    DesignIteration,
    Application,
}

impl Stage {
    pub fn derive(any_approved: bool, amend_count: usize, cond_count: usize) -> Self {
        if any_approved && cond_count > 0 {
            return Stage::PostPermission;
        }
        if amend_count > 0 {
            return Stage::DesignIteration;
        }
        Stage::Application
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::PostPermission => "Post-permission delivery (conditions/discharges)",
            Stage::DesignIteration => "Design iteration (amendments)",
            Stage::Application => "Application phase",
        }
    }
}

impl Serialize for Stage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Snapshot of the most recent event in a bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestSummary {
    pub planning_reference: String,
    pub date: String,
    #[serde(rename = "type")]
    pub application_type: String,
    pub decision: String,
    pub heading: String,
    pub url: String,
}

impl LatestSummary {
    fn from_event(e: &PlanningEvent) -> Self {
        Self {
            planning_reference: e.reference.clone(),
            date: e.timestamp.format("%Y-%m-%d").to_string(),
            application_type: e.application_type.clone(),
            decision: e.decision.clone(),
            heading: e.headline(HEADLINE_CHARS),
            url: e.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewResult {
    pub bundle_id: String,
    pub n_commits: usize,
    pub stage: Stage,
    pub days_span: Option<i64>,
    pub main_count: usize,
    pub amend_count: usize,
    pub cond_count: usize,
    pub churn_score: f64,
    pub condition_debt: f64,
    pub decision_counts: Tally,
    pub type_counts: Tally,
    pub latest: LatestSummary,
    pub insights: Vec<String>,
    pub next_actions: Vec<String>,
}

/// Derive the overview of one bundle from its events, oldest first.
///
/// Pure: the same events always give the same result.
pub fn derive_overview(
    bundle_id: &str,
    events: &[PlanningEvent],
) -> Result<OverviewResult, OverviewError> {
    let latest = events.last().ok_or(OverviewError::EmptyBundle)?;
    let n_commits = events.len();

    let (mut main_count, mut amend_count, mut cond_count) = (0, 0, 0);
    for e in events {
        let flags = classify(&e.application_type);
        main_count += usize::from(flags.main);
        amend_count += usize::from(flags.amendment);
        cond_count += usize::from(flags.condition);
    }

    let decision_counts = Tally::count(events.iter().map(|e| or_unknown(&e.decision)));
    let type_counts =
        Tally::count(events.iter().map(|e| or_unknown(&e.application_type))).top(MAX_TYPE_COUNTS);

    let first = events.iter().map(|e| e.timestamp).min();
    let last = events.iter().map(|e| e.timestamp).max();
    let days_span = match (first, last) {
        (Some(first), Some(last)) => Some((last - first).num_days()),
        _ => None,
    };

    let approved_count = events.iter().filter(|e| e.is_approved()).count();
    let stage = Stage::derive(approved_count > 0, amend_count, cond_count);

    // n_commits >= 1 here; approvals are floored at 1
    let churn_score = round3(amend_count as f64 / n_commits as f64);
    let condition_debt = round3(cond_count as f64 / approved_count.max(1) as f64);

    let (insights, next_actions) = advise(stage, amend_count, &decision_counts);

    Ok(OverviewResult {
        bundle_id: bundle_id.to_string(),
        n_commits,
        stage,
        days_span,
        main_count,
        amend_count,
        cond_count,
        churn_score,
        condition_debt,
        decision_counts,
        type_counts,
        latest: LatestSummary::from_event(latest),
        insights,
        next_actions,
    })
}

/// Rule-based insights and next actions, capped after all rules ran.
fn advise(stage: Stage, amend_count: usize, decisions: &Tally) -> (Vec<String>, Vec<String>) {
    let mut insights = Vec::new();
    let mut next_actions = Vec::new();

    if stage.label().starts_with("Post-permission") {
        insights.push("This repo is dominated by condition discharge activity: delivery risk is in post-permission compliance, not initial approval.".to_string());
        next_actions.push("Create a condition tracker: list each condition number/topic, responsible consultant, and submission status.".to_string());
        next_actions.push("Batch submissions: councils respond better to complete packs (e.g., drainage + materials + ecology together).".to_string());
    }

    if amend_count >= 3 {
        insights.push("High amendment churn detected: repeated changes increase timeline and coordination risk.".to_string());
        next_actions.push("Freeze the design baseline and only submit amendments as a bundled change-set (avoid drip-feeding).".to_string());
    }

    if decisions.get("Withdrawn") >= 1 {
        insights.push("Withdrawals present: indicates negotiation/refinement cycles rather than clean approvals/refusals.".to_string());
        next_actions.push("Review officer feedback on withdrawn items; resubmit with explicit responses mapped to policy points.".to_string());
    }

    insights.truncate(MAX_INSIGHTS);
    next_actions.truncate(MAX_NEXT_ACTIONS);
    (insights, next_actions)
}

fn or_unknown(label: &str) -> &str {
    if label.is_empty() {
        UNKNOWN
    } else {
        label
    }
}

/// Three decimals, exact ties to even on the decimal expansion.
fn round3(x: f64) -> f64 {
    format!("{x:.3}").parse().unwrap_or(x)
}
