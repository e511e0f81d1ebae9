// src/domain/event.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One planning-application record ("commit") of a site bundle.
///
/// Text fields are never absent: NULLs from the source table arrive as
/// empty strings. The timestamp is always valid; rows without one are
/// dropped while loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningEvent {
    #[serde(rename = "planning_reference")]
    pub reference: String,
    #[serde(rename = "event_dt")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "normalised_application_type")]
    pub application_type: String,
    #[serde(rename = "normalised_decision")]
    pub decision: String,
    pub heading: String,
    #[serde(rename = "proposal")]
    pub proposal_text: String,
    pub raw_address: String,
    pub url: String,
}

impl PlanningEvent {
    /// Heading if present, otherwise the proposal, cut to `max_chars`.
    pub fn headline(&self, max_chars: usize) -> String {
        let source = if self.heading.is_empty() {
            &self.proposal_text
        } else {
            &self.heading
        };
        truncate_chars(source, max_chars).to_string()
    }

    pub fn is_approved(&self) -> bool {
        self.decision.eq_ignore_ascii_case("approved")
    }
}

/// One row of the bundle index: a site and its application count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleSummary {
    pub site_bundle_id: String,
    pub n_apps: i64,
    pub council_name: Option<String>,
    pub sample_address: Option<String>,
    pub first_app: Option<String>,
    pub last_app: Option<String>,
}

/// Slice to at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
