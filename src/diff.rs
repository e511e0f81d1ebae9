// src/diff.rs
use crate::domain::event::truncate_chars;
use serde::Serialize;
use similar::TextDiff;

pub const MAX_PROPOSAL_CHARS: usize = 2500;
pub const MAX_DIFF_LINES: usize = 500;

#[derive(Debug, Serialize)]
pub struct ProposalDiff {
    pub a: String,
    pub b: String,
    pub diff: Vec<String>,
}

/// Unified line diff of two proposals, each cut to the first 2500 chars.
/// Identical inputs give an empty diff.
pub fn diff_proposals(a: &str, b: &str) -> Vec<String> {
    let old = as_lines(truncate_chars(a, MAX_PROPOSAL_CHARS));
    let new = as_lines(truncate_chars(b, MAX_PROPOSAL_CHARS));

    let text_diff = TextDiff::from_lines(&old, &new);
    if text_diff.ratio() == 1.0 {
        return Vec::new();
    }

    let rendered = text_diff
        .unified_diff()
        .context_radius(3)
        .header("", "")
        .to_string();

    rendered
        .lines()
        .map(|l| l.to_string())
        .take(MAX_DIFF_LINES)
        .collect()
}

/// Normalise line endings so the last line never trips a
/// "no newline at end of file" marker.
fn as_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    for line in text.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out
}
