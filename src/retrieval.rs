// src/retrieval.rs
use crate::domain::event::PlanningEvent;
use std::collections::HashMap;

pub const DEFAULT_TOP_K: usize = 6;

/// Text an event is searched by: reference, labels, heading and proposal.
pub fn search_text(e: &PlanningEvent) -> String {
    format!(
        "{} | {} | {}\n{}\n{}",
        e.reference, e.application_type, e.decision, e.heading, e.proposal_text
    )
}

/// Rank `events` against `query` with TF-IDF over unigrams and bigrams,
/// returning at most `k` events, best first. Equal scores keep input order.
pub fn retrieve<'a>(events: &'a [PlanningEvent], query: &str, k: usize) -> Vec<&'a PlanningEvent> {
    if k == 0 || events.is_empty() {
        return Vec::new();
    }

    let mut docs: Vec<HashMap<String, f64>> = events
        .iter()
        .map(|e| term_frequencies(&search_text(e)))
        .collect();
    docs.push(term_frequencies(query));

    // idf is fitted over the events plus the query itself
    let n = docs.len() as f64;
    let mut doc_frequency: HashMap<&str, f64> = HashMap::new();
    for doc in &docs {
        for term in doc.keys() {
            *doc_frequency.entry(term.as_str()).or_default() += 1.0;
        }
    }
    let idf = |term: &str| {
        let df = doc_frequency.get(term).copied().unwrap_or(0.0);
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    };

    let vectors: Vec<HashMap<&str, f64>> = docs
        .iter()
        .map(|doc| {
            let mut v: HashMap<&str, f64> = doc
                .iter()
                .map(|(term, tf)| (term.as_str(), tf * idf(term.as_str())))
                .collect();
            normalize(&mut v);
            v
        })
        .collect();

    let (query_vec, doc_vecs) = match vectors.split_last() {
        Some(split) => split,
        None => return Vec::new(),
    };

    let mut scored: Vec<(usize, f64)> = doc_vecs
        .iter()
        .enumerate()
        .map(|(i, v)| (i, dot(query_vec, v)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    scored
        .into_iter()
        .take(k)
        .map(|(i, _)| &events[i])
        .collect()
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(|t| t.to_lowercase())
        .collect()
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let tokens = tokenize(text);
    let mut tf: HashMap<String, f64> = HashMap::new();
    for t in &tokens {
        *tf.entry(t.clone()).or_default() += 1.0;
    }
    for pair in tokens.windows(2) {
        *tf.entry(format!("{} {}", pair[0], pair[1])).or_default() += 1.0;
    }
    tf
}

fn normalize(v: &mut HashMap<&str, f64>) {
    let magnitude = v.values().map(|x| x * x).sum::<f64>().sqrt();
    if magnitude > 0.0 {
        for x in v.values_mut() {
            *x /= magnitude;
        }
    }
}

fn dot(a: &HashMap<&str, f64>, b: &HashMap<&str, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, x)| large.get(term).map(|y| x * y))
        .sum()
}
