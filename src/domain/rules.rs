// src/domain/rules.rs

use regex::Regex;
use std::sync::OnceLock;

/// Buckets an application type can fall into. They are not exclusive:
/// "Variation of Conditions" is both an amendment and condition-related.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Main,
    Amendment,
    Condition,
}

/// Keyword alternations per bucket, matched against the lower-cased type.
pub const BUCKET_RULES: [(Bucket, &str); 3] = [
    (
        Bucket::Main,
        "full planning|householder|listed building consent|prior approval",
    ),
    (
        Bucket::Amendment,
        "non-material amendment|variation of conditions|minor amendment",
    ),
    (
        Bucket::Condition,
        "discharge of conditions|details pursuant|condition",
    ),
];

fn compiled() -> &'static [(Bucket, Regex)] {
    static RULES: OnceLock<Vec<(Bucket, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        BUCKET_RULES
            .iter()
            .map(|(bucket, pattern)| (*bucket, Regex::new(pattern).expect("bucket pattern")))
            .collect()
    })
}

/// Which bucket flags an application type raises: `[main, amendment, condition]`.
pub fn classify(application_type: &str) -> BucketFlags {
    let lowered = application_type.to_lowercase();
    let mut flags = BucketFlags::default();
    for (bucket, re) in compiled() {
        if re.is_match(&lowered) {
            match bucket {
                Bucket::Main => flags.main = true,
                Bucket::Amendment => flags.amendment = true,
                Bucket::Condition => flags.condition = true,
            }
        }
    }
    flags
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketFlags {
    pub main: bool,
    pub amendment: bool,
    pub condition: bool,
}
