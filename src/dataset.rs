// src/dataset.rs
use crate::db::connection::Database;
use crate::db::loader::{load_tables, LoadedTables};
use crate::domain::event::{BundleSummary, PlanningEvent};
use crate::errors::ServerError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const MIN_APPS_RANGE: (i64, i64) = (1, 1000);
pub const LIMIT_RANGE: (usize, usize) = (10, 2000);

/// Filter for the bundle listing. Blank text filters are ignored.
#[derive(Debug, Clone)]
pub struct BundleFilter {
    pub council: String,
    pub q: String,
    pub min_apps: i64,
    pub limit: usize,
}

impl Default for BundleFilter {
    fn default() -> Self {
        Self {
            council: String::new(),
            q: String::new(),
            min_apps: 5,
            limit: 200,
        }
    }
}

/// The whole planning dataset, loaded once and never mutated.
///
/// Events are grouped per bundle and sorted oldest first, so every lookup
/// hands the overview engine a ready-to-use sequence.
#[derive(Debug)]
pub struct PlanningDataset {
    bundles: Vec<BundleSummary>,
    events: HashMap<String, Vec<PlanningEvent>>,
    repo_rows: usize,
    dropped_rows: usize,
    source: PathBuf,
}

impl PlanningDataset {
    pub fn load(db: &Database) -> Result<Self, ServerError> {
        let tables = load_tables(db)?;
        Ok(Self::from_tables(tables, db.path()))
    }

    pub fn from_tables(tables: LoadedTables, source: &Path) -> Self {
        let repo_rows = tables.events.len();
        let dropped_rows = tables.dropped_rows;
        let mut events: HashMap<String, Vec<PlanningEvent>> = HashMap::new();
        for (bundle_id, event) in tables.events {
            events.entry(bundle_id).or_default().push(event);
        }
        for seq in events.values_mut() {
            // stable, equal timestamps keep table order
            seq.sort_by_key(|e| e.timestamp);
        }

        Self {
            bundles: tables.bundles,
            events,
            repo_rows,
            dropped_rows,
            source: source.to_path_buf(),
        }
    }

    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }

    pub fn repo_rows(&self) -> usize {
        self.repo_rows
    }

    /// Repo rows skipped at load time for want of a usable timestamp.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Directory holding the dataset file, made absolute when possible.
    pub fn data_dir(&self) -> PathBuf {
        let dir = self
            .source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf())
    }

    /// Events of one bundle, oldest first.
    pub fn events_for(&self, bundle_id: &str) -> Result<&[PlanningEvent], ServerError> {
        self.events
            .get(bundle_id)
            .filter(|seq| !seq.is_empty())
            .map(Vec::as_slice)
            .ok_or_else(|| ServerError::not_found("bundle"))
    }

    pub fn list_bundles(&self, filter: &BundleFilter) -> Vec<&BundleSummary> {
        let council = filter.council.trim().to_lowercase();
        let q = filter.q.trim().to_lowercase();

        let mut out: Vec<&BundleSummary> = self
            .bundles
            .iter()
            .filter(|b| council.is_empty() || contains_folded(&b.council_name, &council))
            .filter(|b| q.is_empty() || contains_folded(&b.sample_address, &q))
            .filter(|b| b.n_apps >= filter.min_apps)
            .collect();

        out.sort_by(|a, b| b.n_apps.cmp(&a.n_apps));
        out.truncate(filter.limit);
        out
    }
}

fn contains_folded(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .map(|v| v.to_lowercase().contains(needle))
        .unwrap_or(false)
}
