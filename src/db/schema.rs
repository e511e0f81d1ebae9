// src/db/schema.rs
use crate::errors::ServerError;
use rusqlite::Connection;

pub const BUNDLES_TABLE: &str = "site_bundles";
pub const REPO_TABLE: &str = "site_index_repo";

pub const BUNDLE_COLUMNS: [&str; 6] = [
    "site_bundle_id",
    "n_apps",
    "council_name",
    "sample_address",
    "first_app",
    "last_app",
];

pub const REPO_COLUMNS: [&str; 9] = [
    "site_bundle_id",
    "planning_reference",
    "event_dt",
    "proposal",
    "heading",
    "url",
    "normalised_application_type",
    "normalised_decision",
    "raw_address",
];

/// Column names of `table`, in declaration order. Empty when the table
/// does not exist.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, ServerError> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info(\"{table}\")"))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

/// Fail unless `table` exists and carries every `required` column.
pub fn require_columns(
    conn: &Connection,
    label: &str,
    table: &str,
    required: &[&str],
) -> Result<(), ServerError> {
    let present = table_columns(conn, table)?;
    if present.is_empty() {
        return Err(ServerError::Schema(format!("missing table: {table}")));
    }

    for c in required {
        if !present.iter().any(|p| p == c) {
            return Err(ServerError::Schema(format!("{label} missing column: {c}")));
        }
    }
    Ok(())
}

/// Hard schema checks on both tables.
pub fn validate(conn: &Connection) -> Result<(), ServerError> {
    require_columns(conn, "bundles", BUNDLES_TABLE, &BUNDLE_COLUMNS)?;
    require_columns(conn, "repo", REPO_TABLE, &REPO_COLUMNS)?;
    Ok(())
}
