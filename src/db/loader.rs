// src/db/loader.rs
use crate::db::connection::Database;
use crate::db::schema;
use crate::domain::event::{BundleSummary, PlanningEvent};
use crate::errors::ServerError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};
use tracing::{info, warn};

/// Raw rows of both tables, validated but not yet grouped.
#[derive(Debug)]
pub struct LoadedTables {
    pub bundles: Vec<BundleSummary>,
    /// `(site_bundle_id, event)` in table order.
    pub events: Vec<(String, PlanningEvent)>,
    pub dropped_rows: usize,
}

/// Validate the schema, then read both tables in full.
pub fn load_tables(db: &Database) -> Result<LoadedTables, ServerError> {
    db.with_conn(|conn| {
        schema::validate(conn)?;

        let bundles = load_bundles(conn)?;
        let (events, dropped_rows) = load_events(conn)?;

        if dropped_rows > 0 {
            warn!(dropped_rows, "skipped repo rows without a parseable event_dt");
        }
        info!(
            bundles = bundles.len(),
            repo_rows = events.len(),
            path = %db.path().display(),
            "planning dataset loaded"
        );

        Ok(LoadedTables {
            bundles,
            events,
            dropped_rows,
        })
    })
}

fn load_bundles(conn: &Connection) -> Result<Vec<BundleSummary>, ServerError> {
    let sql = format!(
        "SELECT site_bundle_id, n_apps, council_name, sample_address, first_app, last_app FROM {}",
        schema::BUNDLES_TABLE
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map([], |row| {
        Ok(BundleSummary {
            site_bundle_id: text(row, 0)?.unwrap_or_default(),
            n_apps: integer(row, 1)?.unwrap_or(0),
            council_name: text(row, 2)?,
            sample_address: text(row, 3)?,
            first_app: text(row, 4)?,
            last_app: text(row, 5)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn load_events(conn: &Connection) -> Result<(Vec<(String, PlanningEvent)>, usize), ServerError> {
    let sql = format!(
        "SELECT site_bundle_id, planning_reference, event_dt, proposal, heading, url,
                normalised_application_type, normalised_decision, raw_address
         FROM {}",
        schema::REPO_TABLE
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map([], |row| {
        let Some(ts) = timestamp(row, 2)? else {
            return Ok(None);
        };
        Ok(Some((
            text(row, 0)?.unwrap_or_default(),
            PlanningEvent {
                reference: text(row, 1)?.unwrap_or_default(),
                timestamp: ts,
                proposal_text: text(row, 3)?.unwrap_or_default(),
                heading: text(row, 4)?.unwrap_or_default(),
                url: text(row, 5)?.unwrap_or_default(),
                application_type: text(row, 6)?.unwrap_or_default(),
                decision: text(row, 7)?.unwrap_or_default(),
                raw_address: text(row, 8)?.unwrap_or_default(),
            },
        )))
    })?;

    let mut out = Vec::new();
    let mut dropped = 0;
    for r in rows {
        match r? {
            Some(parsed) => out.push(parsed),
            None => dropped += 1,
        }
    }
    Ok((out, dropped))
}

/// Any scalar column as text; NULL stays `None`.
fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    })
}

fn integer(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) => Some(f as i64),
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

/// Integers are unix seconds; text goes through [`parse_event_dt`].
fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(secs) => Utc.timestamp_opt(secs, 0).single(),
        ValueRef::Text(t) => std::str::from_utf8(t).ok().and_then(parse_event_dt),
        _ => None,
    })
}

/// Parse an event timestamp. Offsets are honoured; naive values are UTC.
pub fn parse_event_dt(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
