//! Analytics aggregation.
//!
//! Three payloads are recomputed from scratch after every proposal create,
//! delete, status change or ownership change, and once at startup. Two
//! more keys are seeded empty and left alone.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde_json::{json, Value};
use tracing::debug;

use bidbuilder_shared::constants::{
    ANALYTICS_BY_STATUS, ANALYTICS_KEYS, ANALYTICS_MONTHLY, ANALYTICS_PLACEHOLDER_KEYS,
    ANALYTICS_TEAM, MAX_ANALYTICS_WINDOW_MONTHS,
};
use bidbuilder_store::{Database, User};

use crate::error::ServerError;

#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    window_months: u32,
}

impl Aggregator {
    pub fn new(window_months: u32) -> Self {
        Self {
            window_months: window_months.clamp(1, MAX_ANALYTICS_WINDOW_MONTHS),
        }
    }

    /// Insert empty rows for the placeholder keys if they are missing.
    pub fn seed_placeholders(&self, db: &Database) -> Result<(), ServerError> {
        for key in ANALYTICS_PLACEHOLDER_KEYS {
            if db.seed_analytics(key, &json!([]))? {
                debug!(key, "seeded analytics placeholder");
            }
        }
        Ok(())
    }

    /// Replace the computed payloads. Callers run this inside the
    /// transaction of the mutation that triggered it.
    pub fn recompute(&self, db: &Database) -> Result<(), ServerError> {
        self.recompute_at(db, Utc::now())
    }

    pub fn recompute_at(&self, db: &Database, now: DateTime<Utc>) -> Result<(), ServerError> {
        let by_status: Vec<Value> = db
            .count_proposals_by_status()?
            .into_iter()
            .map(|(name, value)| json!({ "name": name, "value": value }))
            .collect();
        db.put_analytics(ANALYTICS_BY_STATUS, &Value::Array(by_status))?;

        let months = self.window(now);
        let &(first_year, first_month) = months
            .first()
            .ok_or_else(|| ServerError::Internal("empty analytics window".into()))?;
        let since = month_start(first_year, first_month)?;
        let mut counts: BTreeMap<(i32, u32), i64> = months.iter().map(|m| (*m, 0)).collect();
        for created in db.proposal_creation_times_since(since)? {
            if let Some(n) = counts.get_mut(&(created.year(), created.month())) {
                *n += 1;
            }
        }
        let monthly: Vec<Value> = counts
            .into_iter()
            .map(|((year, month), created)| {
                json!({ "month": format!("{year:04}-{month:02}"), "created": created })
            })
            .collect();
        db.put_analytics(ANALYTICS_MONTHLY, &Value::Array(monthly))?;

        let team: Vec<Value> = db
            .count_proposals_by_owner()?
            .into_iter()
            .map(|(name, proposals)| json!({ "name": name, "proposals": proposals }))
            .collect();
        db.put_analytics(ANALYTICS_TEAM, &Value::Array(team))?;

        debug!(window_months = self.window_months, "analytics recomputed");
        Ok(())
    }

    /// `(year, month)` pairs covered by the monthly series, oldest first,
    /// ending with the month of `now`.
    fn window(&self, now: DateTime<Utc>) -> Vec<(i32, u32)> {
        let current = now.year() * 12 + now.month0() as i32;
        let span = i32::try_from(self.window_months - 1).unwrap_or(0);
        let first = current.saturating_sub(span);
        (first..=current)
            .map(|index| (index.div_euclid(12), index.rem_euclid(12) as u32 + 1))
            .collect()
    }
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>, ServerError> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ServerError::Internal(format!("invalid month {year}-{month}")))
}

/// Every analytics key with its payload. Keys that were never written come
/// back as empty arrays. Any authenticated caller may read.
pub fn fetch(db: &Database, _actor: &User) -> Result<BTreeMap<String, Value>, ServerError> {
    let mut stored = db.get_analytics(&ANALYTICS_KEYS)?;
    for key in ANALYTICS_KEYS {
        stored.entry(key.to_string()).or_insert_with(|| json!([]));
    }
    Ok(stored)
}
