//! Dashboard data loading and relative-time display buckets.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::campaign::{CampaignCounter, GlobalTotal};
use crate::store::CounterStore;

/// Everything the dashboard renders.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub total: GlobalTotal,
    pub campaigns: Vec<CampaignCounter>,
}

/// Fetch the total and the campaign breakdown in parallel.
pub async fn load(store: &dyn CounterStore) -> Result<DashboardData, AppError> {
    let (total, campaigns) = tokio::try_join!(store.global_total(), store.campaigns())?;
    Ok(DashboardData { total, campaigns })
}

/// How long ago an increment happened, coarsened for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBucket {
    JustNow,
    Minutes(i64),
    Hours(i64),
    Date(NaiveDate),
}

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 1440;

impl TimeBucket {
    /// Bucket `at` relative to `now`. Timestamps in the future count as
    /// just now.
    pub fn between(at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let minutes = (now - at).num_minutes();
        if minutes < 1 {
            TimeBucket::JustNow
        } else if minutes < MINUTES_PER_HOUR {
            TimeBucket::Minutes(minutes)
        } else if minutes < MINUTES_PER_DAY {
            TimeBucket::Hours(minutes / MINUTES_PER_HOUR)
        } else {
            TimeBucket::Date(at.date_naive())
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBucket::JustNow => f.write_str("Just now"),
            TimeBucket::Minutes(m) => write!(f, "{m}m ago"),
            TimeBucket::Hours(h) => write!(f, "{h}h ago"),
            TimeBucket::Date(d) => write!(f, "{}", d.format("%-m/%-d/%Y")),
        }
    }
}

/// Display text for an optional timestamp, `never` when it is absent.
pub fn describe(at: Option<DateTime<Utc>>, now: DateTime<Utc>, never: &str) -> String {
    match at {
        Some(at) => TimeBucket::between(at, now).to_string(),
        None => never.to_string(),
    }
}
