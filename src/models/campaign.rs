//! Campaign counter rows and the singleton global total.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-campaign counter row, keyed by the case-sensitive campaign name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CampaignCounter {
    pub name: String,
    pub count: i64,
    pub last_increment: Option<DateTime<Utc>>,
}

/// The singleton aggregate across all campaigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GlobalTotal {
    pub total_count: i64,
    pub last_increment: Option<DateTime<Utc>>,
}

impl GlobalTotal {
    /// The state after a full reset.
    pub const fn zero() -> Self {
        Self {
            total_count: 0,
            last_increment: None,
        }
    }
}

impl Default for GlobalTotal {
    fn default() -> Self {
        Self::zero()
    }
}

/// Result of one atomic increment, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct IncrementOutcome {
    pub campaign: String,
    pub campaign_count: i64,
    pub total_count: i64,
    pub last_increment: DateTime<Utc>,
}

/// Validated campaign identifier.
///
/// Absent or empty input resolves to [`CampaignName::DEFAULT`]; anything
/// else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CampaignName(String);

impl CampaignName {
    pub const DEFAULT: &'static str = "default";

    pub fn new(raw: Option<&str>) -> Self {
        match raw {
            Some(name) if !name.is_empty() => Self(name.to_string()),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CampaignName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for CampaignName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
