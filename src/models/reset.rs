//! Reset scopes and consistency reporting between the global total and
//! the per-campaign counters.

use serde::{Serialize, Serializer};

use super::campaign::{CampaignCounter, CampaignName, GlobalTotal};

/// Target of an administrative reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetScope {
    /// Every campaign row plus the global total and its timestamp.
    All,
    /// A single campaign row; the total is recomputed from what remains.
    Campaign(CampaignName),
}

impl ResetScope {
    /// Keyword selecting a full reset. A campaign literally named `all`
    /// cannot be reset on its own.
    pub const ALL: &'static str = "all";

    /// Parse the `campaign` parameter of a reset request.
    ///
    /// Returns `None` for an absent or empty value: there is nothing to reset.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw {
            None | Some("") => None,
            Some(Self::ALL) => Some(Self::All),
            Some(name) => Some(Self::Campaign(CampaignName::new(Some(name)))),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ResetScope::All => Self::ALL,
            ResetScope::Campaign(name) => name.as_str(),
        }
    }
}

impl Serialize for ResetScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// What a reset changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    pub scope: ResetScope,
    pub campaigns_deleted: u64,
    pub total_count: i64,
}

/// Comparison of the stored global total against the campaign sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub total_count: i64,
    pub campaign_sum: i64,
    pub campaign_count: usize,
    pub consistent: bool,
}

impl ConsistencyReport {
    pub fn from_snapshot(total: &GlobalTotal, campaigns: &[CampaignCounter]) -> Self {
        let campaign_sum = campaign_sum(campaigns);
        Self {
            total_count: total.total_count,
            campaign_sum,
            campaign_count: campaigns.len(),
            consistent: total.total_count == campaign_sum,
        }
    }

    /// Signed difference `total_count - campaign_sum`.
    pub fn drift(&self) -> i64 {
        self.total_count - self.campaign_sum
    }
}

/// Sum of `count` over the given campaign rows.
pub fn campaign_sum(campaigns: &[CampaignCounter]) -> i64 {
    campaigns.iter().map(|c| c.count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(name: &str, count: i64) -> CampaignCounter {
        CampaignCounter {
            name: name.to_string(),
            count,
            last_increment: None,
        }
    }

    #[test]
    fn parse_all_keyword() {
        assert_eq!(ResetScope::parse(Some("all")), Some(ResetScope::All));
    }

    #[test]
    fn parse_named_campaign() {
        assert_eq!(
            ResetScope::parse(Some("promoA")),
            Some(ResetScope::Campaign(CampaignName::new(Some("promoA"))))
        );
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!(matches!(ResetScope::parse(Some("ALL")), Some(ResetScope::Campaign(_))));
    }

    #[test]
    fn parse_missing_or_empty_is_nothing() {
        assert_eq!(ResetScope::parse(None), None);
        assert_eq!(ResetScope::parse(Some("")), None);
    }

    #[test]
    fn consistent_snapshot() {
        let total = GlobalTotal {
            total_count: 3,
            last_increment: None,
        };
        let report =
            ConsistencyReport::from_snapshot(&total, &[counter("promoA", 2), counter("promoB", 1)]);
        assert!(report.consistent);
        assert_eq!(report.campaign_sum, 3);
        assert_eq!(report.campaign_count, 2);
        assert_eq!(report.drift(), 0);
    }

    #[test]
    fn drifted_snapshot() {
        let total = GlobalTotal {
            total_count: 5,
            last_increment: None,
        };
        let report = ConsistencyReport::from_snapshot(&total, &[counter("promoB", 1)]);
        assert!(!report.consistent);
        assert_eq!(report.drift(), 4);
    }

    #[test]
    fn empty_snapshot_sums_to_zero() {
        let report = ConsistencyReport::from_snapshot(&GlobalTotal::zero(), &[]);
        assert!(report.consistent);
        assert_eq!(report.campaign_sum, 0);
    }

    #[test]
    fn reset_outcome_serializes_scope_as_string() {
        let outcome = ResetOutcome {
            scope: ResetScope::All,
            campaigns_deleted: 2,
            total_count: 0,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["scope"], "all");
        assert_eq!(json["campaigns_deleted"], 2);
    }
}
