//! Administrative resets and global-total consistency.
//!
//! Resets keep `total_count` equal to the sum of the remaining campaign
//! counts. A per-campaign reset re-sums instead of decrementing, so any
//! drift accumulated earlier is repaired at the same time.

use crate::errors::AppError;
use crate::models::reset::{ConsistencyReport, ResetOutcome, ResetScope};
use crate::store::CounterStore;

/// Apply a reset to the store.
pub async fn reset(store: &dyn CounterStore, scope: &ResetScope) -> Result<ResetOutcome, AppError> {
    let outcome = match scope {
        ResetScope::All => {
            let deleted = store.reset_all().await?;
            ResetOutcome {
                scope: scope.clone(),
                campaigns_deleted: deleted,
                total_count: 0,
            }
        }
        ResetScope::Campaign(name) => {
            let reset = store.reset_campaign(name).await?;
            if reset.deleted == 0 {
                tracing::warn!(campaign = %name, "Reset requested for unknown campaign");
            }
            ResetOutcome {
                scope: scope.clone(),
                campaigns_deleted: reset.deleted,
                total_count: reset.total_count,
            }
        }
    };

    tracing::info!(
        scope = scope.as_str(),
        campaigns_deleted = outcome.campaigns_deleted,
        total_count = outcome.total_count,
        "Counters reset"
    );
    Ok(outcome)
}

/// Compare the stored total with the campaign sum from one snapshot.
pub async fn consistency(store: &dyn CounterStore) -> Result<ConsistencyReport, AppError> {
    let snapshot = store.snapshot().await?;
    let report = ConsistencyReport::from_snapshot(&snapshot.total, &snapshot.campaigns);
    if !report.consistent {
        tracing::warn!(
            total_count = report.total_count,
            campaign_sum = report.campaign_sum,
            drift = report.drift(),
            "Global total drifted from campaign sum"
        );
    }
    Ok(report)
}

/// Rewrite the total from the campaign sum and report the result.
pub async fn recompute(store: &dyn CounterStore) -> Result<ConsistencyReport, AppError> {
    let total_count = store.recompute_total().await?;
    tracing::info!(total_count, "Global total recomputed");
    consistency(store).await
}
