//! PostgreSQL counter store.
//!
//! Increments go through the `increment_campaign` stored function so the
//! campaign upsert and the total update commit together. Resets run in a
//! transaction that locks the totals row before touching campaigns, the
//! same lock order the function uses.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::{CampaignReset, CounterStore, Snapshot, StoreResult};
use crate::models::campaign::{CampaignCounter, CampaignName, GlobalTotal, IncrementOutcome};

#[derive(Debug, Clone)]
pub struct PgCounterStore {
    pool: PgPool,
}

impl PgCounterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Lock the singleton totals row for the rest of the transaction.
async fn lock_totals(tx: &mut Transaction<'_, Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT id FROM totals WHERE id = 1 FOR UPDATE")
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Sum of all campaign counts as seen by the transaction.
async fn sum_campaigns(tx: &mut Transaction<'_, Postgres>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(count), 0)::BIGINT FROM campaigns")
        .fetch_one(&mut **tx)
        .await
}

async fn write_total(tx: &mut Transaction<'_, Postgres>, total: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE totals SET total_count = $1, updated_at = now() WHERE id = 1")
        .bind(total)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

const SELECT_TOTAL: &str = "SELECT total_count, last_increment FROM totals WHERE id = 1";

const SELECT_CAMPAIGNS: &str = r#"
    SELECT name, count, last_increment
    FROM campaigns
    ORDER BY count DESC, name ASC
"#;

#[async_trait]
impl CounterStore for PgCounterStore {
    async fn increment(&self, campaign: &CampaignName) -> StoreResult<IncrementOutcome> {
        let outcome = sqlx::query_as::<_, IncrementOutcome>(
            "SELECT campaign, campaign_count, total_count, last_increment FROM increment_campaign($1)",
        )
        .bind(campaign.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(outcome)
    }

    async fn global_total(&self) -> StoreResult<GlobalTotal> {
        let total = sqlx::query_as::<_, GlobalTotal>(SELECT_TOTAL)
            .fetch_optional(&self.pool)
            .await?;
        Ok(total.unwrap_or_default())
    }

    async fn campaigns(&self) -> StoreResult<Vec<CampaignCounter>> {
        let rows = sqlx::query_as::<_, CampaignCounter>(SELECT_CAMPAIGNS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn snapshot(&self) -> StoreResult<Snapshot> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total = sqlx::query_as::<_, GlobalTotal>(SELECT_TOTAL)
            .fetch_optional(&mut *tx)
            .await?
            .unwrap_or_default();
        let campaigns = sqlx::query_as::<_, CampaignCounter>(SELECT_CAMPAIGNS)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Snapshot { total, campaigns })
    }

    async fn reset_all(&self) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        lock_totals(&mut tx).await?;

        let deleted = sqlx::query("DELETE FROM campaigns")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query(
            "UPDATE totals SET total_count = 0, last_increment = NULL, updated_at = now() WHERE id = 1",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(deleted)
    }

    async fn reset_campaign(&self, campaign: &CampaignName) -> StoreResult<CampaignReset> {
        let mut tx = self.pool.begin().await?;
        lock_totals(&mut tx).await?;

        let deleted = sqlx::query("DELETE FROM campaigns WHERE name = $1")
            .bind(campaign.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        // Re-sum rather than decrement so any earlier drift is repaired too.
        let total_count = sum_campaigns(&mut tx).await?;
        write_total(&mut tx, total_count).await?;

        tx.commit().await?;
        Ok(CampaignReset {
            deleted,
            total_count,
        })
    }

    async fn recompute_total(&self) -> StoreResult<i64> {
        let mut tx = self.pool.begin().await?;
        lock_totals(&mut tx).await?;
        let total_count = sum_campaigns(&mut tx).await?;
        write_total(&mut tx, total_count).await?;
        tx.commit().await?;
        Ok(total_count)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
