//! Persistence seam for campaign counters and the global total.
//!
//! Every mutation is a single atomic operation inside the store. Callers
//! never read a count and write it back themselves.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::campaign::{CampaignCounter, CampaignName, GlobalTotal, IncrementOutcome};

pub mod memory;
pub mod postgres;

pub use memory::MemoryCounterStore;
pub use postgres::PgCounterStore;

/// Failure reported by a counter store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Rows removed by a per-campaign reset and the recomputed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignReset {
    pub deleted: u64,
    pub total_count: i64,
}

/// Global total and all campaign rows read at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub total: GlobalTotal,
    pub campaigns: Vec<CampaignCounter>,
}

/// Counter persistence shared by every request handler.
#[async_trait]
pub trait CounterStore: fmt::Debug + Send + Sync {
    /// Add one event to `campaign` and to the global total, creating the
    /// campaign row on first use.
    async fn increment(&self, campaign: &CampaignName) -> StoreResult<IncrementOutcome>;

    /// Current global total; a missing singleton reads as zero.
    async fn global_total(&self) -> StoreResult<GlobalTotal>;

    /// All campaign rows ordered by count descending, then name.
    async fn campaigns(&self) -> StoreResult<Vec<CampaignCounter>>;

    /// Total and campaigns read consistently with each other.
    async fn snapshot(&self) -> StoreResult<Snapshot>;

    /// Delete every campaign and zero the total, clearing its timestamp.
    /// Returns the number of campaign rows deleted.
    async fn reset_all(&self) -> StoreResult<u64>;

    /// Delete one campaign and set the total to the sum of what remains.
    /// The total's timestamp is left untouched.
    async fn reset_campaign(&self, campaign: &CampaignName) -> StoreResult<CampaignReset>;

    /// Rewrite the total as the current campaign sum.
    async fn recompute_total(&self) -> StoreResult<i64>;

    /// Cheap connectivity probe.
    async fn health_check(&self) -> StoreResult<()>;
}

pub type SharedStore = Arc<dyn CounterStore>;
