//! Process-local counter store.
//!
//! One mutex guards the campaign map and the total together, so each
//! operation is atomic with respect to every other.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::{CampaignReset, CounterStore, Snapshot, StoreError, StoreResult};
use crate::models::campaign::{CampaignCounter, CampaignName, GlobalTotal, IncrementOutcome};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Default)]
struct State {
    campaigns: HashMap<String, CampaignCounter>,
    total: GlobalTotal,
}

impl State {
    fn sorted_campaigns(&self) -> Vec<CampaignCounter> {
        let mut rows: Vec<CampaignCounter> = self.campaigns.values().cloned().collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        rows
    }

    fn campaign_sum(&self) -> i64 {
        self.campaigns.values().map(|c| c.count).sum()
    }
}

pub struct MemoryCounterStore {
    state: Mutex<State>,
    clock: Clock,
    available: AtomicBool,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    /// Store whose timestamps come from `clock` instead of the system time.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
            available: AtomicBool::new(true),
        }
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`]
    /// (or succeed again).
    #[doc(hidden)]
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Overwrite the stored total without touching campaigns.
    #[doc(hidden)]
    pub fn force_total(&self, total_count: i64) {
        self.state.lock().total.total_count = total_count;
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store disabled".to_string()))
        }
    }
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCounterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCounterStore")
            .field("state", &*self.state.lock())
            .field("available", &self.available.load(Ordering::SeqCst))
            .finish()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, campaign: &CampaignName) -> StoreResult<IncrementOutcome> {
        self.ensure_available()?;
        let mut state = self.state.lock();
        // Read under the lock so timestamps follow commit order.
        let now = (self.clock)();

        let row = state
            .campaigns
            .entry(campaign.as_str().to_string())
            .or_insert_with(|| CampaignCounter {
                name: campaign.as_str().to_string(),
                count: 0,
                last_increment: None,
            });
        row.count += 1;
        row.last_increment = Some(now);
        let campaign_count = row.count;

        state.total.total_count += 1;
        state.total.last_increment = Some(now);

        Ok(IncrementOutcome {
            campaign: campaign.as_str().to_string(),
            campaign_count,
            total_count: state.total.total_count,
            last_increment: now,
        })
    }

    async fn global_total(&self) -> StoreResult<GlobalTotal> {
        self.ensure_available()?;
        Ok(self.state.lock().total.clone())
    }

    async fn campaigns(&self) -> StoreResult<Vec<CampaignCounter>> {
        self.ensure_available()?;
        Ok(self.state.lock().sorted_campaigns())
    }

    async fn snapshot(&self) -> StoreResult<Snapshot> {
        self.ensure_available()?;
        let state = self.state.lock();
        Ok(Snapshot {
            total: state.total.clone(),
            campaigns: state.sorted_campaigns(),
        })
    }

    async fn reset_all(&self) -> StoreResult<u64> {
        self.ensure_available()?;
        let mut state = self.state.lock();
        let deleted = state.campaigns.len() as u64;
        state.campaigns.clear();
        state.total = GlobalTotal::zero();
        Ok(deleted)
    }

    async fn reset_campaign(&self, campaign: &CampaignName) -> StoreResult<CampaignReset> {
        self.ensure_available()?;
        let mut state = self.state.lock();
        let deleted = u64::from(state.campaigns.remove(campaign.as_str()).is_some());
        let total_count = state.campaign_sum();
        state.total.total_count = total_count;
        Ok(CampaignReset {
            deleted,
            total_count,
        })
    }

    async fn recompute_total(&self) -> StoreResult<i64> {
        self.ensure_available()?;
        let mut state = self.state.lock();
        let total_count = state.campaign_sum();
        state.total.total_count = total_count;
        Ok(total_count)
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.ensure_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::AtomicI64;

    fn name(raw: &str) -> CampaignName {
        CampaignName::new(Some(raw))
    }

    fn fixed_clock() -> Clock {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        Arc::new(move || at)
    }

    #[tokio::test]
    async fn first_increment_creates_row() {
        let store = MemoryCounterStore::with_clock(fixed_clock());
        let outcome = store.increment(&name("promoA")).await.unwrap();
        assert_eq!(outcome.campaign, "promoA");
        assert_eq!(outcome.campaign_count, 1);
        assert_eq!(outcome.total_count, 1);

        let rows = store.campaigns().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].last_increment, Some((fixed_clock())()));
    }

    #[tokio::test]
    async fn campaigns_sorted_by_count_then_name() {
        let store = MemoryCounterStore::new();
        for campaign in ["b", "a", "c", "c"] {
            store.increment(&name(campaign)).await.unwrap();
        }
        let names: Vec<String> = store
            .campaigns()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn reset_campaign_keeps_total_timestamp() {
        let store = MemoryCounterStore::with_clock(fixed_clock());
        store.increment(&name("promoA")).await.unwrap();
        store.increment(&name("promoB")).await.unwrap();

        let reset = store.reset_campaign(&name("promoA")).await.unwrap();
        assert_eq!(reset.deleted, 1);
        assert_eq!(reset.total_count, 1);

        let total = store.global_total().await.unwrap();
        assert_eq!(total.total_count, 1);
        assert!(total.last_increment.is_some());
    }

    #[tokio::test]
    async fn reset_all_clears_everything() {
        let store = MemoryCounterStore::new();
        store.increment(&name("promoA")).await.unwrap();
        assert_eq!(store.reset_all().await.unwrap(), 1);
        assert_eq!(store.global_total().await.unwrap(), GlobalTotal::zero());
        assert!(store.campaigns().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn recompute_repairs_drift() {
        let store = MemoryCounterStore::new();
        store.increment(&name("promoA")).await.unwrap();
        store.force_total(10);
        assert_eq!(store.recompute_total().await.unwrap(), 1);
        assert_eq!(store.global_total().await.unwrap().total_count, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_keep_latest_timestamp() {
        let base = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        let ticks = Arc::new(AtomicI64::new(0));
        let clock: Clock = {
            let ticks = ticks.clone();
            Arc::new(move || base + Duration::seconds(ticks.fetch_add(1, Ordering::SeqCst) + 1))
        };
        let store = Arc::new(MemoryCounterStore::with_clock(clock));

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.increment(&name(if i % 2 == 0 { "even" } else { "odd" })).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let latest = base + Duration::seconds(ticks.load(Ordering::SeqCst));
        assert_eq!(store.global_total().await.unwrap().last_increment, Some(latest));
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryCounterStore::new();
        store.set_available(false);
        assert!(matches!(
            store.increment(&name("promoA")).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.health_check().await.is_err());

        store.set_available(true);
        assert!(store.health_check().await.is_ok());
    }
}
