//! Seed script for development — records sample increments in a fresh store.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `STORE_URL` and `STORE_ACCESS_KEY` environment variables (reads .env).

use campaign_counter::config::AppConfig;
use campaign_counter::db;
use campaign_counter::models::campaign::CampaignName;
use campaign_counter::store::{CounterStore, PgCounterStore};

const SAMPLE_CAMPAIGNS: &[(&str, u32)] = &[
    ("spring-sale", 12),
    ("newsletter", 7),
    ("partner-referral", 3),
    ("default", 1),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let pool = db::create_pool(
        &config.store_url,
        &config.store_access_key,
        config.store_max_connections,
    )
    .await?;

    // Run migrations first
    db::run_migrations(&pool).await?;

    println!("=== Campaign Counter Seed Script ===");

    let store = PgCounterStore::new(pool);

    let existing = store.global_total().await?.total_count;
    if existing > 0 {
        println!("[skip] Store already holds {existing} increments");
        return Ok(());
    }

    for (name, times) in SAMPLE_CAMPAIGNS {
        let campaign = CampaignName::new(Some(*name));
        for _ in 0..*times {
            store.increment(&campaign).await?;
        }
        println!("[done] {name}: {times} increments");
    }

    let snapshot = store.snapshot().await?;
    println!(
        "\n=== Seed complete! total={} campaigns={} ===",
        snapshot.total.total_count,
        snapshot.campaigns.len()
    );

    Ok(())
}
