use std::net::SocketAddr;
use std::sync::Arc;

use campaign_counter::config::{AppConfig, ConfigError, ServerConfig, STORE_URL_VAR};
use campaign_counter::store::PgCounterStore;
use campaign_counter::{db, routes, AppState};
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_counter=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Configuration is validated once here; an invalid configuration keeps
    // the server up and every counter request reports it.
    let server = ServerConfig::from_env();
    let state = match AppConfig::from_env() {
        Ok(config) => connect_store(&config).await,
        Err(e) => unconfigured(e),
    };

    let addr: SocketAddr = format!("{}:{}", server.host, server.port).parse()?;
    tracing::info!(host = %addr, "Starting campaign counter server");

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn unconfigured(err: ConfigError) -> AppState {
    tracing::error!(error = %err, "Counter store is not configured");
    AppState::unconfigured(err)
}

/// Build the Postgres-backed state. Connections are opened on first use, so
/// only a rejected connection string keeps the store unconfigured.
async fn connect_store(config: &AppConfig) -> AppState {
    let pool = match db::create_lazy_pool(
        &config.store_url,
        &config.store_access_key,
        config.store_max_connections,
    ) {
        Ok(pool) => pool,
        Err(e) => {
            return unconfigured(ConfigError::Invalid {
                name: STORE_URL_VAR.to_string(),
                reason: e.to_string(),
            })
        }
    };

    if config.run_migrations {
        match db::run_migrations(&pool).await {
            Ok(()) => tracing::info!("Migrations applied"),
            Err(e) => tracing::error!(error = %e, "Failed to apply migrations"),
        }
    }

    AppState::from_shared(Arc::new(PgCounterStore::new(pool)))
}
