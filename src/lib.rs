pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod views;

use config::ConfigError;
use errors::AppError;
use store::{CounterStore, SharedStore};

/// Counter store, or the reason it could not be configured at startup.
#[derive(Debug, Clone)]
pub enum StoreHandle {
    Ready(SharedStore),
    Unconfigured(ConfigError),
}

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: StoreHandle,
}

impl AppState {
    pub fn from_shared(store: SharedStore) -> Self {
        Self {
            store: StoreHandle::Ready(store),
        }
    }

    /// State for a process whose configuration failed validation. Every
    /// store-backed request answers with the configuration error.
    pub fn unconfigured(err: ConfigError) -> Self {
        Self {
            store: StoreHandle::Unconfigured(err),
        }
    }

    /// The configured store, or the startup configuration error.
    pub fn store(&self) -> Result<&dyn CounterStore, AppError> {
        match &self.store {
            StoreHandle::Ready(store) => Ok(store.as_ref()),
            StoreHandle::Unconfigured(err) => Err(AppError::Configuration(err.clone())),
        }
    }
}
