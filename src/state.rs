// Shared server state handed to every axum handler.

use crate::config::HubConfig;
use aihub_core::{HubError, HubResult, HubStore};
use log::info;
use std::sync::Arc;

pub struct AppState {
    pub store: HubStore,
    pub config: HubConfig,
}

impl AppState {
    pub fn new(store: HubStore, config: HubConfig) -> Arc<Self> {
        Arc::new(AppState { store, config })
    }

    /// Open the configured database and make sure the bootstrap Owner exists.
    pub fn open(config: HubConfig) -> HubResult<Arc<Self>> {
        let store = HubStore::open(&config.database_path())?;
        bootstrap_owner(&store, &config)?;
        Ok(Self::new(store, config))
    }

    /// Run a store operation on tokio's blocking pool. SQLite calls hold the
    /// connection mutex and do file I/O, so they stay off the async workers.
    pub async fn with_store<T, F>(self: &Arc<Self>, f: F) -> HubResult<T>
    where
        F: FnOnce(&HubStore) -> HubResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || f(&state.store))
            .await
            .map_err(|e| HubError::Other(format!("store task failed: {e}")))?
    }
}

pub fn bootstrap_owner(store: &HubStore, config: &HubConfig) -> HubResult<()> {
    let Some(email) = config.bootstrap_owner_email.as_deref() else {
        return Ok(());
    };
    let name = config.bootstrap_owner_name.as_deref().unwrap_or("Owner");
    let owner = store.ensure_owner(email, name)?;
    info!("[server] Bootstrap Owner: {} ({})", owner.email, owner.id);
    Ok(())
}
