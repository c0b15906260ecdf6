use axum::extract::FromRef;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;
use crate::catalog::{CatalogIndex, PricingEngine};
use crate::catalog_store::CatalogStore;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;
pub type GuardedCatalogIndex = Arc<CatalogIndex>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_store: GuardedCatalogStore,
    pub catalog_index: GuardedCatalogIndex,
}

impl ServerState {
    pub fn new(config: ServerConfig, catalog_store: GuardedCatalogStore) -> ServerState {
        let catalog_index = Arc::new(CatalogIndex::new(PricingEngine::new(
            config.pricing.clone(),
        )));
        ServerState {
            config,
            start_time: Instant::now(),
            catalog_store,
            catalog_index,
        }
    }

    /// A fresh random source for one request.
    pub fn request_rng(&self) -> StdRng {
        match self.config.pricing_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}
