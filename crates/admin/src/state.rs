//! Application state shared across handlers.

use std::sync::Arc;

use sugarloaf_commerce::db::{OrderRepository, ProductRepository, VariantRepository};
use sugarloaf_commerce::inventory::InventoryService;
use sugarloaf_commerce::orders::OrderStatusEngine;
use sugarloaf_commerce::store::DocumentStore;

use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn DocumentStore>,
    products: ProductRepository,
    variants: VariantRepository,
    orders: OrderRepository,
    inventory: InventoryService,
    status_engine: OrderStatusEngine,
}

impl AppState {
    #[must_use]
    pub fn new(config: AdminConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                products: ProductRepository::new(store.clone()),
                variants: VariantRepository::new(store.clone()),
                orders: OrderRepository::new(store.clone()),
                inventory: InventoryService::new(store.clone()),
                status_engine: OrderStatusEngine::new(store.clone()),
                store,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.inner.store
    }

    #[must_use]
    pub fn products(&self) -> &ProductRepository {
        &self.inner.products
    }

    #[must_use]
    pub fn variants(&self) -> &VariantRepository {
        &self.inner.variants
    }

    #[must_use]
    pub fn orders(&self) -> &OrderRepository {
        &self.inner.orders
    }

    #[must_use]
    pub fn inventory(&self) -> &InventoryService {
        &self.inner.inventory
    }

    #[must_use]
    pub fn status_engine(&self) -> &OrderStatusEngine {
        &self.inner.status_engine
    }
}
