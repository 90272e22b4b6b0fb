//! Application state shared across handlers.

use std::sync::Arc;

use sugarloaf_commerce::db::{OrderRepository, ProductRepository, VariantRepository};
use sugarloaf_commerce::inventory::InventoryService;
use sugarloaf_commerce::orders::CheckoutService;
use sugarloaf_commerce::store::DocumentStore;

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// The store handle is injected, so the binary can run over Postgres while
/// tests run the same routers over the in-memory store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn DocumentStore>,
    products: ProductRepository,
    variants: VariantRepository,
    orders: OrderRepository,
    inventory: InventoryService,
    checkout: CheckoutService,
}

impl AppState {
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                products: ProductRepository::new(store.clone()),
                variants: VariantRepository::new(store.clone()),
                orders: OrderRepository::new(store.clone()),
                inventory: InventoryService::new(store.clone()),
                checkout: CheckoutService::new(store.clone()),
                store,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
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
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}
