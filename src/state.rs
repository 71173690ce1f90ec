//! Application state for storefront

use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthService;
use crate::config::Config;
use crate::orders::OrderService;
use crate::razorpay::{PaymentGateway, RazorpayGateway};
use crate::store::{DocStore, FileBackend, StoreBackend};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Document store handle; reviews go straight through it
    pub store: DocStore,
    pub orders: OrderService,
    pub auth: AuthService,
}

impl AppState {
    /// Production wiring: file-backed store, live Razorpay client
    pub fn new(config: &Config) -> Self {
        let backend: Arc<dyn StoreBackend> = Arc::new(FileBackend::new(&config.data_file));
        let gateway: Arc<dyn PaymentGateway> = Arc::new(RazorpayGateway::new(
            config.razorpay_key_id.clone(),
            config.razorpay_key_secret.clone(),
            Duration::from_millis(config.gateway_timeout_ms),
        ));
        Self::with_parts(config, backend, gateway)
    }

    /// Explicit wiring; tests pass an in-memory backend and a stub gateway
    pub fn with_parts(
        config: &Config,
        backend: Arc<dyn StoreBackend>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let store = DocStore::new(backend);
        let orders = OrderService::new(
            store.clone(),
            gateway,
            config.razorpay_key_id.clone(),
            config.razorpay_key_secret.clone(),
        );
        let auth = AuthService::new(store.clone(), config.token_ttl_hours);
        Self {
            store,
            orders,
            auth,
        }
    }
}
