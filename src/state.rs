use std::sync::Arc;

use crate::cart_store::CartSessions;
use crate::config::Config;
use crate::events::EventPublisher;
use crate::store::DataService;

/// Shared handler state: the data service, session carts and event bus.
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<dyn DataService>,
    pub carts: CartSessions,
    pub events: EventPublisher,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(data: Arc<dyn DataService>, events: EventPublisher, config: Config) -> Self {
        Self { data, carts: CartSessions::new(), events, config: Arc::new(config) }
    }

    pub fn currency(&self) -> &str { &self.config.currency }
}
