use std::sync::Arc;

use crate::booking::BookingService;
use crate::config::Config;
use crate::notify::Mailer;
use crate::store::BookingStore;

/// Shared handler state. Cloned per request; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn BookingStore>,
    pub bookings: BookingService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn BookingStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config: Arc::new(config),
            bookings: BookingService::new(store.clone(), mailer),
            store,
        }
    }
}
