use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::store::Store;

/// Everything a handler needs, registered once as `web::Data<AppState>`.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenKeys,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        Self {
            tokens: TokenKeys::from_config(&config),
            store,
            config,
        }
    }

    /// Session cookies carry `Secure` everywhere except development.
    pub fn secure_cookies(&self) -> bool {
        !self.config.is_development()
    }
}
