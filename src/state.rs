//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::VisitUseCase;
use crate::domain::repositories::VisitRepository;
use crate::infrastructure::cache::CounterCache;

/// Dependencies selected once at startup.
///
/// `visits` is either the cache-aside service or its dev mode counterpart; `store` and
/// `cache` are the same backends it was built with and are only used for health checks.
#[derive(Clone)]
pub struct AppState {
    pub visits: Arc<dyn VisitUseCase>,
    pub store: Arc<dyn VisitRepository>,
    pub cache: Arc<dyn CounterCache>,
    pub behind_proxy: bool,
    pub dev_mode: bool,
}

impl AppState {
    pub fn new(
        visits: Arc<dyn VisitUseCase>,
        store: Arc<dyn VisitRepository>,
        cache: Arc<dyn CounterCache>,
    ) -> Self {
        Self {
            visits,
            store,
            cache,
            behind_proxy: false,
            dev_mode: false,
        }
    }

    /// Trusts `X-Forwarded-For` / `X-Real-IP` when resolving the client address.
    pub fn with_behind_proxy(mut self, behind_proxy: bool) -> Self {
        self.behind_proxy = behind_proxy;
        self
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }
}
