//! Keeping the cached counter in step with the store.
//!
//! [`warm_cache`] seeds the counter once at startup. Increments after a store write
//! are best-effort, so the cached count can drift when an increment is lost. The TTL
//! bounds that drift on its own; [`run_resync_worker`] tightens it for deployments
//! with a long TTL or heavy cache fault rates.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::application::services::VisitService;

/// Seeds the cached counter from the store before the server accepts requests.
///
/// A failure is logged and otherwise ignored; the first read then recounts.
pub async fn warm_cache(service: &VisitService) {
    match service.resync_cache().await {
        Ok(count) => info!(count, "Cache warmed from store"),
        Err(e) => warn!(error = %e, "Cache warm-up failed, first read will recount"),
    }
}

/// Runs the resync loop forever, once per `interval`.
///
/// The first resync happens one full interval after start. Failures are logged and
/// retried on the next tick.
pub async fn run_resync_worker(service: Arc<VisitService>, interval: Duration) {
    info!("Cache resync worker started (every {:?})", interval);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        ticker.tick().await;

        match service.resync_cache().await {
            Ok(count) => debug!(count, "Cache resynced from store"),
            Err(e) => warn!(error = %e, "Cache resync failed"),
        }
    }
}
