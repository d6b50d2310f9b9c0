//! Background retention sweep.
//!
//! Expiry is otherwise lazy (rows are removed when a validation touches
//! them), so the sweep exists to stop abandoned sessions, stale reset tokens
//! and ancient activity rows from accumulating forever.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::state::SharedState;

pub fn spawn(shared: Arc<SharedState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let (interval_minutes, retention_days) = {
            let config = shared.config.read().await;
            (
                config.security.cleanup_interval_minutes,
                config.security.activity_retention_days,
            )
        };

        if interval_minutes == 0 {
            info!("Retention sweep disabled");
            return;
        }

        let mut ticker = tokio::time::interval(Duration::from_secs(interval_minutes * 60));
        // First tick fires immediately; skip it so startup stays quiet
        ticker.tick().await;

        info!("Retention sweep running every {interval_minutes} minutes");

        loop {
            ticker.tick().await;
            run_sweep(&shared, retention_days).await;
        }
    })
}

async fn run_sweep(shared: &SharedState, retention_days: i64) {
    let now = Utc::now();
    let now_str = now.to_rfc3339();

    match shared.store.delete_expired_sessions(&now_str).await {
        Ok(0) => {}
        Ok(n) => info!("Swept {n} expired sessions"),
        Err(e) => warn!("Session sweep failed: {e}"),
    }

    match shared.store.delete_expired_reset_tokens(&now_str).await {
        Ok(0) => {}
        Ok(n) => info!("Swept {n} expired reset tokens"),
        Err(e) => warn!("Reset token sweep failed: {e}"),
    }

    let cutoff = (now - chrono::Duration::days(retention_days)).to_rfc3339();
    match shared.store.prune_activity(&cutoff).await {
        Ok(0) => debug!("No activity rows past retention"),
        Ok(n) => info!("Pruned {n} activity rows older than {retention_days} days"),
        Err(e) => warn!("Activity prune failed: {e}"),
    }
}
