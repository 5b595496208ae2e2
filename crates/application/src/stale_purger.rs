use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use domain::alert::error::AlertStoreError;
use domain::alert::query::AlertQuery;
use ports::secondary::alert_store::AlertStore;
use ports::secondary::metrics_port::MetricsPort;
use tokio_util::sync::CancellationToken;

/// Background sweeper that removes alert records older than the
/// retention window.
///
/// Recovers from missed `ended`/`cancelled` notifications (upstream
/// disconnect during an alert's active window) that would otherwise
/// leave orphaned records in the store forever.
pub struct StalePurger {
    store: Arc<dyn AlertStore>,
    metrics: Arc<dyn MetricsPort>,
    retention: Duration,
    batch_size: usize,
}

impl StalePurger {
    pub fn new(
        store: Arc<dyn AlertStore>,
        metrics: Arc<dyn MetricsPort>,
        retention: Duration,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            metrics,
            retention,
            // A zero batch would never terminate the sweep loop.
            batch_size: batch_size.max(1),
        }
    }

    /// Run one sweep against the current wall clock.
    pub async fn purge(&self) -> Result<u64, AlertStoreError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        self.purge_older_than(now - self.retention.as_secs_f64()).await
    }

    /// Remove records with a timestamp strictly below `cutoff`, in
    /// batches, until a short batch signals the end of the backlog.
    ///
    /// A removal failure ends the sweep early and returns the partial
    /// count; a read failure is propagated to the caller.
    pub async fn purge_older_than(&self, cutoff: f64) -> Result<u64, AlertStoreError> {
        let mut removed: u64 = 0;

        'sweep: loop {
            let batch = self
                .store
                .read_many(&AlertQuery::stale(cutoff, self.batch_size))
                .await?;
            let batch_len = batch.len();

            for record in &batch {
                match self.store.remove(&record.id).await {
                    Ok(n) => removed += n,
                    Err(e) => {
                        tracing::warn!(
                            event_id = %record.id,
                            error = %e,
                            "stale record removal failed, ending sweep"
                        );
                        break 'sweep;
                    }
                }
            }

            if batch_len < self.batch_size {
                break;
            }
        }

        self.metrics.record_purge_sweep(removed);
        if removed > 0 {
            tracing::info!(removed, cutoff, "stale alert records purged");
        }
        Ok(removed)
    }

    /// Run the purge loop: one sweep immediately, then one per `period`.
    pub async fn run(self, period: Duration, cancel_token: CancellationToken) {
        // Initial sweep clears any backlog left from a previous run
        if let Err(e) = self.purge().await {
            tracing::warn!(error = %e, "startup purge sweep failed");
        }

        let mut interval = tokio::time::interval(period);
        interval.tick().await; // skip the first immediate tick (already swept above)
        loop {
            tokio::select! {
                () = cancel_token.cancelled() => break,
                _ = interval.tick() => {}
            }
            if let Err(e) = self.purge().await {
                tracing::warn!(error = %e, "purge sweep failed");
            }
        }

        tracing::info!("stale purger stopped");
    }
}
