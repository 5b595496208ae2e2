// Focused sub-traits for recording Prometheus metrics, grouped by concern.
//
// All methods take `&self` because the underlying implementation uses
// atomic operations (interior mutability via `prometheus-client`).
//
// Default implementations are no-ops, allowing test mocks to implement
// only the sub-traits relevant to the service under test. Metrics are a
// read-only side channel: nothing in the pipeline branches on them.

// ── Event intake metrics ───────────────────────────────────────────

pub trait EventMetrics: Send + Sync {
    /// Record a received metagame event with its state label.
    fn record_event(&self, _state: &str) {}

    /// Record an event dropped before dispatch (decode failure,
    /// missing fields, closed channel).
    fn record_event_dropped(&self, _reason: &str) {}

    /// Set the event-source timestamp of the most recent event.
    fn set_last_event_timestamp(&self, _timestamp: f64) {}
}

// ── Alert store metrics ────────────────────────────────────────────

pub trait StoreMetrics: Send + Sync {
    /// Record a failed store operation with an operation label.
    fn record_store_failure(&self, _operation: &str) {}

    /// Record a create rejected because the id was already active.
    fn record_duplicate_alert(&self) {}

    /// Set the number of alerts currently held in the store.
    fn set_active_alerts(&self, _count: u64) {}
}

// ── Broker publish metrics ─────────────────────────────────────────

pub trait PublishMetrics: Send + Sync {
    /// Record a confirmed publish.
    fn record_publish(&self) {}

    /// Record a failed publish attempt.
    fn record_publish_failure(&self) {}
}

// ── Purge metrics ──────────────────────────────────────────────────

pub trait PurgeMetrics: Send + Sync {
    /// Record a completed purge sweep and the records it removed.
    fn record_purge_sweep(&self, _removed: u64) {}
}

// ── Service lifecycle metrics ──────────────────────────────────────

pub trait ServiceMetrics: Send + Sync {
    /// Set the lifecycle state of a named service.
    /// State values: 0=starting, 1=running, 2=stopped.
    fn set_service_state(&self, _service: &str, _state: u8) {}
}

// ── Composite super-trait ──────────────────────────────────────────

/// Unified metrics port composing all concern-specific sub-traits.
///
/// Services accept `Arc<dyn MetricsPort>` for full access. The sub-traits
/// provide default no-op implementations so that test mocks only need to
/// override the methods they care about.
pub trait MetricsPort:
    EventMetrics + StoreMetrics + PublishMetrics + PurgeMetrics + ServiceMetrics
{
}

/// Blanket implementation: any type implementing all sub-traits automatically
/// implements `MetricsPort`.
impl<T> MetricsPort for T where
    T: EventMetrics + StoreMetrics + PublishMetrics + PurgeMetrics + ServiceMetrics
{
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;
    impl EventMetrics for Bare {}
    impl StoreMetrics for Bare {}
    impl PublishMetrics for Bare {}
    impl PurgeMetrics for Bare {}
    impl ServiceMetrics for Bare {}

    #[test]
    fn blanket_impl_composes_sub_traits() {
        fn assert_metrics_port<T: MetricsPort>(_t: &T) {}
        assert_metrics_port(&Bare);
    }

    #[test]
    fn default_methods_are_no_ops() {
        let bare = Bare;
        bare.record_event("started");
        bare.record_event_dropped("decode");
        bare.set_last_event_timestamp(1_700_000_000.0);
        bare.record_store_failure("create");
        bare.record_duplicate_alert();
        bare.set_active_alerts(3);
        bare.record_publish();
        bare.record_publish_failure();
        bare.record_purge_sweep(45);
        bare.set_service_state("store", 1);
    }
}
