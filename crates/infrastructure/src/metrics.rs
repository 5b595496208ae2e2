use ports::secondary::metrics_port::{
    EventMetrics, PublishMetrics, PurgeMetrics, ServiceMetrics, StoreMetrics,
};
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::atomic::AtomicU64;

// ── Service lifecycle states ───────────────────────────────────────

pub const SERVICE_STARTING: u8 = 0;
pub const SERVICE_RUNNING: u8 = 1;
pub const SERVICE_STOPPED: u8 = 2;

// ── Label types ─────────────────────────────────────────────────────

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct StateLabels {
    pub state: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ReasonLabels {
    pub reason: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OperationLabels {
    pub operation: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ServiceLabels {
    pub service: String,
}

// ── Agent metrics registry ──────────────────────────────────────────

/// Prometheus metrics registry for the agent.
///
/// All metric families use interior mutability (atomics), so recording
/// metrics only requires `&self`. The registry itself is NOT Clone —
/// wrap in `Arc` for multi-task sharing.
pub struct AgentMetrics {
    registry: Registry,
    pub events_total: Family<StateLabels, Counter>,
    pub events_dropped_total: Family<ReasonLabels, Counter>,
    pub last_event_timestamp_seconds: Gauge<f64, AtomicU64>,
    pub store_failures_total: Family<OperationLabels, Counter>,
    pub duplicate_alerts_total: Counter,
    pub active_alerts: Gauge,
    pub publishes_total: Counter,
    pub publish_failures_total: Counter,
    pub purge_sweeps_total: Counter,
    pub purged_records_total: Counter,
    pub service_state: Family<ServiceLabels, Gauge>,
}

impl AgentMetrics {
    /// Create a new metrics registry with all metrics registered under
    /// the `warpgate` prefix.
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("warpgate");

        let events_total = Family::<StateLabels, Counter>::default();
        registry.register(
            "events",
            "Metagame events processed, by lifecycle state",
            events_total.clone(),
        );

        let events_dropped_total = Family::<ReasonLabels, Counter>::default();
        registry.register(
            "events_dropped",
            "Events dropped before dispatch (decode or validation failures)",
            events_dropped_total.clone(),
        );

        let last_event_timestamp_seconds: Gauge<f64, AtomicU64> = Gauge::default();
        registry.register(
            "last_event_timestamp_seconds",
            "Event-source timestamp of the most recently processed event",
            last_event_timestamp_seconds.clone(),
        );

        let store_failures_total = Family::<OperationLabels, Counter>::default();
        registry.register(
            "store_failures",
            "Failed alert store operations, by operation",
            store_failures_total.clone(),
        );

        let duplicate_alerts_total = Counter::default();
        registry.register(
            "duplicate_alerts",
            "Alert creates rejected because the id was already active",
            duplicate_alerts_total.clone(),
        );

        let active_alerts = Gauge::default();
        registry.register(
            "active_alerts",
            "Alert records currently held in the store",
            active_alerts.clone(),
        );

        let publishes_total = Counter::default();
        registry.register(
            "publishes",
            "Broker publishes confirmed by the server",
            publishes_total.clone(),
        );

        let publish_failures_total = Counter::default();
        registry.register(
            "publish_failures",
            "Broker publishes that failed or were not confirmed",
            publish_failures_total.clone(),
        );

        let purge_sweeps_total = Counter::default();
        registry.register(
            "purge_sweeps",
            "Completed stale-record purge sweeps",
            purge_sweeps_total.clone(),
        );

        let purged_records_total = Counter::default();
        registry.register(
            "purged_records",
            "Stale alert records removed by purge sweeps",
            purged_records_total.clone(),
        );

        let service_state = Family::<ServiceLabels, Gauge>::default();
        registry.register(
            "service_state",
            "Service lifecycle state (0=starting, 1=running, 2=stopped)",
            service_state.clone(),
        );

        Self {
            registry,
            events_total,
            events_dropped_total,
            last_event_timestamp_seconds,
            store_failures_total,
            duplicate_alerts_total,
            active_alerts,
            publishes_total,
            publish_failures_total,
            purge_sweeps_total,
            purged_records_total,
            service_state,
        }
    }

    /// Encode all registered metrics to `OpenMetrics` text format.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        prometheus_client::encoding::text::encode(&mut buffer, &self.registry)
            .expect("encoding metrics to string should not fail");
        buffer
    }
}

impl Default for AgentMetrics {
    fn default() -> Self {
        Self::new()
    }
}

// ── Sub-trait implementations ──────────────────────────────────────

impl EventMetrics for AgentMetrics {
    fn record_event(&self, state: &str) {
        self.events_total
            .get_or_create(&StateLabels {
                state: state.to_string(),
            })
            .inc();
    }

    fn record_event_dropped(&self, reason: &str) {
        self.events_dropped_total
            .get_or_create(&ReasonLabels {
                reason: reason.to_string(),
            })
            .inc();
    }

    fn set_last_event_timestamp(&self, timestamp: f64) {
        self.last_event_timestamp_seconds.set(timestamp);
    }
}

impl StoreMetrics for AgentMetrics {
    fn record_store_failure(&self, operation: &str) {
        self.store_failures_total
            .get_or_create(&OperationLabels {
                operation: operation.to_string(),
            })
            .inc();
    }

    fn record_duplicate_alert(&self) {
        self.duplicate_alerts_total.inc();
    }

    fn set_active_alerts(&self, count: u64) {
        self.active_alerts.set(count.try_into().unwrap_or(i64::MAX));
    }
}

impl PublishMetrics for AgentMetrics {
    fn record_publish(&self) {
        self.publishes_total.inc();
    }

    fn record_publish_failure(&self) {
        self.publish_failures_total.inc();
    }
}

impl PurgeMetrics for AgentMetrics {
    fn record_purge_sweep(&self, removed: u64) {
        self.purge_sweeps_total.inc();
        self.purged_records_total.inc_by(removed);
    }
}

impl ServiceMetrics for AgentMetrics {
    fn set_service_state(&self, service: &str, state: u8) {
        self.service_state
            .get_or_create(&ServiceLabels {
                service: service.to_string(),
            })
            .set(i64::from(state));
    }
}

// MetricsPort is automatically implemented via the blanket impl
// since AgentMetrics implements all sub-traits.
