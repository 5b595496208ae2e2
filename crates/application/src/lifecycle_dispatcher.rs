use std::sync::Arc;

use domain::alert::entity::AlertRecord;
use domain::alert::error::AlertStoreError;
use domain::alert::query::AlertQuery;
use domain::event::entity::{EventState, MetagameEvent, RawMetagameEvent};
use domain::event::error::EventError;
use domain::event::labels::{world_name, zone_name};
use ports::secondary::alert_store::AlertStore;
use ports::secondary::event_publisher::EventPublisher;
use ports::secondary::metrics_port::MetricsPort;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Lifecycle dispatcher application service.
///
/// Validates raw feed payloads, keeps the active-alert record set in
/// step with the event's state (create on `started`, remove on `ended`
/// or `cancelled`), and publishes the canonical JSON rendering of every
/// event to the broker.
///
/// The store mutation runs first; the publish happens for every event
/// regardless of the store outcome, and a failed publish never rolls
/// the store mutation back. The two sinks may diverge transiently.
pub struct LifecycleDispatcher {
    store: Arc<dyn AlertStore>,
    metrics: Arc<dyn MetricsPort>,
    /// Optional broker sink. When absent the dispatcher is store-only.
    publisher: Option<Arc<dyn EventPublisher>>,
}

impl LifecycleDispatcher {
    pub fn new(store: Arc<dyn AlertStore>, metrics: Arc<dyn MetricsPort>) -> Self {
        Self {
            store,
            metrics,
            publisher: None,
        }
    }

    /// Attach a broker publisher for canonical event messages.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Validate a raw feed payload and process it.
    ///
    /// A payload missing required fields or naming an unknown state is
    /// dropped here with a warning; it never aborts the run loop.
    pub async fn process_raw(&self, raw: &RawMetagameEvent) {
        match MetagameEvent::from_raw(raw) {
            Ok(event) => self.process_event(&event).await,
            Err(e) => {
                let reason = match e {
                    EventError::MissingField { .. } => "missing_field",
                    EventError::UnknownState { .. } => "unknown_state",
                };
                self.metrics.record_event_dropped(reason);
                tracing::warn!(error = %e, "dropping malformed event");
            }
        }
    }

    /// Process a single validated event: mutate the store per the state
    /// policy, then publish the canonical record.
    pub async fn process_event(&self, event: &MetagameEvent) {
        let id = event.identity();
        self.metrics.record_event(event.state.as_str());
        self.metrics.set_last_event_timestamp(event.timestamp);
        tracing::info!(
            event_id = %id,
            state = %event.state,
            world = world_name(event.world_id),
            zone = zone_name(event.zone_id),
            "metagame event received"
        );
        tracing::debug!(
            event_id = %id,
            nc = event.nc,
            tr = event.tr,
            vs = event.vs,
            xp = event.xp,
            timestamp = event.timestamp,
            "event territory and bonus state"
        );

        let record = AlertRecord::from_event(event);
        let mut store_changed = false;

        match event.state {
            EventState::Started => match self.store.create(&record).await {
                Ok(_) => {
                    store_changed = true;
                    tracing::debug!(event_id = %id, "alert record created");
                }
                Err(AlertStoreError::DuplicateKey(_)) => {
                    self.metrics.record_duplicate_alert();
                    tracing::warn!(
                        event_id = %id,
                        "duplicate started event, keeping existing record"
                    );
                }
                Err(e) => {
                    self.metrics.record_store_failure("create");
                    tracing::warn!(event_id = %id, error = %e, "alert record create failed");
                }
            },
            state if state.is_terminal() => match self.store.remove(&id).await {
                Ok(removed) => {
                    store_changed = true;
                    tracing::debug!(event_id = %id, removed, "alert record removed");
                }
                Err(e) => {
                    self.metrics.record_store_failure("remove");
                    tracing::warn!(event_id = %id, error = %e, "alert record remove failed");
                }
            },
            // restarted and xp_bonus_changed pass through without a store mutation
            _ => {}
        }

        if let Some(ref publisher) = self.publisher {
            match serde_json::to_vec(&record) {
                Ok(payload) => match publisher.publish(&payload).await {
                    Ok(()) => {
                        self.metrics.record_publish();
                        tracing::debug!(event_id = %id, "event published");
                    }
                    Err(e) => {
                        self.metrics.record_publish_failure();
                        tracing::warn!(event_id = %id, error = %e, "event publish failed");
                    }
                },
                Err(e) => {
                    self.metrics.record_publish_failure();
                    tracing::warn!(event_id = %id, error = %e, "event serialization failed");
                }
            }
        }

        if store_changed {
            self.refresh_active_gauge().await;
        }
    }

    async fn refresh_active_gauge(&self) {
        match self.store.count(&AlertQuery::default()).await {
            Ok(active) => self.metrics.set_active_alerts(active),
            Err(e) => tracing::debug!(error = %e, "active alert count unavailable"),
        }
    }

    /// Async run loop: consumes raw events from the channel, processes
    /// each one, and drains on cancellation.
    pub async fn run(self, mut rx: mpsc::Receiver<RawMetagameEvent>, cancel_token: CancellationToken) {
        let mut count: u64 = 0;

        loop {
            tokio::select! {
                () = cancel_token.cancelled() => {
                    // Drain remaining events before exiting
                    while let Ok(raw) = rx.try_recv() {
                        count += 1;
                        self.process_raw(&raw).await;
                    }
                    break;
                }
                msg = rx.recv() => {
                    match msg {
                        Some(raw) => {
                            count += 1;
                            self.process_raw(&raw).await;
                        }
                        None => break, // channel closed
                    }
                }
            }
        }

        tracing::info!(total_events = count, "lifecycle dispatcher stopped");
    }
}
