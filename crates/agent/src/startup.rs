use std::sync::Arc;
use std::time::Duration;

use adapters::broker::amqp_publisher::AmqpPublisher;
use adapters::ingest::json_feed::JsonFeed;
use adapters::storage::mongo_alert_store::MongoAlertStore;
use application::lifecycle_dispatcher::LifecycleDispatcher;
use application::stale_purger::StalePurger;
use infrastructure::config::AgentConfig;
use infrastructure::constants::{EVENT_CHANNEL_CAPACITY, GRACEFUL_SHUTDOWN_TIMEOUT};
use infrastructure::logging::init_logging;
use infrastructure::metrics::{AgentMetrics, SERVICE_RUNNING, SERVICE_STARTING, SERVICE_STOPPED};
use ports::secondary::alert_store::AlertStore;
use ports::secondary::event_publisher::EventPublisher;
use ports::secondary::metrics_port::{MetricsPort, ServiceMetrics};
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::{Cli, Command};

/// Run the agent startup sequence and block until shutdown.
#[allow(clippy::too_many_lines)] // startup is inherently sequential and long
pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    // ── 1. Load config ──────────────────────────────────────────────
    let config = AgentConfig::from_env()?;

    // ── 2. Initialize logging ───────────────────────────────────────
    // CLI flags take precedence over the environment
    let log_level = cli.log_level.unwrap_or(config.log_level);
    let log_format = cli.log_format.unwrap_or(config.log_format);
    init_logging(log_level, log_format)?;

    // Service root span — fields appear in every subsequent log entry
    let _root_span = tracing::span!(
        tracing::Level::INFO,
        "service",
        service.name = "warpgate",
        service.version = env!("CARGO_PKG_VERSION"),
    )
    .entered();

    let sanitized = config.sanitized();
    info!(
        broker_url = %sanitized.broker.url,
        broker_enabled = config.broker.enabled,
        store_url = %sanitized.store.url,
        log_level = log_level.as_str(),
        log_format = log_format.as_str(),
        "warpgate agent starting"
    );

    // ── 3. Initialize metrics ───────────────────────────────────────
    let metrics = Arc::new(AgentMetrics::new());

    // ── 4. Connect the alert store ──────────────────────────────────
    metrics.set_service_state("store", SERVICE_STARTING);
    let store = MongoAlertStore::connect(
        &config.store.url,
        &config.store.database,
        &config.store.collection,
    )
    .await?;
    let store: Arc<dyn AlertStore> = Arc::new(store);
    metrics.set_service_state("store", SERVICE_RUNNING);

    // ── 5. Connect the broker publisher (optional) ──────────────────
    let publisher: Option<Arc<dyn EventPublisher>> = if config.broker.enabled {
        metrics.set_service_state("broker", SERVICE_STARTING);
        let publisher = AmqpPublisher::connect(&config.broker.url).await?;
        metrics.set_service_state("broker", SERVICE_RUNNING);
        Some(Arc::new(publisher))
    } else {
        info!("broker publishing disabled, running store-only");
        None
    };

    // ── 6. Install shutdown signal handling ─────────────────────────
    let cancel_token = crate::shutdown::create_shutdown_token();

    // ── 7. Start the stale purger ───────────────────────────────────
    let purge_handle = if config.purge.enabled {
        let purger = StalePurger::new(
            Arc::clone(&store),
            Arc::clone(&metrics) as Arc<dyn MetricsPort>,
            config.purge.retention,
            config.purge.batch_size,
        );
        info!(
            retention_secs = config.purge.retention.as_secs(),
            batch_size = config.purge.batch_size,
            interval_secs = config.purge.interval.as_secs(),
            "stale purger starting"
        );
        Some(tokio::spawn(
            purger.run(config.purge.interval, cancel_token.clone()),
        ))
    } else {
        info!("stale purger disabled");
        None
    };

    // ── 8. Start the event feed ─────────────────────────────────────
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let feed_path = match &cli.command {
        Some(Command::Run { feed }) => feed.as_deref(),
        _ => None,
    };
    let feed_handle = match feed_path {
        Some(path) => {
            info!(path, "reading event feed from file");
            let file = tokio::fs::File::open(path).await?;
            let feed = JsonFeed::new(file, Arc::clone(&metrics) as Arc<dyn MetricsPort>);
            tokio::spawn(feed.run(event_tx, cancel_token.clone()))
        }
        None => {
            info!("reading event feed from stdin");
            let feed = JsonFeed::new(
                tokio::io::stdin(),
                Arc::clone(&metrics) as Arc<dyn MetricsPort>,
            );
            tokio::spawn(feed.run(event_tx, cancel_token.clone()))
        }
    };

    // ── 9. Start the lifecycle dispatcher ───────────────────────────
    let mut dispatcher = LifecycleDispatcher::new(
        Arc::clone(&store),
        Arc::clone(&metrics) as Arc<dyn MetricsPort>,
    );
    if let Some(publisher) = publisher {
        dispatcher = dispatcher.with_publisher(publisher);
    }
    let dispatcher_handle = tokio::spawn(dispatcher.run(event_rx, cancel_token.clone()));

    // ── 10. Ready — wait for cancellation ───────────────────────────
    info!("agent ready, waiting for shutdown signal");
    cancel_token.cancelled().await;

    // ── 11. Ordered shutdown sequence ───────────────────────────────
    info!("shutdown phase 1: stopping the event feed");
    let _ = tokio::time::timeout(GRACEFUL_SHUTDOWN_TIMEOUT, feed_handle).await;

    info!("shutdown phase 2: draining in-flight events");
    // The feed dropped its sender; the dispatcher drains what is queued.
    let _ = tokio::time::timeout(GRACEFUL_SHUTDOWN_TIMEOUT, dispatcher_handle).await;

    info!("shutdown phase 3: stopping the stale purger");
    if let Some(handle) = purge_handle {
        let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;
    }

    metrics.set_service_state("store", SERVICE_STOPPED);
    if config.broker.enabled {
        metrics.set_service_state("broker", SERVICE_STOPPED);
    }

    info!("agent stopped");
    Ok(())
}
