use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use adapters::storage::mongo_alert_store::MongoAlertStore;
use application::stale_purger::StalePurger;
use domain::alert::entity::AlertRecord;
use domain::alert::query::AlertQuery;
use domain::event::entity::{MetagameEvent, RawMetagameEvent};
use domain::event::labels::{world_name, zone_name};
use infrastructure::config::AgentConfig;
use infrastructure::logging::init_logging;
use infrastructure::metrics::AgentMetrics;
use ports::secondary::alert_store::AlertStore;
use ports::secondary::metrics_port::MetricsPort;

use crate::cli::Cli;

// ── Purge ───────────────────────────────────────────────────────────────

/// One-shot purge: delete records older than the retention window and
/// report how many went away.
pub async fn cmd_purge(cli: &Cli) -> Result<()> {
    let (config, store) = connect_store(cli).await?;
    let metrics = Arc::new(AgentMetrics::new());

    let purger = StalePurger::new(
        Arc::clone(&store),
        metrics as Arc<dyn MetricsPort>,
        config.purge.retention,
        config.purge.batch_size,
    );
    let removed = purger.purge().await?;

    println!("Purged {removed} stale alert record(s).");
    Ok(())
}

// ── Simulate ────────────────────────────────────────────────────────────

/// Drive one synthetic alert through the store end to end: create,
/// count, read back, remove, remove again to confirm idempotence.
pub async fn cmd_simulate(cli: &Cli) -> Result<()> {
    let (_config, store) = connect_store(cli).await?;

    let raw = synthetic_raw_event();
    let event = MetagameEvent::from_raw(&raw)?;
    let id = event.identity();

    println!(
        "Simulating alert {id} ({} / {})",
        world_name(event.world_id),
        zone_name(event.zone_id)
    );

    let record = AlertRecord::from_event(&event);
    let created = store.create(&record).await?;
    println!("Created:   {created}");

    let active = store.count(&AlertQuery::default()).await?;
    println!("Active:    {active} record(s)");

    match store.read_one(&id).await? {
        Some(found) => println!("Read back: {} ({})", found.id, found.state.as_str()),
        None => println!("Read back: record missing"),
    }

    let removed = store.remove(&id).await?;
    println!("Removed:   {removed} record(s)");

    let removed_again = store.remove(&id).await?;
    println!("Re-remove: {removed_again} record(s), idempotent");

    println!("Simulation complete.");
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Load configuration, initialize logging with any CLI overrides, and
/// connect the alert store. Shared by the one-shot subcommands.
async fn connect_store(cli: &Cli) -> Result<(AgentConfig, Arc<dyn AlertStore>)> {
    let config = AgentConfig::from_env()?;

    let level = cli.log_level.unwrap_or(config.log_level);
    let format = cli.log_format.unwrap_or(config.log_format);
    init_logging(level, format)?;

    let store = MongoAlertStore::connect(
        &config.store.url,
        &config.store.database,
        &config.store.collection,
    )
    .await?;

    Ok((config, Arc::new(store)))
}

/// Fully populated raw event for the simulator: Emerald / Indar with an
/// even territory split and a fresh timestamp.
fn synthetic_raw_event() -> RawMetagameEvent {
    RawMetagameEvent {
        world_id: Some(17),
        instance_id: Some(123_456),
        metagame_event_id: Some(226),
        metagame_event_state: Some(135),
        metagame_event_state_name: Some("started".to_owned()),
        zone_id: Some(2),
        faction_nc: Some(33.3),
        faction_tr: Some(33.3),
        faction_vs: Some(33.4),
        experience_bonus: Some(25.0),
        timestamp: Some(now_secs()),
    }
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::event::entity::EventState;

    #[test]
    fn synthetic_event_is_complete() {
        let raw = synthetic_raw_event();
        let event = MetagameEvent::from_raw(&raw).unwrap();
        assert_eq!(event.identity().to_string(), "17-123456");
        assert_eq!(event.state, EventState::Started);
    }

    #[test]
    fn now_secs_is_recent() {
        // Sanity floor: late 2023 in POSIX seconds.
        assert!(now_secs() > 1_700_000_000.0);
    }
}
