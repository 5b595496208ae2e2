pub mod alert_store;
pub mod event_publisher;
pub mod metrics_port;
