// Storage adapter: MongoDB-backed alert store
pub mod mongo_alert_store;
