// Ingest adapter: newline-delimited JSON event feed
pub mod json_feed;
