#![forbid(unsafe_code)]

pub mod broker;
pub mod ingest;
pub mod storage;
