#![forbid(unsafe_code)]

pub mod lifecycle_dispatcher;
pub mod stale_purger;
