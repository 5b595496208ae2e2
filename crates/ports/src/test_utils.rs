use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use domain::alert::entity::AlertRecord;
use domain::alert::error::AlertStoreError;
use domain::alert::query::AlertQuery;
use domain::event::identity::UniqueEventId;

use crate::secondary::alert_store::AlertStore;
use crate::secondary::metrics_port::{
    EventMetrics, PublishMetrics, PurgeMetrics, ServiceMetrics, StoreMetrics,
};

/// No-op implementation of all metrics sub-traits for use in tests.
///
/// All methods inherit the default no-op implementations from the sub-traits.
pub struct NoopMetrics;

impl EventMetrics for NoopMetrics {}
impl StoreMetrics for NoopMetrics {}
impl PublishMetrics for NoopMetrics {}
impl PurgeMetrics for NoopMetrics {}
impl ServiceMetrics for NoopMetrics {}

/// In-memory [`AlertStore`] matching the document store's contract:
/// key uniqueness on create, idempotent remove, filter semantics via
/// [`AlertQuery::matches`]. Shared by dispatcher and purger tests.
#[derive(Default)]
pub struct InMemoryAlertStore {
    records: Mutex<HashMap<String, AlertRecord>>,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held, bypassing the query surface.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AlertStore for InMemoryAlertStore {
    fn create<'a>(
        &'a self,
        record: &'a AlertRecord,
    ) -> Pin<Box<dyn Future<Output = Result<UniqueEventId, AlertStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut records = self.records.lock().unwrap();
            let key = record.id.to_string();
            if records.contains_key(&key) {
                return Err(AlertStoreError::DuplicateKey(key));
            }
            records.insert(key, record.clone());
            Ok(record.id)
        })
    }

    fn read_one<'a>(
        &'a self,
        id: &'a UniqueEventId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<AlertRecord>, AlertStoreError>> + Send + 'a>>
    {
        Box::pin(async move { Ok(self.records.lock().unwrap().get(&id.to_string()).cloned()) })
    }

    fn read_many<'a>(
        &'a self,
        query: &'a AlertQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<AlertRecord>, AlertStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let records = self.records.lock().unwrap();
            let mut matched: Vec<AlertRecord> = records
                .values()
                .filter(|record| query.matches(record))
                .cloned()
                .collect();
            if query.limit > 0 {
                matched.truncate(query.limit);
            }
            Ok(matched)
        })
    }

    fn remove<'a>(
        &'a self,
        id: &'a UniqueEventId,
    ) -> Pin<Box<dyn Future<Output = Result<u64, AlertStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let removed = self.records.lock().unwrap().remove(&id.to_string());
            Ok(u64::from(removed.is_some()))
        })
    }

    fn count<'a>(
        &'a self,
        query: &'a AlertQuery,
    ) -> Pin<Box<dyn Future<Output = Result<u64, AlertStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let records = self.records.lock().unwrap();
            Ok(records.values().filter(|record| query.matches(record)).count() as u64)
        })
    }
}
