use std::future::Future;
use std::pin::Pin;

use domain::alert::entity::AlertRecord;
use domain::alert::error::AlertStoreError;
use domain::alert::query::AlertQuery;
use domain::event::identity::UniqueEventId;

/// Secondary port for the persisted alert collection.
///
/// The store exclusively owns the collection: the lifecycle dispatcher and
/// the stale purger are its only writers, and both go through this trait.
///
/// Uses `Pin<Box<dyn Future>>` return types (instead of RPITIT) so the
/// trait is dyn-compatible and can be used as `Arc<dyn AlertStore>`.
pub trait AlertStore: Send + Sync {
    /// Insert a new record, keyed by its identity.
    ///
    /// Fails with [`AlertStoreError::DuplicateKey`] if a record with the
    /// same id already exists; the existing record is left untouched.
    fn create<'a>(
        &'a self,
        record: &'a AlertRecord,
    ) -> Pin<Box<dyn Future<Output = Result<UniqueEventId, AlertStoreError>> + Send + 'a>>;

    /// Fetch a single record by identity.
    fn read_one<'a>(
        &'a self,
        id: &'a UniqueEventId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<AlertRecord>, AlertStoreError>> + Send + 'a>>;

    /// Fetch up to `query.limit` matching records; ordering is unspecified.
    fn read_many<'a>(
        &'a self,
        query: &'a AlertQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<AlertRecord>, AlertStoreError>> + Send + 'a>>;

    /// Remove a record by identity.
    ///
    /// Idempotent: returns the number of records removed (0 or 1); an
    /// absent id yields 0, not an error.
    fn remove<'a>(
        &'a self,
        id: &'a UniqueEventId,
    ) -> Pin<Box<dyn Future<Output = Result<u64, AlertStoreError>> + Send + 'a>>;

    /// Number of records matching the query (`limit` is ignored).
    fn count<'a>(
        &'a self,
        query: &'a AlertQuery,
    ) -> Pin<Box<dyn Future<Output = Result<u64, AlertStoreError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyStore;

    impl AlertStore for DummyStore {
        fn create<'a>(
            &'a self,
            record: &'a AlertRecord,
        ) -> Pin<Box<dyn Future<Output = Result<UniqueEventId, AlertStoreError>> + Send + 'a>>
        {
            Box::pin(async move { Ok(record.id) })
        }

        fn read_one<'a>(
            &'a self,
            _id: &'a UniqueEventId,
        ) -> Pin<Box<dyn Future<Output = Result<Option<AlertRecord>, AlertStoreError>> + Send + 'a>>
        {
            Box::pin(async { Ok(None) })
        }

        fn read_many<'a>(
            &'a self,
            _query: &'a AlertQuery,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<AlertRecord>, AlertStoreError>> + Send + 'a>>
        {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn remove<'a>(
            &'a self,
            _id: &'a UniqueEventId,
        ) -> Pin<Box<dyn Future<Output = Result<u64, AlertStoreError>> + Send + 'a>> {
            Box::pin(async { Ok(0) })
        }

        fn count<'a>(
            &'a self,
            _query: &'a AlertQuery,
        ) -> Pin<Box<dyn Future<Output = Result<u64, AlertStoreError>> + Send + 'a>> {
            Box::pin(async { Ok(0) })
        }
    }

    #[test]
    fn alert_store_is_dyn_compatible() {
        let store: Box<dyn AlertStore> = Box::new(DummyStore);
        let _ = store;
    }
}
