use std::future::Future;
use std::pin::Pin;

use domain::alert::entity::AlertRecord;
use domain::alert::error::AlertStoreError;
use domain::alert::query::AlertQuery;
use domain::event::identity::UniqueEventId;
use futures::TryStreamExt;
use mongodb::Client;
use mongodb::bson::{Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use ports::secondary::alert_store::AlertStore;
use tracing::info;

/// Alert store backed by a MongoDB collection.
///
/// Documents are keyed on `_id` = the rendered event identity, so the
/// collection's primary index enforces at most one active record per
/// occurrence. A duplicate insert maps to [`AlertStoreError::DuplicateKey`].
pub struct MongoAlertStore {
    collection: mongodb::Collection<AlertRecord>,
}

impl MongoAlertStore {
    /// Connect to the store at `url` and bind to `database`/`collection`.
    ///
    /// The driver connects lazily, so this pings the server once to make
    /// an unreachable store fail here rather than on first use.
    pub async fn connect(
        url: &str,
        database: &str,
        collection: &str,
    ) -> Result<Self, AlertStoreError> {
        let client = Client::with_uri_str(url)
            .await
            .map_err(|e| AlertStoreError::Connectivity(e.to_string()))?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| AlertStoreError::Connectivity(e.to_string()))?;

        info!(database, collection, "alert store connected");
        Ok(Self {
            collection: db.collection::<AlertRecord>(collection),
        })
    }
}

/// Render an [`AlertQuery`] as a MongoDB filter document.
fn query_filter(query: &AlertQuery) -> Document {
    let mut filter = Document::new();
    if let Some(cutoff) = query.older_than {
        filter.insert("timestamp", doc! { "$lt": cutoff });
    }
    if let Some(world_id) = query.world_id {
        filter.insert("world_id", i32::from(world_id));
    }
    filter
}

/// Server error code 11000: unique index violation on `_id`.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_err)) if write_err.code == 11000
    )
}

fn map_error(err: &mongodb::error::Error) -> AlertStoreError {
    match &*err.kind {
        ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
            AlertStoreError::Serialization(err.to_string())
        }
        _ => AlertStoreError::Connectivity(err.to_string()),
    }
}

impl AlertStore for MongoAlertStore {
    fn create<'a>(
        &'a self,
        record: &'a AlertRecord,
    ) -> Pin<Box<dyn Future<Output = Result<UniqueEventId, AlertStoreError>> + Send + 'a>> {
        Box::pin(async move {
            match self.collection.insert_one(record).await {
                Ok(_) => Ok(record.id),
                Err(e) if is_duplicate_key(&e) => {
                    Err(AlertStoreError::DuplicateKey(record.id.to_string()))
                }
                Err(e) => Err(map_error(&e)),
            }
        })
    }

    fn read_one<'a>(
        &'a self,
        id: &'a UniqueEventId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<AlertRecord>, AlertStoreError>> + Send + 'a>>
    {
        Box::pin(async move {
            self.collection
                .find_one(doc! { "_id": id.to_string() })
                .await
                .map_err(|e| map_error(&e))
        })
    }

    fn read_many<'a>(
        &'a self,
        query: &'a AlertQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<AlertRecord>, AlertStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut find = self.collection.find(query_filter(query));
            if query.limit > 0 {
                find = find.limit(i64::try_from(query.limit).unwrap_or(i64::MAX));
            }
            let mut cursor = find.await.map_err(|e| map_error(&e))?;

            let mut records = Vec::new();
            while let Some(record) = cursor.try_next().await.map_err(|e| map_error(&e))? {
                records.push(record);
            }
            Ok(records)
        })
    }

    fn remove<'a>(
        &'a self,
        id: &'a UniqueEventId,
    ) -> Pin<Box<dyn Future<Output = Result<u64, AlertStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let result = self
                .collection
                .delete_one(doc! { "_id": id.to_string() })
                .await
                .map_err(|e| map_error(&e))?;
            Ok(result.deleted_count)
        })
    }

    fn count<'a>(
        &'a self,
        query: &'a AlertQuery,
    ) -> Pin<Box<dyn Future<Output = Result<u64, AlertStoreError>> + Send + 'a>> {
        Box::pin(async move {
            self.collection
                .count_documents(query_filter(query))
                .await
                .map_err(|e| map_error(&e))
        })
    }
}
