use super::entity::AlertRecord;

/// Filter parameters for querying stored alert records.
///
/// The document store translates this into its native filter; the
/// in-memory store applies [`AlertQuery::matches`] directly. Both must
/// agree so tests against the fake pin the real adapter's semantics.
#[derive(Debug, Clone, Default)]
pub struct AlertQuery {
    /// Strict upper bound on `timestamp` (exclusive).
    pub older_than: Option<f64>,
    /// Filter by world id (exact match).
    pub world_id: Option<u16>,
    /// Maximum number of records to return; 0 means no limit.
    pub limit: usize,
}

impl AlertQuery {
    /// The purge sweep's query: records strictly older than `cutoff`,
    /// read in batches of `batch_size`.
    pub fn stale(cutoff: f64, batch_size: usize) -> Self {
        Self {
            older_than: Some(cutoff),
            world_id: None,
            limit: batch_size,
        }
    }

    /// Check whether a record matches all active filters.
    ///
    /// `limit` is a pagination concern for the store, not a predicate,
    /// and is ignored here.
    pub fn matches(&self, record: &AlertRecord) -> bool {
        if let Some(cutoff) = self.older_than
            && record.timestamp >= cutoff
        {
            return false;
        }
        if let Some(world_id) = self.world_id
            && record.world_id != world_id
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::entity::EventState;
    use crate::event::identity::UniqueEventId;

    fn make_record(world_id: u16, instance_id: u32, timestamp: f64) -> AlertRecord {
        AlertRecord {
            id: UniqueEventId::new(world_id, instance_id),
            event_id: 42,
            state: EventState::Started,
            world_id,
            zone_id: 2,
            nc: 40.0,
            tr: 30.0,
            vs: 20.0,
            xp: 25.0,
            timestamp,
        }
    }

    #[test]
    fn default_query_matches_everything() {
        let query = AlertQuery::default();
        assert!(query.matches(&make_record(17, 1, 0.0)));
        assert!(query.matches(&make_record(40, 2, 1e12)));
    }

    #[test]
    fn older_than_is_a_strict_bound() {
        let query = AlertQuery::stale(1_000.0, 30);
        assert!(query.matches(&make_record(17, 1, 999.9)));
        assert!(!query.matches(&make_record(17, 2, 1_000.0)));
        assert!(!query.matches(&make_record(17, 3, 1_000.1)));
    }

    #[test]
    fn world_filter_is_exact() {
        let query = AlertQuery {
            world_id: Some(17),
            ..AlertQuery::default()
        };
        assert!(query.matches(&make_record(17, 1, 0.0)));
        assert!(!query.matches(&make_record(13, 1, 0.0)));
    }

    #[test]
    fn filters_compose() {
        let query = AlertQuery {
            older_than: Some(500.0),
            world_id: Some(17),
            limit: 10,
        };
        assert!(query.matches(&make_record(17, 1, 100.0)));
        assert!(!query.matches(&make_record(17, 2, 600.0)));
        assert!(!query.matches(&make_record(13, 3, 100.0)));
    }
}
