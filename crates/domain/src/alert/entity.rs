use serde::{Deserialize, Serialize};

use crate::event::entity::{EventState, MetagameEvent};
use crate::event::identity::UniqueEventId;

/// Canonical representation of an active alert occurrence.
///
/// This is both the document persisted in the alert store and the JSON body
/// published to the broker. The presence of a record in the store *is* the
/// "alert is active" signal; there is no separate flag. At most one record
/// may exist per identity, enforced by the store's key uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Rendered identity, doubling as the document key.
    #[serde(rename = "_id")]
    pub id: UniqueEventId,
    pub event_id: u32,
    pub state: EventState,
    pub world_id: u16,
    pub zone_id: u32,
    /// Faction territory weights at the time of the event.
    pub nc: f64,
    pub tr: f64,
    pub vs: f64,
    /// Experience bonus multiplier.
    pub xp: f64,
    /// Event-source time, POSIX seconds.
    pub timestamp: f64,
}

impl AlertRecord {
    /// Map a validated event to its canonical record. Pure.
    pub fn from_event(event: &MetagameEvent) -> Self {
        Self {
            id: event.identity(),
            event_id: event.event_id,
            state: event.state,
            world_id: event.world_id,
            zone_id: event.zone_id,
            nc: event.nc,
            tr: event.tr,
            vs: event.vs,
            xp: event.xp,
            timestamp: event.timestamp,
        }
    }
}
