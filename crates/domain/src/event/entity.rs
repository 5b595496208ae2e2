use serde::{Deserialize, Serialize};

use super::error::EventError;
use super::identity::UniqueEventId;

/// Lifecycle state of a metagame event, as named by the upstream feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    Started,
    Restarted,
    Cancelled,
    Ended,
    XpBonusChanged,
}

impl EventState {
    /// Resolve a numeric upstream state id (payloads that omit the state
    /// name still carry this).
    pub fn from_state_id(id: u16) -> Option<Self> {
        match id {
            135 => Some(Self::Started),
            136 => Some(Self::Restarted),
            137 => Some(Self::Cancelled),
            138 => Some(Self::Ended),
            139 => Some(Self::XpBonusChanged),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Restarted => "restarted",
            Self::Cancelled => "cancelled",
            Self::Ended => "ended",
            Self::XpBonusChanged => "xp_bonus_changed",
        }
    }

    /// `true` exactly for the set {ended, cancelled} — the states that end
    /// an alert's active window and drive record removal.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventState {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "started" => Ok(Self::Started),
            "restarted" => Ok(Self::Restarted),
            "cancelled" => Ok(Self::Cancelled),
            "ended" => Ok(Self::Ended),
            "xp_bonus_changed" => Ok(Self::XpBonusChanged),
            _ => Err(EventError::UnknownState {
                value: s.to_string(),
            }),
        }
    }
}

/// One metagame event payload exactly as the upstream feed delivers it.
///
/// Every field is optional: the feed makes no completeness guarantee, so
/// validation happens once in [`MetagameEvent::from_raw`] rather than as
/// late key errors scattered through the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMetagameEvent {
    pub world_id: Option<u16>,
    pub instance_id: Option<u32>,
    pub metagame_event_id: Option<u32>,
    pub metagame_event_state: Option<u16>,
    pub metagame_event_state_name: Option<String>,
    pub zone_id: Option<u32>,
    pub faction_nc: Option<f64>,
    pub faction_tr: Option<f64>,
    pub faction_vs: Option<f64>,
    pub experience_bonus: Option<f64>,
    /// Event-source time, POSIX seconds.
    pub timestamp: Option<f64>,
}

/// A validated metagame event: all required fields present and typed.
#[derive(Debug, Clone, PartialEq)]
pub struct MetagameEvent {
    pub world_id: u16,
    pub instance_id: u32,
    pub event_id: u32,
    pub state: EventState,
    pub zone_id: u32,
    pub nc: f64,
    pub tr: f64,
    pub vs: f64,
    pub xp: f64,
    pub timestamp: f64,
}

impl MetagameEvent {
    /// Validate a raw payload.
    ///
    /// Fails on the first missing required field. The state is resolved
    /// from the state name when present, falling back to the numeric
    /// state id.
    pub fn from_raw(raw: &RawMetagameEvent) -> Result<Self, EventError> {
        let state = match raw.metagame_event_state_name.as_deref() {
            Some(name) => name.parse()?,
            None => {
                let id = raw.metagame_event_state.ok_or(EventError::MissingField {
                    field: "metagame_event_state_name",
                })?;
                EventState::from_state_id(id).ok_or(EventError::UnknownState {
                    value: id.to_string(),
                })?
            }
        };

        Ok(Self {
            world_id: raw
                .world_id
                .ok_or(EventError::MissingField { field: "world_id" })?,
            instance_id: raw.instance_id.ok_or(EventError::MissingField {
                field: "instance_id",
            })?,
            event_id: raw.metagame_event_id.ok_or(EventError::MissingField {
                field: "metagame_event_id",
            })?,
            state,
            zone_id: raw
                .zone_id
                .ok_or(EventError::MissingField { field: "zone_id" })?,
            nc: raw.faction_nc.ok_or(EventError::MissingField {
                field: "faction_nc",
            })?,
            tr: raw.faction_tr.ok_or(EventError::MissingField {
                field: "faction_tr",
            })?,
            vs: raw.faction_vs.ok_or(EventError::MissingField {
                field: "faction_vs",
            })?,
            xp: raw.experience_bonus.ok_or(EventError::MissingField {
                field: "experience_bonus",
            })?,
            timestamp: raw.timestamp.ok_or(EventError::MissingField {
                field: "timestamp",
            })?,
        })
    }

    /// Identity of the occurrence this event belongs to.
    pub fn identity(&self) -> UniqueEventId {
        UniqueEventId::new(self.world_id, self.instance_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_raw() -> RawMetagameEvent {
        RawMetagameEvent {
            world_id: Some(17),
            instance_id: Some(123_456),
            metagame_event_id: Some(42),
            metagame_event_state: Some(135),
            metagame_event_state_name: Some("started".to_string()),
            zone_id: Some(2),
            faction_nc: Some(40.0),
            faction_tr: Some(30.0),
            faction_vs: Some(20.0),
            experience_bonus: Some(25.0),
            timestamp: Some(1_700_000_000.0),
        }
    }

    #[test]
    fn complete_raw_event_validates() {
        let event = MetagameEvent::from_raw(&complete_raw()).unwrap();
        assert_eq!(event.world_id, 17);
        assert_eq!(event.instance_id, 123_456);
        assert_eq!(event.event_id, 42);
        assert_eq!(event.state, EventState::Started);
        assert_eq!(event.zone_id, 2);
        assert_eq!(event.nc, 40.0);
        assert_eq!(event.tr, 30.0);
        assert_eq!(event.vs, 20.0);
        assert_eq!(event.xp, 25.0);
        assert_eq!(event.timestamp, 1_700_000_000.0);
        assert_eq!(event.identity().to_string(), "17-123456");
    }

    #[test]
    fn missing_field_names_the_field() {
        let mut raw = complete_raw();
        raw.world_id = None;
        let err = MetagameEvent::from_raw(&raw).unwrap_err();
        assert!(matches!(
            err,
            EventError::MissingField { field: "world_id" }
        ));

        let mut raw = complete_raw();
        raw.timestamp = None;
        let err = MetagameEvent::from_raw(&raw).unwrap_err();
        assert!(matches!(
            err,
            EventError::MissingField { field: "timestamp" }
        ));
    }

    #[test]
    fn state_falls_back_to_numeric_id() {
        let mut raw = complete_raw();
        raw.metagame_event_state_name = None;
        raw.metagame_event_state = Some(138);
        let event = MetagameEvent::from_raw(&raw).unwrap();
        assert_eq!(event.state, EventState::Ended);
    }

    #[test]
    fn event_with_neither_state_form_fails() {
        let mut raw = complete_raw();
        raw.metagame_event_state_name = None;
        raw.metagame_event_state = None;
        assert!(matches!(
            MetagameEvent::from_raw(&raw),
            Err(EventError::MissingField {
                field: "metagame_event_state_name"
            })
        ));
    }

    #[test]
    fn unknown_state_name_fails() {
        let mut raw = complete_raw();
        raw.metagame_event_state_name = Some("exploded".to_string());
        assert!(matches!(
            MetagameEvent::from_raw(&raw),
            Err(EventError::UnknownState { .. })
        ));
    }

    #[test]
    fn state_id_table_matches_upstream() {
        assert_eq!(EventState::from_state_id(135), Some(EventState::Started));
        assert_eq!(EventState::from_state_id(136), Some(EventState::Restarted));
        assert_eq!(EventState::from_state_id(137), Some(EventState::Cancelled));
        assert_eq!(EventState::from_state_id(138), Some(EventState::Ended));
        assert_eq!(
            EventState::from_state_id(139),
            Some(EventState::XpBonusChanged)
        );
        assert_eq!(EventState::from_state_id(140), None);
    }

    #[test]
    fn terminal_states_are_exactly_ended_and_cancelled() {
        assert!(EventState::Ended.is_terminal());
        assert!(EventState::Cancelled.is_terminal());
        assert!(!EventState::Started.is_terminal());
        assert!(!EventState::Restarted.is_terminal());
        assert!(!EventState::XpBonusChanged.is_terminal());
    }

    #[test]
    fn state_serializes_snake_case() {
        let json = serde_json::to_string(&EventState::XpBonusChanged).unwrap();
        assert_eq!(json, "\"xp_bonus_changed\"");
        let back: EventState = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(back, EventState::Cancelled);
    }

    #[test]
    fn raw_event_decodes_from_feed_json() {
        let line = r#"{
            "world_id": 17, "instance_id": 123456, "metagame_event_id": 42,
            "metagame_event_state": 135, "metagame_event_state_name": "started",
            "zone_id": 2, "faction_nc": 40.0, "faction_tr": 30.0,
            "faction_vs": 20.0, "experience_bonus": 25.0,
            "timestamp": 1700000000.0
        }"#;
        let raw: RawMetagameEvent = serde_json::from_str(line).unwrap();
        assert!(MetagameEvent::from_raw(&raw).is_ok());
    }
}
