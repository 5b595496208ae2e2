use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Stable identity of one metagame event occurrence.
///
/// Derived from the world (partition) id and the per-world instance id.
/// Two events with the same pair always map to the same identity, and the
/// rendered form (`"17-123456"`) is used directly as the document key in
/// the alert store and as a correlation token in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueEventId {
    pub world_id: u16,
    pub instance_id: u32,
}

impl UniqueEventId {
    pub fn new(world_id: u16, instance_id: u32) -> Self {
        Self {
            world_id,
            instance_id,
        }
    }
}

impl fmt::Display for UniqueEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.world_id, self.instance_id)
    }
}

#[derive(Debug, Error)]
#[error("invalid event id '{value}': expected '<world>-<instance>'")]
pub struct ParseIdError {
    pub value: String,
}

impl FromStr for UniqueEventId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIdError {
            value: s.to_string(),
        };
        let (world, instance) = s.split_once('-').ok_or_else(err)?;
        Ok(Self {
            world_id: world.parse().map_err(|_| err())?,
            instance_id: instance.parse().map_err(|_| err())?,
        })
    }
}

// Serialized as the rendered string so the identity can serve as the
// `_id` field of a stored document without a wrapper type.
impl Serialize for UniqueEventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UniqueEventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_world_and_instance() {
        assert_eq!(UniqueEventId::new(17, 123_456).to_string(), "17-123456");
        assert_eq!(UniqueEventId::new(1, 0).to_string(), "1-0");
    }

    #[test]
    fn equal_pairs_yield_equal_identity() {
        let a = UniqueEventId::new(17, 123_456);
        let b = UniqueEventId::new(17, 123_456);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn differing_pairs_yield_differing_identity() {
        let base = UniqueEventId::new(17, 123_456);
        assert_ne!(base, UniqueEventId::new(18, 123_456));
        assert_ne!(base, UniqueEventId::new(17, 123_457));
        assert_ne!(
            UniqueEventId::new(17, 123_456).to_string(),
            UniqueEventId::new(171, 23_456).to_string(),
        );
    }

    #[test]
    fn display_from_str_round_trip() {
        let id = UniqueEventId::new(40, 98_765);
        let parsed: UniqueEventId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn from_str_rejects_malformed_input() {
        assert!("".parse::<UniqueEventId>().is_err());
        assert!("17".parse::<UniqueEventId>().is_err());
        assert!("17-".parse::<UniqueEventId>().is_err());
        assert!("-123456".parse::<UniqueEventId>().is_err());
        assert!("seventeen-12".parse::<UniqueEventId>().is_err());
        assert!("99999-1".parse::<UniqueEventId>().is_err()); // world > u16::MAX
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = UniqueEventId::new(17, 123_456);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"17-123456\"");

        let back: UniqueEventId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deserialize_rejects_malformed_string() {
        assert!(serde_json::from_str::<UniqueEventId>("\"x-y\"").is_err());
        assert!(serde_json::from_str::<UniqueEventId>("17").is_err());
    }
}
