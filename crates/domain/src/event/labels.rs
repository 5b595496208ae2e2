//! Human-readable names for the world and zone ids carried by events.
//! Used in debug logging and by the simulator; unknown ids are kept
//! rather than rejected since the upstream adds worlds over time.

pub fn world_name(world_id: u16) -> &'static str {
    match world_id {
        1 => "connery",
        10 => "miller",
        13 => "cobalt",
        17 => "emerald",
        19 => "jaeger",
        40 => "soltech",
        _ => "unknown",
    }
}

pub fn zone_name(zone_id: u32) -> &'static str {
    match zone_id {
        2 => "indar",
        4 => "hossin",
        6 => "amerish",
        8 => "esamir",
        344 => "oshur",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_resolve() {
        assert_eq!(world_name(17), "emerald");
        assert_eq!(world_name(40), "soltech");
        assert_eq!(zone_name(2), "indar");
        assert_eq!(zone_name(344), "oshur");
    }

    #[test]
    fn unknown_ids_do_not_panic() {
        assert_eq!(world_name(9999), "unknown");
        assert_eq!(zone_name(0), "unknown");
    }
}
