#![no_main]

use libfuzzer_sys::fuzz_target;

use domain::alert::entity::AlertRecord;
use domain::event::entity::{MetagameEvent, RawMetagameEvent};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Decode an arbitrary feed line; undecodable input is dropped, as the
    // feed adapter does.
    let Ok(raw) = serde_json::from_str::<RawMetagameEvent>(text) else {
        return;
    };

    // Validation may reject the event, but must never panic.
    if let Ok(event) = MetagameEvent::from_raw(&raw) {
        let record = AlertRecord::from_event(&event);

        // The canonical record always serializes.
        let _ = serde_json::to_string(&record);
        let _ = event.identity().to_string();
        let _ = event.state.is_terminal();
    }
});
