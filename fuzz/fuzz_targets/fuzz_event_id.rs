#![no_main]

use libfuzzer_sys::fuzz_target;

use domain::event::identity::UniqueEventId;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing either fails cleanly or yields an id whose rendered form
    // parses back to the same value.
    if let Ok(id) = text.parse::<UniqueEventId>() {
        let rendered = id.to_string();
        let reparsed: UniqueEventId = rendered.parse().unwrap();
        assert_eq!(id, reparsed);
    }
});
