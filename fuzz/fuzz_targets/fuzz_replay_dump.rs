#![no_main]

use libfuzzer_sys::fuzz_target;
use matchstate::source::ReplayDump;
use matchstate::state::{check_invariants, ValueModel};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(dump) = ReplayDump::parse(text) else {
        return;
    };
    // Decoding never panics; a decoded replay always reconstructs cleanly
    if let Ok(replay) = dump.into_replay("fuzz") {
        let state = matchstate::reconstruct(&replay, ValueModel::standard());
        assert!(check_invariants(&state).is_empty());
    }
});
