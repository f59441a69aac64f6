//! Fuzz target: `Response::decode` and `Inbound::classify`
//!
//! cargo fuzz run fuzz_response_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use playctl::protocol::{Inbound, Response};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = core::str::from_utf8(data) else {
        return;
    };
    let _ = Inbound::classify(raw);
    if let Ok(resp) = Response::decode(raw) {
        // Whatever decodes must survive one more encode/decode pass.
        let _ = Response::decode(&resp.encode());
    }
});
