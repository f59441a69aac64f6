//! Fuzz target: `Command::decode`
//!
//! Feeds arbitrary UTF-8 into the command decoder.  Decoding must never
//! panic, and anything that decodes must re-encode to a string that
//! decodes to the same command.
//!
//! cargo fuzz run fuzz_command_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use playctl::protocol::Command;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(cmd) = Command::decode(raw) {
        let wire = cmd.encode();
        assert_eq!(Command::decode(&wire).as_ref(), Ok(&cmd), "unstable encoding: {wire}");
    }
});
