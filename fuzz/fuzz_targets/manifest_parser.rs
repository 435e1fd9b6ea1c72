//! Fuzzing target for the manifest parsers
//!
//! Arbitrary text must never panic a parser, whichever ecosystem it is
//! handed to; bad entries are skipped, not fatal.

#![no_main]

use libfuzzer_sys::fuzz_target;

use rampart_core::Ecosystem;
use rampart_manifests::parse_manifest;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        for ecosystem in Ecosystem::ALL {
            let _ = parse_manifest(text, ecosystem);
        }
    }
});
