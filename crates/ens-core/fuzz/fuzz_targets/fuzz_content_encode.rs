//! Fuzz test for content URI encoding

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(uri) = std::str::from_utf8(data) {
        // Should never panic, only return Err for invalid input
        let _ = ens_core::encode_content(uri);
    }
});
