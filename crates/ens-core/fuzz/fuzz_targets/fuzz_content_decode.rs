//! Fuzz test for content-hash decoding
//!
//! Decoding must turn any byte string into a value, never a panic

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoded = ens_core::decode_content(data);
    if let Some(uri) = decoded.to_uri() {
        // Anything that decodes re-encodes under the same protocol
        if let Ok(encoded) = ens_core::encode_content(&uri) {
            let again = ens_core::decode_content(encoded.as_bytes());
            assert_eq!(again.protocol_type, decoded.protocol_type);
        }
    }
});
