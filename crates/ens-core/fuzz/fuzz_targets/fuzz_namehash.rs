//! Fuzz test for name hashing and label parsing

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        let node = ens_core::namehash(name);
        let labels = ens_core::split_labels(name);
        assert_eq!(ens_core::namehash_labels(&labels), node);
    }
});
