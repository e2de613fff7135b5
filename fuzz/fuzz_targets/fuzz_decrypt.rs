#![no_main]

use libfuzzer_sys::fuzz_target;
use sealed_envelope::decrypt;

const PRIVATE_KEY: &str = include_str!("../../tests/fixtures/legacy_private.pem");

fuzz_target!(|data: &str| {
    // Arbitrary envelopes must be rejected, never panic
    let _ = decrypt(data, PRIVATE_KEY);
});
