#![no_main]

use libfuzzer_sys::fuzz_target;
use sealed_envelope::verify;

const PUBLIC_KEY: &str = include_str!("../../tests/fixtures/legacy_public.pem");

fuzz_target!(|data: &str| {
    // Arbitrary envelopes must be rejected, never panic
    let _ = verify(data, PUBLIC_KEY);
});
