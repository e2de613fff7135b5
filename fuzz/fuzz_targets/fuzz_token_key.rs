#![no_main]

use libfuzzer_sys::fuzz_target;
use sealed_envelope::TokenKey;

fuzz_target!(|data: &str| {
    // Parsing arbitrary key text should never panic
    let _ = TokenKey::try_from(data);
});
