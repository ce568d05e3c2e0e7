#![no_main]

use libfuzzer_sys::fuzz_target;
use sociogram_core::Answer;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let answer = Answer::from_value(&value);
    for id in answer.nominees() {
        assert!(!id.trim().is_empty());
        assert_eq!(id.trim(), id);
    }
});
