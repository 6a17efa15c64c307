//! Fuzz target for config parsing and rule-set construction.
//!
//! Goal: configuration handling should **never panic** on any input.
//! It may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use riskguard::{run_check, CheckInput, Overrides, RunContext};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let ctx = RunContext::default();
        let _ = run_check(CheckInput {
            context: &ctx,
            config_text: text,
            overrides: Overrides::default(),
        });
    }
});
