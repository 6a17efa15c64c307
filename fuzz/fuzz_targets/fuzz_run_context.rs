//! Fuzz target for evaluating arbitrary run contexts.
//!
//! Goal: every rule, deprecated ones included, should **never panic** on a
//! context the resolver could hand over. Rule failures must surface as error
//! results instead.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_run_context
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use riskguard::{parse_run_context, run_check, CheckInput, Overrides};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(ctx) = parse_run_context(text) else {
        return;
    };

    let overrides = Overrides {
        profile: Some("all".to_string()),
        ..Overrides::default()
    };
    let out = run_check(CheckInput {
        context: &ctx,
        config_text: "",
        overrides,
    })
    .expect("built-in profile always resolves");

    assert!(out.report.results.iter().all(|r| !r.fingerprint.is_empty()));
});
