//! Pure rule evaluation (no IO).
//!
//! Input: a run context resolved elsewhere, plus a rule set built from configuration.
//! Output: ordered rule results + summary.

#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod policy;
pub mod report;
pub mod rule;
pub mod rules;
pub mod ruleset;

mod engine;
mod fingerprint;

#[cfg(all(
    test,
    feature = "rule-unresolved-module",
    feature = "rule-external-dependency"
))]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::evaluate;
pub use error::{ConfigError, RuleError};
pub use fingerprint::fingerprint_for_result;
pub use report::Report;
pub use ruleset::{RegisteredRule, RuleSet, RuleSetBuilder};
