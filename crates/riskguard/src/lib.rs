//! Public facade for riskguard.
//!
//! Re-exports the pure evaluation engine and adds the `check` use case: take
//! configuration text plus a resolved run context, hand back a report. Loading
//! either input from disk, and presenting the report, is left to the host.

#![forbid(unsafe_code)]

mod check;

pub use check::{parse_run_context, run_check, CheckInput, CheckOutput};

pub use riskguard_domain::model::{
    ExecutableType, Location, ResolvedAction, RunContext, RunTarget, TargetHeader, Task,
    TaskCall, UnitContext,
};
pub use riskguard_domain::policy::{EffectiveConfig, RulePolicy};
pub use riskguard_domain::rule::{Rule, RuleMode, RunRule, RunVerdict, UnitRule, UnitVerdict};
pub use riskguard_domain::{evaluate, rules, ConfigError, Report, RuleError, RuleSet};
pub use riskguard_settings::{Overrides, ResolvedConfig};
pub use riskguard_types::{
    ids, Outcome, ReportSummary, RuleMeta, RuleResult, RunTargetKind, Severity, Tag, UnitRef,
    Verdict,
};
