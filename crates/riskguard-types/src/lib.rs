//! Stable DTOs and IDs used across the riskguard workspace.
//!
//! This crate is intentionally boring:
//! - the rule taxonomy (severity, tags)
//! - stable rule IDs and result field names
//! - data types for evaluated rule results and the report summary

#![forbid(unsafe_code)]

pub mod ids;
pub mod result;
pub mod taxonomy;

pub use result::{
    Outcome, ReportSummary, RuleMeta, RuleResult, SeverityCounts, UnitRef, Verdict,
};
pub use taxonomy::{ParseSeverityError, RunTargetKind, Severity, Tag};
