use crate::taxonomy::{RunTargetKind, Severity, Tag};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Declarative rule metadata. Identity is `rule_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleMeta {
    pub rule_id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub severity: Severity,
    pub tags: Vec<Tag>,
    pub enabled: bool,
}

/// Outcome kind of a single evaluation.
///
/// `Error` is kept distinct from `Clear` so a failing rule is never mistaken for a clean one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Matched,
    Clear,
    Error,
}

impl Verdict {
    pub fn from_matched(matched: bool) -> Self {
        if matched {
            Verdict::Matched
        } else {
            Verdict::Clear
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Matched => "matched",
            Verdict::Clear => "clear",
            Verdict::Error => "error",
        }
    }
}

/// Pointer back to an evaluated unit of the run context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UnitRef {
    /// Position in the run sequence.
    pub index: usize,
    pub key: String,
    pub kind: RunTargetKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleResult {
    pub rule_id: String,
    pub severity: Severity,
    pub tags: Vec<Tag>,
    pub verdict: Verdict,

    /// Rule-specific evidence (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub detail: JsonValue,

    /// Evaluated unit for per-unit rules; contributing units for per-run rules.
    #[serde(default)]
    pub units: Vec<UnitRef>,

    #[serde(default)]
    pub message: String,

    /// Stable identifier intended for dedup and trending: a hash of
    /// `rule_id + verdict + unit keys`.
    pub fingerprint: String,
}

impl RuleResult {
    pub fn matched(&self) -> bool {
        self.verdict == Verdict::Matched
    }

    pub fn is_error(&self) -> bool {
        self.verdict == Verdict::Error
    }
}

/// Overall report outcome, computed against a `fail_on` threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityCounts {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

impl SeverityCounts {
    pub fn from_results(results: &[RuleResult]) -> Self {
        let mut counts = SeverityCounts::default();
        for r in results.iter().filter(|r| r.matched()) {
            match r.severity {
                Severity::Low => counts.low += 1,
                Severity::Medium => counts.medium += 1,
                Severity::High => counts.high += 1,
                Severity::Critical => counts.critical += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.low + self.medium + self.high + self.critical
    }
}

/// Riskguard-specific summary payload for a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportSummary {
    pub outcome: Outcome,
    pub profile: String,

    pub units_scanned: u32,
    pub rules_evaluated: u32,
    pub rules_disabled: u32,
    pub rules_not_applicable: u32,
    pub rules_failed: u32,

    pub counts: SeverityCounts,
}
