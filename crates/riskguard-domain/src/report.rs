use riskguard_types::{Outcome, ReportSummary, RuleResult, Severity};
use serde::Serialize;

/// Aggregated results of one evaluation, ordered by rule declaration order and
/// then by unit position.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub results: Vec<RuleResult>,
    pub summary: ReportSummary,
}

impl Report {
    /// Results whose rule fired.
    pub fn findings(&self) -> impl Iterator<Item = &RuleResult> {
        self.results.iter().filter(|r| r.matched())
    }

    /// Results recording a rule failure.
    pub fn errors(&self) -> impl Iterator<Item = &RuleResult> {
        self.results.iter().filter(|r| r.is_error())
    }
}

pub(crate) fn compute_outcome(results: &[RuleResult], fail_on: Severity) -> Outcome {
    if results
        .iter()
        .any(|r| r.matched() && r.severity >= fail_on)
    {
        return Outcome::Fail;
    }

    if results.iter().any(|r| r.matched() || r.is_error()) {
        return Outcome::Warn;
    }

    Outcome::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskguard_types::Verdict;

    fn result(severity: Severity, verdict: Verdict) -> RuleResult {
        RuleResult {
            rule_id: "R1".to_string(),
            severity,
            tags: Vec::new(),
            verdict,
            detail: serde_json::Value::Null,
            units: Vec::new(),
            message: String::new(),
            fingerprint: String::new(),
        }
    }

    #[test]
    fn outcome_fails_at_threshold() {
        let results = vec![result(Severity::High, Verdict::Matched)];
        assert_eq!(compute_outcome(&results, Severity::High), Outcome::Fail);
        assert_eq!(compute_outcome(&results, Severity::Critical), Outcome::Warn);
    }

    #[test]
    fn errors_warn_but_clear_results_pass() {
        let clear = vec![result(Severity::Critical, Verdict::Clear)];
        assert_eq!(compute_outcome(&clear, Severity::Low), Outcome::Pass);

        let errored = vec![result(Severity::Critical, Verdict::Error)];
        assert_eq!(compute_outcome(&errored, Severity::Low), Outcome::Warn);
    }
}
