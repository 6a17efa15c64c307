use crate::fingerprint::fingerprint_for_result;
use crate::model::{RunContext, UnitContext};
use crate::report::{compute_outcome, Report};
use crate::rule::{RuleMode, RunRule, UnitRule};
use crate::ruleset::RuleSet;
use riskguard_types::{ReportSummary, RuleMeta, RuleResult, SeverityCounts, UnitRef, Verdict};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, debug_span, trace, warn};

/// Evaluate every enabled, applicable rule of `rules` against `ctx`.
///
/// A failing rule produces `Verdict::Error` results and never prevents the
/// remaining rules from running.
pub fn evaluate(ctx: &RunContext, rules: &RuleSet) -> Report {
    let _span = debug_span!(
        "riskguard.evaluate",
        profile = rules.profile(),
        units = ctx.len()
    )
    .entered();

    let mut results: Vec<RuleResult> = Vec::new();
    let mut rules_evaluated = 0u32;
    let mut rules_disabled = 0u32;
    let mut rules_not_applicable = 0u32;
    let mut rules_failed = 0u32;

    for entry in rules.iter() {
        let meta = entry.meta();

        // Nothing else about a disabled rule is consulted.
        if !meta.enabled {
            debug!(rule_id = %meta.rule_id, "rule disabled, skipping");
            rules_disabled += 1;
            continue;
        }

        let rule = entry.rule();
        if !rule.is_applicable(ctx) {
            debug!(rule_id = %meta.rule_id, "rule not applicable to this run");
            rules_not_applicable += 1;
            continue;
        }

        rules_evaluated += 1;
        let first = results.len();
        match rule.mode() {
            RuleMode::PerUnit(unit_rule) => {
                results.extend(evaluate_per_unit(meta, unit_rule, ctx));
            }
            RuleMode::PerRun(run_rule) => {
                results.push(evaluate_per_run(meta, run_rule, ctx));
            }
        }

        if results[first..].iter().any(RuleResult::is_error) {
            rules_failed += 1;
        }
    }

    let outcome = compute_outcome(&results, rules.fail_on());
    let counts = SeverityCounts::from_results(&results);
    debug!(
        results = results.len(),
        findings = counts.total(),
        failed = rules_failed,
        ?outcome,
        "evaluation finished"
    );

    Report {
        summary: ReportSummary {
            outcome,
            profile: rules.profile().to_string(),
            units_scanned: u32::try_from(ctx.len()).unwrap_or(u32::MAX),
            rules_evaluated,
            rules_disabled,
            rules_not_applicable,
            rules_failed,
            counts,
        },
        results,
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_per_unit(meta: &RuleMeta, rule: &dyn UnitRule, ctx: &RunContext) -> Vec<RuleResult> {
    ctx.units()
        .filter(|unit| rule.matches(unit))
        .map(|unit| evaluate_unit(meta, rule, &unit))
        .collect()
}

// Rayon's collect keeps sequence order regardless of completion order.
#[cfg(feature = "parallel")]
fn evaluate_per_unit(meta: &RuleMeta, rule: &dyn UnitRule, ctx: &RunContext) -> Vec<RuleResult> {
    use rayon::prelude::*;

    (0..ctx.len())
        .into_par_iter()
        .filter_map(|index| ctx.unit(index))
        .filter(|unit| rule.matches(unit))
        .map(|unit| evaluate_unit(meta, rule, &unit))
        .collect()
}

fn evaluate_unit(meta: &RuleMeta, rule: &dyn UnitRule, unit: &UnitContext<'_>) -> RuleResult {
    let unit_ref = unit.unit_ref();
    match rule.evaluate(unit) {
        Ok(verdict) => {
            trace!(
                rule_id = %meta.rule_id,
                unit = %unit_ref.key,
                matched = verdict.matched,
                "unit evaluated"
            );
            build_result(
                meta,
                Verdict::from_matched(verdict.matched),
                verdict.detail,
                vec![unit_ref],
                verdict.message,
            )
        }
        Err(err) => {
            warn!(
                rule_id = %meta.rule_id,
                unit = %unit_ref.key,
                error = %err,
                "rule evaluation failed"
            );
            error_result(meta, vec![unit_ref], &err)
        }
    }
}

fn evaluate_per_run(meta: &RuleMeta, rule: &dyn RunRule, ctx: &RunContext) -> RuleResult {
    let evaluated = rule.evaluate(ctx).and_then(|verdict| {
        let units = verdict
            .units
            .iter()
            .map(|&index| ctx.unit_ref(index))
            .collect::<Result<Vec<UnitRef>, _>>()?;
        Ok((verdict, units))
    });

    match evaluated {
        Ok((verdict, units)) => {
            trace!(
                rule_id = %meta.rule_id,
                matched = verdict.matched,
                units = units.len(),
                "run evaluated"
            );
            build_result(
                meta,
                Verdict::from_matched(verdict.matched),
                verdict.detail,
                units,
                verdict.message,
            )
        }
        Err(err) => {
            warn!(rule_id = %meta.rule_id, error = %err, "rule evaluation failed");
            error_result(meta, Vec::new(), &err)
        }
    }
}

fn error_result(meta: &RuleMeta, units: Vec<UnitRef>, err: &dyn std::error::Error) -> RuleResult {
    let message = err.to_string();
    build_result(
        meta,
        Verdict::Error,
        json!({ "error": message }),
        units,
        message,
    )
}

fn build_result(
    meta: &RuleMeta,
    verdict: Verdict,
    detail: JsonValue,
    units: Vec<UnitRef>,
    message: String,
) -> RuleResult {
    let keys: Vec<&str> = units.iter().map(|u| u.key.as_str()).collect();
    let fingerprint = fingerprint_for_result(&meta.rule_id, verdict.as_str(), &keys);

    RuleResult {
        rule_id: meta.rule_id.clone(),
        severity: meta.severity,
        tags: meta.tags.clone(),
        verdict,
        detail,
        units,
        message,
        fingerprint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RunTarget;
    use crate::test_support::{
        context, play, task_call, tasks_context, unresolved_call, FixedRunRule, FixedUnitRule,
        PanickingRule,
    };
    use riskguard_types::{Outcome, RunTargetKind, Severity};

    fn mixed_context() -> RunContext {
        context(vec![
            play("play:0"),
            RunTarget::Task(task_call("task:1", "copy", "ansible.builtin.copy")),
            RunTarget::Task(unresolved_call("task:2", "foo")),
        ])
    }

    #[test]
    fn per_unit_rule_yields_one_result_per_matching_unit_in_order() {
        let rules = RuleSet::builder()
            .register(FixedUnitRule::new("U1", true))
            .unwrap()
            .build();

        let report = evaluate(&mixed_context(), &rules);

        assert_eq!(report.results.len(), 2);
        let keys: Vec<&str> = report
            .results
            .iter()
            .map(|r| r.units[0].key.as_str())
            .collect();
        assert_eq!(keys, vec!["task:1", "task:2"]);
        assert!(report.results.iter().all(|r| r.units[0].kind == RunTargetKind::Task));
        assert_eq!(report.summary.units_scanned, 3);
    }

    #[test]
    fn disabled_rule_contributes_nothing_and_is_never_consulted() {
        let rules = RuleSet::builder()
            .register(PanickingRule::disabled("P1"))
            .unwrap()
            .build();

        let report = evaluate(&mixed_context(), &rules);

        assert!(report.results.is_empty());
        assert_eq!(report.summary.rules_disabled, 1);
        assert_eq!(report.summary.rules_evaluated, 0);
        assert_eq!(report.summary.outcome, Outcome::Pass);
    }

    #[test]
    fn not_applicable_rule_is_skipped() {
        let mut rule = FixedUnitRule::new("U1", true);
        rule.applicable = false;
        let rules = RuleSet::builder().register(rule).unwrap().build();

        let report = evaluate(&mixed_context(), &rules);

        assert!(report.results.is_empty());
        assert_eq!(report.summary.rules_not_applicable, 1);
    }

    #[test]
    fn failing_rule_is_isolated_and_reported_as_error() {
        let rules = RuleSet::builder()
            .register(FixedUnitRule::failing("U1"))
            .unwrap()
            .register(FixedRunRule::failing("R1"))
            .unwrap()
            .register(FixedRunRule::new("R2", true))
            .unwrap()
            .build();

        let report = evaluate(&mixed_context(), &rules);

        let ids: Vec<(&str, Verdict)> = report
            .results
            .iter()
            .map(|r| (r.rule_id.as_str(), r.verdict))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("U1", Verdict::Error),
                ("U1", Verdict::Error),
                ("R1", Verdict::Error),
                ("R2", Verdict::Matched),
            ]
        );
        assert_eq!(report.summary.rules_failed, 2);
        assert_eq!(report.errors().count(), 3);
        assert_eq!(report.results[0].message, "boom at 1");
        assert_eq!(report.results[0].detail["error"], "boom at 1");
    }

    #[test]
    fn per_run_rule_reports_contributing_units() {
        let rules = RuleSet::builder()
            .register(FixedRunRule::new("R1", true))
            .unwrap()
            .build();

        let report = evaluate(&mixed_context(), &rules);

        assert_eq!(report.results.len(), 1);
        let result = &report.results[0];
        assert!(result.matched());
        let indices: Vec<usize> = result.units.iter().map(|u| u.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(result.message, "2 task-calls");
    }

    #[test]
    fn clear_results_are_kept_but_are_not_findings() {
        let mut rule = FixedUnitRule::new("U1", true);
        rule.matched = false;
        let rules = RuleSet::builder().register(rule).unwrap().build();

        let report = evaluate(&mixed_context(), &rules);

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.findings().count(), 0);
        assert_eq!(report.summary.outcome, Outcome::Pass);
    }

    #[test]
    fn outcome_respects_fail_on() {
        let rules = RuleSet::builder()
            .fail_on(Severity::Medium)
            .register(FixedRunRule::new("R1", true))
            .unwrap()
            .build();

        let report = evaluate(&tasks_context(vec![unresolved_call("t", "x")]), &rules);

        assert_eq!(report.summary.outcome, Outcome::Fail);
        assert_eq!(report.summary.counts.medium, 1);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let fresh_rules = || {
            RuleSet::builder()
                .register(FixedUnitRule::new("U1", true))
                .unwrap()
                .register(FixedRunRule::new("R1", true))
                .unwrap()
                .build()
        };
        let ctx = mixed_context();

        let first = evaluate(&ctx, &fresh_rules());
        let second = evaluate(&ctx, &fresh_rules());

        assert_eq!(first, second);
    }
}
