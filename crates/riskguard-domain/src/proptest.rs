//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - unresolved-module detection against arbitrary task shapes
//! - external-dependency determinism and allow-list exclusion
//! - engine determinism and disabled-rule handling

use crate::engine::evaluate;
use crate::model::{ExecutableType, RunContext, RunTarget};
use crate::policy::{EffectiveConfig, RulePolicy};
use crate::rules::collection_of;
use crate::ruleset::RuleSet;
use crate::test_support::{resolved_context, task_call, tasks_context};
use proptest::prelude::*;
use riskguard_types::{ids, RuleResult};
use serde_json::json;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Strategy for a single dotted name segment.
fn arb_segment() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,11}").unwrap()
}

/// Strategy for fully-qualified resolved names (`ns.collection.module`).
fn arb_fqcn() -> impl Strategy<Value = String> {
    (arb_segment(), arb_segment(), arb_segment())
        .prop_map(|(ns, col, module)| format!("{ns}.{col}.{module}"))
}

/// Strategy for resolved names, including the shapes the dependency check skips.
fn arb_resolved_name() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_fqcn(),
        1 => Just(String::new()),
        1 => arb_segment(),
        1 => arb_segment().prop_map(|m| format!("ansible.builtin.{m}")),
    ]
}

fn arb_executable_type() -> impl Strategy<Value = ExecutableType> {
    prop_oneof![
        Just(ExecutableType::Module),
        Just(ExecutableType::Role),
        Just(ExecutableType::TaskFile),
    ]
}

fn arb_action() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), arb_segment(), arb_fqcn()]
}

fn config_with(rule_id: &str, policy: RulePolicy) -> EffectiveConfig {
    let mut cfg = EffectiveConfig::default();
    cfg.rules.insert(rule_id.to_string(), policy);
    cfg
}

fn external_collections(ctx: &RunContext, allow: &[String]) -> Vec<String> {
    let mut cfg = config_with(
        ids::RULE_EXTERNAL_DEPENDENCY,
        RulePolicy::enabled().with_allow_list(allow.iter().cloned()),
    );
    cfg.rules.insert(
        ids::RULE_UNRESOLVED_MODULE.to_string(),
        RulePolicy::disabled(),
    );
    let rules = RuleSet::from_config(&cfg).unwrap();
    let report = evaluate(ctx, &rules);

    assert_eq!(report.results.len(), 1);
    serde_json::from_value(report.results[0].detail["collections"].clone()).unwrap()
}

// ============================================================================
// Unresolved module
// ============================================================================

proptest! {
    #[test]
    fn unresolved_module_never_fires_for_non_modules(
        action in arb_action(),
        resolved in arb_resolved_name(),
        executable_type in arb_executable_type(),
    ) {
        prop_assume!(executable_type != ExecutableType::Module);

        let mut call = task_call("task:0", &action, &resolved);
        call.spec.executable_type = executable_type;
        let report = evaluate(
            &tasks_context(vec![call]),
            &RuleSet::from_config(&EffectiveConfig::default()).unwrap(),
        );

        prop_assert!(report.results.iter().all(|r| !r.matched()));
    }

    #[test]
    fn unresolved_module_never_fires_for_empty_action(
        resolved in arb_resolved_name(),
        executable_type in arb_executable_type(),
    ) {
        let mut call = task_call("task:0", "", &resolved);
        call.resolved_action = None;
        call.spec.executable_type = executable_type;
        let report = evaluate(
            &tasks_context(vec![call]),
            &RuleSet::from_config(&EffectiveConfig::default()).unwrap(),
        );

        prop_assert_eq!(report.findings().count(), 0);
    }

    #[test]
    fn unresolved_module_fires_exactly_for_unresolved_named_modules(
        actions in prop::collection::vec((arb_segment(), any::<bool>()), 0..12),
    ) {
        let calls = actions
            .iter()
            .enumerate()
            .map(|(i, (action, resolved))| {
                let resolved_name = if *resolved { format!("acme.tools.{action}") } else { String::new() };
                task_call(&format!("task:{i}"), action, &resolved_name)
            })
            .collect();
        let report = evaluate(
            &tasks_context(calls),
            &RuleSet::from_config(&EffectiveConfig::default()).unwrap(),
        );

        let fired: Vec<usize> = report.findings().map(|r| r.units[0].index).collect();
        let expected: Vec<usize> = actions
            .iter()
            .enumerate()
            .filter(|(_, (_, resolved))| !resolved)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(fired, expected);
    }
}

// ============================================================================
// External dependency
// ============================================================================

proptest! {
    #[test]
    fn external_collections_sorted_and_unique(
        names in prop::collection::vec(arb_resolved_name(), 0..24),
    ) {
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let collections = external_collections(&resolved_context(&refs), &[]);

        let mut expected = collections.clone();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(collections, expected);
    }

    #[test]
    fn external_collections_independent_of_task_order(
        shuffled in prop::collection::vec(arb_fqcn(), 1..16)
            .prop_flat_map(|names| (Just(names.clone()), Just(names).prop_shuffle())),
    ) {
        let (original, permuted) = shuffled;
        let a: Vec<&str> = original.iter().map(String::as_str).collect();
        let b: Vec<&str> = permuted.iter().map(String::as_str).collect();

        prop_assert_eq!(
            external_collections(&resolved_context(&a), &[]),
            external_collections(&resolved_context(&b), &[])
        );
    }

    #[test]
    fn allow_listed_collections_never_reported(
        names in prop::collection::vec(arb_fqcn(), 1..16),
        pick in any::<prop::sample::Index>(),
        via_store in any::<bool>(),
    ) {
        let allowed = collection_of(pick.get::<String>(&names)).unwrap().to_string();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut ctx = resolved_context(&refs);

        let collections = if via_store {
            ctx.vars.insert(ids::VAR_ALLOW_LIST.to_string(), json!([allowed.clone()]));
            external_collections(&ctx, &[])
        } else {
            external_collections(&ctx, std::slice::from_ref(&allowed))
        };

        prop_assert!(!collections.contains(&allowed));
    }

    #[test]
    fn collection_of_is_a_prefix(name in "[a-z.]{0,24}") {
        match collection_of(&name) {
            Some(collection) => {
                prop_assert!(name.starts_with(collection));
                prop_assert!(collection.matches('.').count() == 1);
            }
            None => prop_assert!(!name.contains('.')),
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

proptest! {
    #[test]
    fn evaluation_is_deterministic(
        names in prop::collection::vec(arb_resolved_name(), 0..16),
        collection_name in prop_oneof![Just(String::new()), arb_fqcn()],
    ) {
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut ctx = resolved_context(&refs);
        ctx.collection_name = collection_name;
        ctx.sequence.push(RunTarget::Task(task_call("tail", "mystery", "")));

        let cfg = config_with(ids::RULE_EXTERNAL_DEPENDENCY, RulePolicy::enabled());
        let first: Vec<RuleResult> = evaluate(&ctx, &RuleSet::from_config(&cfg).unwrap()).results;
        let second: Vec<RuleResult> = evaluate(&ctx, &RuleSet::from_config(&cfg).unwrap()).results;

        prop_assert_eq!(first, second);
    }

    #[test]
    fn disabled_rules_contribute_nothing(
        names in prop::collection::vec(arb_resolved_name(), 0..16),
    ) {
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut cfg = config_with(ids::RULE_EXTERNAL_DEPENDENCY, RulePolicy::disabled());
        cfg.rules.insert(ids::RULE_UNRESOLVED_MODULE.to_string(), RulePolicy::disabled());

        let report = evaluate(&resolved_context(&refs), &RuleSet::from_config(&cfg).unwrap());

        prop_assert!(report.results.is_empty());
        prop_assert_eq!(report.summary.rules_disabled, 2);
    }
}
