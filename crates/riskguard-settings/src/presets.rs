use riskguard_domain::policy::{EffectiveConfig, RulePolicy};
use riskguard_domain::rules;
use riskguard_types::Severity;
use std::collections::BTreeMap;

pub const PROFILES: &[&str] = &["default", "all", "strict"];

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> Option<EffectiveConfig> {
    match profile {
        "default" => Some(default_profile()),
        "all" => Some(all_profile()),
        "strict" => Some(strict_profile()),
        _ => None,
    }
}

fn default_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "default".to_string(),
        fail_on: Severity::High,
        rules: catalog_rules(|entry| entry.enabled_by_default),
    }
}

fn all_profile() -> EffectiveConfig {
    // Everything on, deprecated rules included.
    EffectiveConfig {
        profile: "all".to_string(),
        fail_on: Severity::High,
        rules: catalog_rules(|_| true),
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: Severity::Low,
        rules: catalog_rules(|entry| entry.enabled_by_default),
    }
}

fn catalog_rules(enabled: impl Fn(&rules::CatalogEntry) -> bool) -> BTreeMap<String, RulePolicy> {
    rules::catalog()
        .iter()
        .map(|entry| {
            let policy = if enabled(entry) {
                RulePolicy::enabled()
            } else {
                RulePolicy::disabled()
            };
            (entry.rule_id.to_string(), policy)
        })
        .collect()
}
