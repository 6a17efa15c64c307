use crate::model::{RiskguardConfigV1, SCHEMA_CONFIG_V1};
use crate::presets;
use anyhow::{bail, Context};
use globset::Glob;
use riskguard_domain::policy::{EffectiveConfig, RulePolicy};
use riskguard_domain::rules;
use riskguard_types::Severity;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub fail_on: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: RiskguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "default".to_string());

    let mut effective = presets::preset(&profile).with_context(|| {
        format!(
            "unknown profile: {profile} (expected one of {})",
            presets::PROFILES.join("|")
        )
    })?;

    // per-rule overrides
    for (rule_id, rc) in cfg.rules.iter() {
        let entry = rules::lookup(rule_id)
            .with_context(|| format!("unknown rule in config: {rule_id}"))?;
        let policy = effective
            .rules
            .entry(rule_id.clone())
            .or_insert_with(|| {
                if entry.enabled_by_default {
                    RulePolicy::enabled()
                } else {
                    RulePolicy::disabled()
                }
            });

        if let Some(enabled) = rc.enabled {
            policy.enabled = enabled;
        }
        if let Some(sev) = rc.severity.as_deref() {
            let severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {rule_id}"))?;
            policy.severity = Some(severity);
        }
        if !rc.allow_list.is_empty() {
            if !entry.accepts_allow_list {
                bail!("rule {rule_id} does not take an allow_list");
            }
            validate_allowlist(rule_id, &rc.allow_list)?;
            policy.allow_list = rc.allow_list.clone();
        }
    }

    // fail_on: CLI-style override wins over config
    if let Some(fail_on) = overrides.fail_on.as_deref().or(cfg.fail_on.as_deref()) {
        effective.fail_on = parse_severity(fail_on).context("invalid fail_on")?;
    }

    Ok(ResolvedConfig { effective })
}

fn validate_allowlist(rule_id: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid allow_list glob for {rule_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    Ok(v.parse::<Severity>()?)
}
