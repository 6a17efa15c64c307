//! Rule registry keyed by stable `rule_id`.
//!
//! All configuration problems surface here, before any run is evaluated.

use crate::error::ConfigError;
use crate::policy::{EffectiveConfig, RulePolicy};
use crate::rule::Rule;
use crate::rules;
use riskguard_types::{RuleMeta, Severity};
use std::collections::BTreeSet;
use tracing::warn;

/// A rule plus the metadata it runs under (declared metadata with policy overrides applied).
pub struct RegisteredRule {
    meta: RuleMeta,
    rule: Box<dyn Rule>,
}

impl RegisteredRule {
    pub fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }
}

impl std::fmt::Debug for RegisteredRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredRule")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Ordered set of rules. Iteration order is registration order.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<RegisteredRule>,
    profile: String,
    fail_on: Severity,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Build the built-in catalog under `cfg`.
    ///
    /// Rules missing from `cfg.rules` keep their catalog defaults. Policies
    /// naming a rule outside the catalog are rejected.
    pub fn from_config(cfg: &EffectiveConfig) -> Result<Self, ConfigError> {
        let catalog = rules::catalog();

        if let Some(unknown) = cfg
            .rules
            .keys()
            .find(|id| !catalog.iter().any(|e| e.rule_id == id.as_str()))
        {
            return Err(ConfigError::UnknownRule(unknown.clone()));
        }

        let mut builder = RuleSet::builder()
            .profile(cfg.profile.clone())
            .fail_on(cfg.fail_on);

        for entry in &catalog {
            let policy = cfg.rule_policy(entry.rule_id);
            let allow = policy.map(|p| p.allow_list.as_slice()).unwrap_or_default();
            if !entry.accepts_allow_list && !allow.is_empty() {
                return Err(ConfigError::AllowListNotSupported(entry.rule_id.to_string()));
            }
            let rule = (entry.build)(allow)?;
            if entry.deprecated && policy.is_some_and(|p| p.enabled) {
                warn!(rule_id = entry.rule_id, "deprecated rule enabled");
            }
            builder = match policy {
                Some(p) => builder.register_boxed_with_policy(rule, p)?,
                None => builder.register_boxed(rule)?,
            };
        }

        Ok(builder.build())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredRule> {
        self.rules.iter()
    }

    pub fn get(&self, rule_id: &str) -> Option<&RegisteredRule> {
        self.rules.iter().find(|r| r.meta.rule_id == rule_id)
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.meta.rule_id.as_str())
    }

    pub fn enabled(&self) -> impl Iterator<Item = &RegisteredRule> {
        self.rules.iter().filter(|r| r.meta.enabled)
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn fail_on(&self) -> Severity {
        self.fail_on
    }
}

#[derive(Debug)]
pub struct RuleSetBuilder {
    rules: Vec<RegisteredRule>,
    seen: BTreeSet<String>,
    profile: String,
    fail_on: Severity,
}

impl Default for RuleSetBuilder {
    fn default() -> Self {
        let defaults = EffectiveConfig::default();
        Self {
            rules: Vec::new(),
            seen: BTreeSet::new(),
            profile: defaults.profile,
            fail_on: defaults.fail_on,
        }
    }
}

impl RuleSetBuilder {
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn fail_on(mut self, fail_on: Severity) -> Self {
        self.fail_on = fail_on;
        self
    }

    /// Register a rule under its declared metadata.
    pub fn register<R: Rule + 'static>(self, rule: R) -> Result<Self, ConfigError> {
        self.register_boxed(Box::new(rule))
    }

    pub fn register_boxed(self, rule: Box<dyn Rule>) -> Result<Self, ConfigError> {
        let meta = rule.meta().clone();
        self.push(meta, rule)
    }

    /// Register a rule with `enabled`/`severity` taken from `policy`.
    pub fn register_boxed_with_policy(
        self,
        rule: Box<dyn Rule>,
        policy: &RulePolicy,
    ) -> Result<Self, ConfigError> {
        let mut meta = rule.meta().clone();
        meta.enabled = policy.enabled;
        if let Some(severity) = policy.severity {
            meta.severity = severity;
        }
        self.push(meta, rule)
    }

    fn push(mut self, meta: RuleMeta, rule: Box<dyn Rule>) -> Result<Self, ConfigError> {
        if meta.rule_id.trim().is_empty() {
            return Err(ConfigError::EmptyRuleId { name: meta.name });
        }
        if !self.seen.insert(meta.rule_id.clone()) {
            return Err(ConfigError::DuplicateRuleId(meta.rule_id));
        }
        self.rules.push(RegisteredRule { meta, rule });
        Ok(self)
    }

    pub fn build(self) -> RuleSet {
        RuleSet {
            rules: self.rules,
            profile: self.profile,
            fail_on: self.fail_on,
        }
    }
}
