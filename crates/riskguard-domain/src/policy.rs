use riskguard_types::Severity;
use std::collections::BTreeMap;

/// Per-rule configuration as the engine expects it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulePolicy {
    pub enabled: bool,
    /// Replaces the rule's declared severity when set.
    pub severity: Option<Severity>,
    /// Allow-list patterns (semantics are rule-specific).
    pub allow_list: Vec<String>,
}

impl RulePolicy {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            severity: None,
            allow_list: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: None,
            allow_list: Vec::new(),
        }
    }

    pub fn with_allow_list<I, S>(mut self, allow: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list = allow.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub profile: String,
    /// Matched results at or above this severity fail the report.
    pub fail_on: Severity,
    /// rule_id -> policy. Rules absent from the map keep their catalog defaults.
    pub rules: BTreeMap<String, RulePolicy>,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            profile: "default".to_string(),
            fail_on: Severity::High,
            rules: BTreeMap::new(),
        }
    }
}

impl EffectiveConfig {
    pub fn rule_policy(&self, rule_id: &str) -> Option<&RulePolicy> {
        self.rules.get(rule_id)
    }
}
