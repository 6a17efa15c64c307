//! Error taxonomy for rule-set construction and rule evaluation.

/// Raised while building a rule set. Fatal: no context is evaluated.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("rule_id must not be empty (rule {name})")]
    EmptyRuleId { name: String },

    #[error("duplicate rule_id: {0}")]
    DuplicateRuleId(String),

    #[error("unknown rule_id: {0}")]
    UnknownRule(String),

    #[error("rule {0} does not take an allow_list")]
    AllowListNotSupported(String),

    #[error("invalid allow_list pattern for {rule_id}: {pattern}: {reason}")]
    InvalidAllowPattern {
        rule_id: String,
        pattern: String,
        reason: String,
    },
}

/// Raised by a single rule while evaluating a unit or a run.
///
/// The engine records these as error results and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("run store value `{key}` must be {expected}")]
    InvalidVar { key: String, expected: &'static str },

    #[error("unit index {index} out of range (sequence has {len} units)")]
    UnitOutOfRange { index: usize, len: usize },

    #[error("{0}")]
    Failed(String),
}
