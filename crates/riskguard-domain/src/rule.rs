//! The rule abstraction.
//!
//! A rule is declarative metadata plus one evaluation capability:
//! - [`UnitRule`]: one verdict per execution unit the rule `matches`.
//! - [`RunRule`]: one batch verdict for the whole run.
//!
//! Rules are shared across evaluations and hold no mutable state.

use crate::error::RuleError;
use crate::model::{RunContext, UnitContext};
use riskguard_types::RuleMeta;
use serde_json::Value as JsonValue;

pub trait Rule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    /// Cheap, side-effect-free gate deciding whether the rule takes part in
    /// this evaluation at all.
    fn is_applicable(&self, _ctx: &RunContext) -> bool {
        true
    }

    fn mode(&self) -> RuleMode<'_>;
}

pub enum RuleMode<'a> {
    PerUnit(&'a dyn UnitRule),
    PerRun(&'a dyn RunRule),
}

pub trait UnitRule: Send + Sync {
    /// Whether the current unit is of a kind this rule targets.
    fn matches(&self, unit: &UnitContext<'_>) -> bool;

    fn evaluate(&self, unit: &UnitContext<'_>) -> Result<UnitVerdict, RuleError>;
}

pub trait RunRule: Send + Sync {
    fn evaluate(&self, ctx: &RunContext) -> Result<RunVerdict, RuleError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnitVerdict {
    pub matched: bool,
    pub detail: JsonValue,
    pub message: String,
}

impl UnitVerdict {
    pub fn new(matched: bool, detail: JsonValue) -> Self {
        Self {
            matched,
            detail,
            message: String::new(),
        }
    }

    pub fn clear() -> Self {
        Self::new(false, JsonValue::Null)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunVerdict {
    pub matched: bool,
    /// Sequence positions of the units that contributed, in sequence order.
    pub units: Vec<usize>,
    pub message: String,
    pub detail: JsonValue,
}
