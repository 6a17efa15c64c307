//! R304: a module-type task whose action could not be resolved.
//!
//! Downstream analysis cannot inspect what an unresolved module does, so this
//! flags the coverage gap at low severity.

use crate::error::RuleError;
use crate::model::{TaskCall, UnitContext};
use crate::rule::{Rule, RuleMode, UnitRule, UnitVerdict};
use riskguard_types::{ids, RuleMeta, RunTargetKind, Severity, Tag};
use serde_json::json;

pub const RULE_ID: &str = ids::RULE_UNRESOLVED_MODULE;

#[derive(Clone, Debug)]
pub struct UnresolvedModule {
    meta: RuleMeta,
}

impl UnresolvedModule {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                rule_id: RULE_ID.to_string(),
                name: "UnresolvedModule".to_string(),
                description: "Unresolved module is found".to_string(),
                version: "v0.0.1".to_string(),
                severity: Severity::Low,
                tags: vec![Tag::Dependency],
                enabled: true,
            },
        }
    }
}

impl Default for UnresolvedModule {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_unresolved_module(call: &TaskCall) -> bool {
    call.is_module() && !call.spec.action.is_empty() && !call.is_resolved()
}

impl Rule for UnresolvedModule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn mode(&self) -> RuleMode<'_> {
        RuleMode::PerUnit(self)
    }
}

impl UnitRule for UnresolvedModule {
    fn matches(&self, unit: &UnitContext<'_>) -> bool {
        unit.kind() == RunTargetKind::Task
    }

    fn evaluate(&self, unit: &UnitContext<'_>) -> Result<UnitVerdict, RuleError> {
        let Some(call) = unit.task_call() else {
            return Ok(UnitVerdict::clear());
        };

        let matched = is_unresolved_module(call);
        let verdict = UnitVerdict::new(matched, json!({ "module": call.spec.action }));
        if matched {
            Ok(verdict.with_message(format!("unresolved module '{}'", call.spec.action)))
        } else {
            Ok(verdict)
        }
    }
}
