use crate::error::RuleError;
use crate::model::{
    ExecutableType, ResolvedAction, RunContext, RunTarget, TargetHeader, Task, TaskCall,
    UnitContext,
};
use crate::rule::{Rule, RuleMode, RunRule, RunVerdict, UnitRule, UnitVerdict};
use riskguard_types::{RuleMeta, RunTargetKind, Severity, Tag};
use serde_json::json;

pub fn task_call(key: &str, action: &str, resolved_name: &str) -> TaskCall {
    TaskCall {
        key: key.to_string(),
        spec: Task {
            name: None,
            action: action.to_string(),
            executable_type: ExecutableType::Module,
            location: None,
        },
        resolved_name: resolved_name.to_string(),
        resolved_action: (!resolved_name.is_empty()).then(|| ResolvedAction {
            fqcn: resolved_name.to_string(),
            collection: None,
        }),
    }
}

pub fn unresolved_call(key: &str, action: &str) -> TaskCall {
    task_call(key, action, "")
}

pub fn call_of_type(key: &str, action: &str, executable_type: ExecutableType) -> TaskCall {
    let mut call = unresolved_call(key, action);
    call.spec.executable_type = executable_type;
    call
}

pub fn play(key: &str) -> RunTarget {
    RunTarget::Play(TargetHeader {
        key: key.to_string(),
        name: key.to_string(),
    })
}

pub fn context(targets: Vec<RunTarget>) -> RunContext {
    RunContext {
        sequence: targets,
        collection_name: String::new(),
        vars: Default::default(),
    }
}

pub fn tasks_context(calls: Vec<TaskCall>) -> RunContext {
    context(calls.into_iter().map(RunTarget::Task).collect())
}

/// Resolved-name-only context for run-scoped dependency checks.
pub fn resolved_context(resolved_names: &[&str]) -> RunContext {
    tasks_context(
        resolved_names
            .iter()
            .enumerate()
            .map(|(i, name)| task_call(&format!("task:{i}"), name, name))
            .collect(),
    )
}

fn meta(rule_id: &str, enabled: bool) -> RuleMeta {
    RuleMeta {
        rule_id: rule_id.to_string(),
        name: format!("Fixed{rule_id}"),
        description: "test rule".to_string(),
        version: "v0.0.1".to_string(),
        severity: Severity::Medium,
        tags: vec![Tag::Quality],
        enabled,
    }
}

/// Per-unit rule over task units with a scripted outcome.
pub struct FixedUnitRule {
    meta: RuleMeta,
    pub matched: bool,
    pub fail: bool,
    pub applicable: bool,
}

impl FixedUnitRule {
    pub fn new(rule_id: &str, enabled: bool) -> Self {
        Self {
            meta: meta(rule_id, enabled),
            matched: true,
            fail: false,
            applicable: true,
        }
    }

    pub fn failing(rule_id: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(rule_id, true)
        }
    }
}

impl Rule for FixedUnitRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn is_applicable(&self, _ctx: &RunContext) -> bool {
        self.applicable
    }

    fn mode(&self) -> RuleMode<'_> {
        RuleMode::PerUnit(self)
    }
}

impl UnitRule for FixedUnitRule {
    fn matches(&self, unit: &UnitContext<'_>) -> bool {
        unit.kind() == RunTargetKind::Task
    }

    fn evaluate(&self, unit: &UnitContext<'_>) -> Result<UnitVerdict, RuleError> {
        if self.fail {
            return Err(RuleError::Failed(format!("boom at {}", unit.index)));
        }
        Ok(UnitVerdict::new(self.matched, json!({ "index": unit.index })))
    }
}

/// Per-run rule that reports every task-call as contributing.
pub struct FixedRunRule {
    meta: RuleMeta,
    pub fail: bool,
}

impl FixedRunRule {
    pub fn new(rule_id: &str, enabled: bool) -> Self {
        Self {
            meta: meta(rule_id, enabled),
            fail: false,
        }
    }

    pub fn failing(rule_id: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(rule_id, true)
        }
    }
}

impl Rule for FixedRunRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn mode(&self) -> RuleMode<'_> {
        RuleMode::PerRun(self)
    }
}

impl RunRule for FixedRunRule {
    fn evaluate(&self, ctx: &RunContext) -> Result<RunVerdict, RuleError> {
        if self.fail {
            return Err(RuleError::Failed("run rule failed".to_string()));
        }
        let units: Vec<usize> = ctx.task_calls().map(|(i, _)| i).collect();
        Ok(RunVerdict {
            matched: !units.is_empty(),
            message: format!("{} task-calls", units.len()),
            units,
            detail: json!({}),
        })
    }
}

/// Per-unit rule that would panic if the engine ever called into it.
pub struct PanickingRule {
    meta: RuleMeta,
}

impl PanickingRule {
    pub fn disabled(rule_id: &str) -> Self {
        Self {
            meta: meta(rule_id, false),
        }
    }
}

impl Rule for PanickingRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn is_applicable(&self, _ctx: &RunContext) -> bool {
        panic!("disabled rule must not be consulted")
    }

    fn mode(&self) -> RuleMode<'_> {
        panic!("disabled rule must not be consulted")
    }
}
