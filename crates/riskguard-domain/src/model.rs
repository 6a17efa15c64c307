use crate::error::RuleError;
use riskguard_types::{RunTargetKind, UnitRef};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// The resolved run graph the engine evaluates against.
///
/// Built by an external resolver. Sequence order is evaluation order and is
/// preserved in reported results. Rules only ever see this through shared
/// references.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunContext {
    /// Plays, roles, task files and task-calls in execution order.
    #[serde(default)]
    pub sequence: Vec<RunTarget>,

    /// Collection that owns the run (empty when the run is not part of one).
    #[serde(default)]
    pub collection_name: String,

    /// Caller-supplied run-scoped values (e.g. `allow_list`).
    #[serde(default)]
    pub vars: BTreeMap<String, JsonValue>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunTarget {
    Playbook(TargetHeader),
    Play(TargetHeader),
    Role(TargetHeader),
    TaskFile(TargetHeader),
    Task(TaskCall),
}

/// Identity of a non-task position in the run sequence.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TargetHeader {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

/// One invocation site of a task, paired with its resolution outcome.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaskCall {
    pub key: String,
    pub spec: Task,

    /// Fully-qualified resolved action name; empty when unresolved.
    #[serde(default)]
    pub resolved_name: String,

    #[serde(default)]
    pub resolved_action: Option<ResolvedAction>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub name: Option<String>,

    /// Declared action (module reference as written); may be empty.
    #[serde(default)]
    pub action: String,

    #[serde(default)]
    pub executable_type: ExecutableType,

    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutableType {
    #[default]
    Module,
    Role,
    TaskFile,
}

/// The concrete implementation a declared action maps to.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResolvedAction {
    #[serde(default)]
    pub fqcn: String,
    #[serde(default)]
    pub collection: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl RunTarget {
    pub fn kind(&self) -> RunTargetKind {
        match self {
            RunTarget::Playbook(_) => RunTargetKind::Playbook,
            RunTarget::Play(_) => RunTargetKind::Play,
            RunTarget::Role(_) => RunTargetKind::Role,
            RunTarget::TaskFile(_) => RunTargetKind::TaskFile,
            RunTarget::Task(_) => RunTargetKind::Task,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            RunTarget::Playbook(h)
            | RunTarget::Play(h)
            | RunTarget::Role(h)
            | RunTarget::TaskFile(h) => &h.key,
            RunTarget::Task(call) => &call.key,
        }
    }

    pub fn as_task_call(&self) -> Option<&TaskCall> {
        match self {
            RunTarget::Task(call) => Some(call),
            _ => None,
        }
    }
}

impl TaskCall {
    pub fn is_module(&self) -> bool {
        self.spec.executable_type == ExecutableType::Module
    }

    /// An absent resolved action and one with an empty `fqcn` both mean unresolved.
    pub fn is_resolved(&self) -> bool {
        self.resolved_action
            .as_ref()
            .is_some_and(|action| !action.fqcn.is_empty())
    }
}

impl RunContext {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Task-calls with their position in the sequence, in evaluation order.
    pub fn task_calls(&self) -> impl Iterator<Item = (usize, &TaskCall)> {
        self.sequence
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_task_call().map(|c| (i, c)))
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.vars.get(key)
    }

    /// Read a list of strings from the run store. A missing key reads as empty.
    pub fn str_list(&self, key: &str) -> Result<Vec<&str>, RuleError> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let invalid = || RuleError::InvalidVar {
            key: key.to_string(),
            expected: "an array of strings",
        };
        match value {
            JsonValue::Null => Ok(Vec::new()),
            JsonValue::Array(items) => items
                .iter()
                .map(|v| v.as_str().ok_or_else(invalid))
                .collect(),
            _ => Err(invalid()),
        }
    }

    /// Cursor over the unit at `index`.
    pub fn unit(&self, index: usize) -> Option<UnitContext<'_>> {
        self.sequence.get(index).map(|current| UnitContext {
            run: self,
            index,
            current,
        })
    }

    pub fn units(&self) -> impl Iterator<Item = UnitContext<'_>> {
        self.sequence
            .iter()
            .enumerate()
            .map(move |(index, current)| UnitContext {
                run: self,
                index,
                current,
            })
    }

    pub fn unit_ref(&self, index: usize) -> Result<UnitRef, RuleError> {
        let target = self
            .sequence
            .get(index)
            .ok_or(RuleError::UnitOutOfRange {
                index,
                len: self.sequence.len(),
            })?;
        Ok(UnitRef {
            index,
            key: target.key().to_string(),
            kind: target.kind(),
        })
    }
}

/// The "current" cursor handed to per-unit rules.
#[derive(Clone, Copy, Debug)]
pub struct UnitContext<'a> {
    pub run: &'a RunContext,
    pub index: usize,
    pub current: &'a RunTarget,
}

impl<'a> UnitContext<'a> {
    pub fn kind(&self) -> RunTargetKind {
        self.current.kind()
    }

    pub fn task_call(&self) -> Option<&'a TaskCall> {
        self.current.as_task_call()
    }

    pub fn unit_ref(&self) -> UnitRef {
        UnitRef {
            index: self.index,
            key: self.current.key().to_string(),
            kind: self.current.kind(),
        }
    }
}
